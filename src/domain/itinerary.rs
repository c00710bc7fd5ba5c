//! Day-by-day itinerary entries.

use chrono::{DateTime, Utc};

/// One itinerary entry for a trip day.
///
/// Ids are client-supplied opaque strings; trip creation seeds one empty
/// entry per calendar day of the trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryEntry {
    pub id: String,
    pub trip_id: i32,
    pub date: DateTime<Utc>,
    pub description: String,
}
