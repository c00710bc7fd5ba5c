//! Pinned map locations and their per-trip categories.

use super::user::UserId;

/// Soft grouping for locations, unique by name within a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCategory {
    pub id: i32,
    pub trip_id: i32,
    pub name: String,
}

/// A place pinned to a trip's map.
///
/// `place_id` is the external map provider's identifier, unique per trip.
/// `category_id` is nullable: locations without one are uncategorised.
#[derive(Debug, Clone, PartialEq)]
pub struct TripLocation {
    pub id: i32,
    pub trip_id: i32,
    pub user_id: UserId,
    pub place_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category_id: Option<i32>,
}
