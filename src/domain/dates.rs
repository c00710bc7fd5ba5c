//! Wire formats for the two date representations used by the API.
//!
//! Trip start/end dates travel as `MM/DD/YYYY`; itinerary entry dates travel
//! as RFC 2822 timestamps (`Fri, 08 Nov 2024 00:00:00 GMT`). Both formats are
//! part of the HTTP contract and must not drift.

use chrono::{DateTime, NaiveDate, ParseError, Utc};

/// Textual format for trip start/end dates.
pub const TRIP_DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse a trip date in `MM/DD/YYYY` form.
pub fn parse_trip_date(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value, TRIP_DATE_FORMAT)
}

/// Render a trip date back into its wire form.
pub fn format_trip_date(date: NaiveDate) -> String {
    date.format(TRIP_DATE_FORMAT).to_string()
}

/// Parse an itinerary timestamp in RFC 2822 form.
pub fn parse_itinerary_date(value: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc2822(value).map(|parsed| parsed.with_timezone(&Utc))
}

/// Render an itinerary timestamp back into its wire form.
pub fn format_itinerary_date(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
