//! Shared validation helpers for inbound HTTP adapters.
//!
//! Error messages are part of the API contract and mirror the responses
//! clients already rely on.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::dates;
use crate::domain::{Error, RsvpStatus, UserId};

/// Parse a trip id arriving as a query-string value.
pub(crate) fn parse_trip_id(value: &str) -> Result<i32, Error> {
    value
        .parse::<i32>()
        .map_err(|_| Error::invalid_request("Invalid trip ID."))
}

/// Parse a trip date in `MM/DD/YYYY` form.
pub(crate) fn parse_trip_date(value: &str) -> Result<NaiveDate, Error> {
    dates::parse_trip_date(value)
        .map_err(|_| Error::invalid_request("Invalid date format. Use MM/DD/YYYY."))
}

/// Parse an itinerary timestamp in RFC 2822 form.
pub(crate) fn parse_itinerary_date(value: &str) -> Result<DateTime<Utc>, Error> {
    dates::parse_itinerary_date(value).map_err(|_| {
        Error::invalid_request("Invalid date format. Use 'Fri, 08 Nov 2024 00:00:00 GMT'.")
    })
}

/// Parse an RSVP status a guest is allowed to set.
///
/// `INVITED` is the server-assigned initial state and cannot be chosen.
pub(crate) fn parse_settable_rsvp(value: &str) -> Result<RsvpStatus, Error> {
    match value.parse::<RsvpStatus>() {
        Ok(RsvpStatus::Invited) | Err(_) => Err(Error::invalid_request("Invalid RSVP status.")),
        Ok(status) => Ok(status),
    }
}

/// Parse an opaque user id supplied in a request body.
pub(crate) fn parse_user_id(value: &str, message: &'static str) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| Error::invalid_request(message))
}

/// Require a non-blank string field.
pub(crate) fn require_non_blank(value: &str, message: &'static str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(message));
    }
    Ok(())
}
