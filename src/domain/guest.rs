//! Trip membership and RSVP state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::user::UserId;

/// A guest's response state to a trip invitation.
///
/// Stored as text; parsing rejects anything outside the closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsvpStatus {
    Invited,
    Yes,
    No,
    Maybe,
}

/// Error raised when parsing an RSVP status from the wire or a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid RSVP status.")]
pub struct InvalidRsvpStatus;

impl RsvpStatus {
    /// Stable storage/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invited => "INVITED",
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Maybe => "MAYBE",
        }
    }
}

impl FromStr for RsvpStatus {
    type Err = InvalidRsvpStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "INVITED" => Ok(Self::Invited),
            "YES" => Ok(Self::Yes),
            "NO" => Ok(Self::No),
            "MAYBE" => Ok(Self::Maybe),
            _ => Err(InvalidRsvpStatus),
        }
    }
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership row linking a user to a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripGuest {
    pub trip_id: i32,
    pub guest_id: UserId,
    pub is_host: bool,
    pub rsvp_status: RsvpStatus,
}
