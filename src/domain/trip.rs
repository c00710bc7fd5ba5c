//! Trip aggregate root.
//!
//! A trip owns its guests, expenses, locations, itinerary, todos and upload
//! pointers. The invariants enforced here are the ones that must hold before
//! any row is written: a non-blank name and an ordered date range.

use chrono::{DateTime, NaiveDate, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::user::UserId;

/// A persisted trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: i32,
    pub token: String,
    pub name: String,
    pub description: Option<String>,
    pub host_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Number of calendar days in the inclusive `[start, end]` range.
    pub fn day_count(&self) -> i64 {
        day_count(self.start_date, self.end_date)
    }
}

/// Validation errors raised while assembling a [`TripDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripValidationError {
    /// Trip name is empty after trimming whitespace.
    #[error("Trip name is required.")]
    EmptyName,
    /// Start date falls after the end date.
    #[error("Start date cannot be later than end date.")]
    StartAfterEnd,
}

/// A validated trip ready to be persisted, before an id is assigned.
///
/// Construction derives the invite token, so a draft always carries
/// everything the aggregate insert needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDraft {
    pub token: String,
    pub name: String,
    pub description: Option<String>,
    pub host_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TripDraft {
    /// Validate the inputs and derive the invite token.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        host_id: UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, TripValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TripValidationError::EmptyName);
        }
        if start_date > end_date {
            return Err(TripValidationError::StartAfterEnd);
        }
        let token = derive_invite_token(&host_id, start_date, end_date);
        Ok(Self {
            token,
            name,
            description,
            host_id,
            start_date,
            end_date,
        })
    }

    /// Number of itinerary entries seeded alongside this trip.
    pub fn day_count(&self) -> i64 {
        day_count(self.start_date, self.end_date)
    }
}

fn day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Derive an opaque, unguessable invite token.
///
/// The digest covers the host id, both dates and a random nonce; hex encoding
/// keeps the token URL-safe so it can travel in links and query strings.
fn derive_invite_token(host_id: &UserId, start_date: NaiveDate, end_date: NaiveDate) -> String {
    let mut nonce = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut nonce);

    let mut hasher = Sha256::new();
    hasher.update(host_id.as_str().as_bytes());
    hasher.update(start_date.to_string().as_bytes());
    hasher.update(end_date.to_string().as_bytes());
    hasher.update(nonce);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn host() -> UserId {
        UserId::new("test_user").expect("fixture id")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[rstest]
    fn draft_rejects_blank_name(host: UserId) {
        let err = TripDraft::new("   ", None, host, date(2022, 1, 1), date(2022, 1, 2))
            .expect_err("blank name rejected");
        assert_eq!(err, TripValidationError::EmptyName);
    }

    #[rstest]
    fn draft_rejects_inverted_dates(host: UserId) {
        let err = TripDraft::new("Spain", None, host, date(2022, 1, 2), date(2022, 1, 1))
            .expect_err("inverted dates rejected");
        assert_eq!(err, TripValidationError::StartAfterEnd);
    }

    #[rstest]
    fn draft_accepts_single_day_trips(host: UserId) {
        let draft = TripDraft::new("Day out", None, host, date(2022, 1, 1), date(2022, 1, 1))
            .expect("valid draft");
        assert_eq!(draft.day_count(), 1);
    }

    #[rstest]
    fn day_count_is_inclusive(host: UserId) {
        let draft = TripDraft::new(
            "Test Trip",
            Some("Test Description".to_owned()),
            host,
            date(2022, 1, 1),
            date(2022, 1, 30),
        )
        .expect("valid draft");
        assert_eq!(draft.day_count(), 30);
    }

    #[rstest]
    fn invite_tokens_are_unique_per_draft(host: UserId) {
        let make = || {
            TripDraft::new(
                "Test Trip",
                None,
                host.clone(),
                date(2022, 1, 1),
                date(2022, 1, 30),
            )
            .expect("valid draft")
        };
        let first = make();
        let second = make();
        // The random nonce makes identical inputs produce distinct tokens.
        assert_ne!(first.token, second.token);
    }

    #[rstest]
    fn invite_tokens_are_url_safe_hex(host: UserId) {
        let draft = TripDraft::new("Test Trip", None, host, date(2022, 1, 1), date(2022, 1, 30))
            .expect("valid draft");
        assert_eq!(draft.token.len(), 64);
        assert!(draft.token.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
