//! Shared trip checklists.

use chrono::{DateTime, Utc};

use super::user::UserId;

/// A checklist item owned by a trip.
///
/// Ids are client-supplied opaque strings. Every mutation stamps who touched
/// the item last and when.
#[derive(Debug, Clone, PartialEq)]
pub struct TripTodo {
    pub id: String,
    pub trip_id: i32,
    pub text: String,
    pub checked: bool,
    pub last_updated_by: UserId,
    pub last_updated_at: DateTime<Utc>,
}
