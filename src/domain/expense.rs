//! Shared trip expenses and their per-user splits.

use chrono::{DateTime, Utc};

use super::user::UserId;

/// A single expense paid by one guest on behalf of a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripExpense {
    pub id: i32,
    pub trip_id: i32,
    pub user_id: UserId,
    pub title: String,
    pub amount: f64,
    pub settled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One user's slice of an expense.
///
/// `trip_id` is denormalised from the parent expense for query convenience
/// and must always match it.
#[derive(Debug, Clone, PartialEq)]
pub struct TripExpenseShare {
    pub id: i32,
    pub expense_id: i32,
    pub user_id: UserId,
    pub amount: f64,
    pub trip_id: i32,
}
