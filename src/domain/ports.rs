//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (database, identity provider, object storage). Each trait exposes strongly
//! typed errors so adapters map their failures into predictable variants
//! instead of returning `anyhow::Result`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use super::error::Error;
use super::expense::TripExpense;
use super::guest::{RsvpStatus, TripGuest};
use super::itinerary::ItineraryEntry;
use super::location::LocationCategory;
use super::todo::TripTodo;
use super::trip::{Trip, TripDraft};
use super::upload::{DocumentCategory, UserUpload};
use super::user::{User, UserId};

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Persistence errors raised by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Connection could not be established or was lost mid-call.
    #[error("repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("repository query failed: {message}")]
    Query { message: String },
    /// A uniqueness constraint was violated.
    #[error("{message}")]
    Conflict { message: String },
}

impl RepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for uniqueness conflicts.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for Error {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Connection { .. } => Error::service_unavailable("Database unavailable."),
            RepositoryError::Query { message } => Error::internal(message),
            RepositoryError::Conflict { message } => Error::conflict(message),
        }
    }
}

/// Errors raised by the identity verification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The credential was rejected as invalid or expired.
    #[error("identity credential rejected: {message}")]
    Rejected { message: String },
    /// The identity provider could not be reached.
    #[error("identity provider unavailable: {message}")]
    Unavailable { message: String },
}

impl IdentityError {
    /// Helper for rejected credentials.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Helper for provider outages.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl From<IdentityError> for Error {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Rejected { .. } => Error::unauthorized("Token is invalid."),
            IdentityError::Unavailable { .. } => {
                Error::service_unavailable("Identity provider unavailable.")
            }
        }
    }
}

/// Errors raised by the object storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectStoreError {
    /// The request never completed (network, timeout).
    #[error("object store request failed: {message}")]
    Transport { message: String },
    /// The store answered with a failure status.
    #[error("object store rejected the request: {message}")]
    Rejected { message: String },
}

impl ObjectStoreError {
    /// Helper for transport-level failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for rejected requests.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

impl From<ObjectStoreError> for Error {
    fn from(_: ObjectStoreError) -> Self {
        Error::internal("Could not generate URL.")
    }
}

// ---------------------------------------------------------------------------
// External collaborators
// ---------------------------------------------------------------------------

/// Verified identity derived from a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub phone_number: String,
}

/// Port for the external identity provider.
///
/// The backend keeps no session state: every request re-derives the caller's
/// identity from the presented credential.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a bearer credential and yield the caller's identity.
    async fn verify(&self, bearer_token: &str) -> Result<Identity, IdentityError>;
}

/// Port for the object storage collaborator.
///
/// All three operations are best-effort network calls that may fail
/// independently of any database transaction.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Issue a time-limited URL a client can PUT an object to.
    async fn issue_upload_url(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, ObjectStoreError>;

    /// Issue a time-limited URL a client can GET an object from.
    async fn issue_download_url(&self, key: &str, ttl: Duration)
    -> Result<String, ObjectStoreError>;

    /// Delete the object stored under `key`.
    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError>;
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Persistence port for user profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new profile. Fails with `Conflict` when the id or phone
    /// number is already registered.
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;

    /// Fetch a profile by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
}

// ---------------------------------------------------------------------------
// Trip aggregate
// ---------------------------------------------------------------------------

/// Partial update for a trip; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// A trip paired with the caller's own RSVP status.
#[derive(Debug, Clone, PartialEq)]
pub struct TripMembership {
    pub trip: Trip,
    pub rsvp_status: RsvpStatus,
}

/// Persistence port for the trip aggregate.
///
/// Creation and deletion span multiple tables and must each commit as one
/// unit: a failure anywhere rolls back the whole call.
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Insert the trip, its host guest row (`is_host = true`, RSVP `YES`) and
    /// one empty itinerary entry per calendar day, all in one transaction.
    async fn create(&self, draft: &TripDraft) -> Result<Trip, RepositoryError>;

    /// Fetch a trip by id.
    async fn find_by_id(&self, trip_id: i32) -> Result<Option<Trip>, RepositoryError>;

    /// Resolve an invite token to its trip.
    async fn find_by_token(&self, token: &str) -> Result<Option<Trip>, RepositoryError>;

    /// Every trip the user is a guest of, with the user's RSVP status.
    async fn list_for_guest(&self, user_id: &UserId)
    -> Result<Vec<TripMembership>, RepositoryError>;

    /// Apply a partial update. Returns false when the trip does not exist.
    async fn update(&self, trip_id: i32, changes: &TripChanges) -> Result<bool, RepositoryError>;

    /// Transfer hostship: flips `is_host` on exactly the two affected guest
    /// rows and repoints `trips.host_id`, in one transaction.
    async fn set_host(
        &self,
        trip_id: i32,
        current_host: &UserId,
        new_host: &UserId,
    ) -> Result<(), RepositoryError>;

    /// Delete the trip and every dependent row in one transaction.
    ///
    /// Returns the object keys of the trip's uploads so the caller can
    /// request object deletions after the transaction commits.
    async fn delete_aggregate(&self, trip_id: i32) -> Result<Vec<String>, RepositoryError>;
}

// ---------------------------------------------------------------------------
// Guests
// ---------------------------------------------------------------------------

/// A guest row joined with the user's display names.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestProfile {
    pub guest: TripGuest,
    pub first_name: String,
    pub last_name: String,
}

/// Persistence port for trip membership.
#[async_trait]
pub trait GuestRepository: Send + Sync {
    /// All guests of a trip with their names.
    async fn list(&self, trip_id: i32) -> Result<Vec<GuestProfile>, RepositoryError>;

    /// A single membership row, if the user is a guest.
    async fn find(
        &self,
        trip_id: i32,
        user_id: &UserId,
    ) -> Result<Option<TripGuest>, RepositoryError>;

    /// Add a guest. Fails with `Conflict` when already a member.
    async fn add(&self, guest: &TripGuest) -> Result<(), RepositoryError>;

    /// Remove a guest row. Returns false when no row matched.
    async fn remove(&self, trip_id: i32, user_id: &UserId) -> Result<bool, RepositoryError>;

    /// Update a guest's RSVP status. Returns false when no row matched.
    async fn set_rsvp(
        &self,
        trip_id: i32,
        user_id: &UserId,
        status: RsvpStatus,
    ) -> Result<bool, RepositoryError>;
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

/// One user's slice of an expense as supplied by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareInput {
    pub user_id: UserId,
    pub amount: f64,
}

/// A new expense with its splits, inserted in one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub trip_id: i32,
    pub payer_id: UserId,
    pub title: String,
    pub amount: f64,
    pub shares: Vec<ShareInput>,
}

/// A share joined with the involved user's names.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareDetail {
    pub user_id: UserId,
    pub amount: f64,
    pub first_name: String,
    pub last_name: String,
}

/// An expense joined with the payer's names and its shares.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub expense: TripExpense,
    pub payer_first_name: String,
    pub payer_last_name: String,
    pub shares: Vec<ShareDetail>,
}

/// Persistence port for expenses and their shares.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Insert an expense plus its share rows in one transaction; returns the
    /// new expense id.
    async fn add(&self, expense: &NewExpense) -> Result<i32, RepositoryError>;

    /// Fetch an expense by id.
    async fn find(&self, expense_id: i32) -> Result<Option<TripExpense>, RepositoryError>;

    /// Update title/amount and upsert the listed shares in one transaction.
    async fn update(
        &self,
        expense_id: i32,
        title: &str,
        amount: f64,
        shares: &[ShareInput],
    ) -> Result<(), RepositoryError>;

    /// Flip the settled flag. Returns false when no row matched.
    async fn set_settled(&self, expense_id: i32, settled: bool) -> Result<bool, RepositoryError>;

    /// All expenses of a trip with payer names and shares.
    async fn list(&self, trip_id: i32) -> Result<Vec<ExpenseRecord>, RepositoryError>;

    /// Delete an expense and its shares in one transaction.
    async fn remove(&self, expense_id: i32) -> Result<(), RepositoryError>;
}

// ---------------------------------------------------------------------------
// Locations & categories
// ---------------------------------------------------------------------------

/// A new pinned location; `category_name` is resolved (and auto-created on
/// first reference) inside the insert transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub trip_id: i32,
    pub user_id: UserId,
    pub place_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category_name: Option<String>,
}

/// Partial update for a pinned location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationChanges {
    pub name: Option<String>,
    pub category_name: Option<String>,
}

/// A location joined with its resolved category name, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub place_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
}

/// Persistence port for locations and their categories.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Create a category. Fails with `Conflict` on a duplicate name.
    async fn add_category(&self, trip_id: i32, name: &str) -> Result<(), RepositoryError>;

    /// Rename a category. Returns false when the old name does not exist.
    async fn rename_category(
        &self,
        trip_id: i32,
        old_name: &str,
        new_name: &str,
    ) -> Result<bool, RepositoryError>;

    /// Delete a category and every location referencing it, in one
    /// transaction. Returns false when the name does not exist.
    async fn remove_category(&self, trip_id: i32, name: &str) -> Result<bool, RepositoryError>;

    /// Categories defined for a trip.
    async fn list_categories(&self, trip_id: i32)
    -> Result<Vec<LocationCategory>, RepositoryError>;

    /// Pin a location, resolving or creating its category in the same
    /// transaction. Fails with `Conflict` on a duplicate `place_id`.
    async fn add(&self, location: &NewLocation) -> Result<(), RepositoryError>;

    /// Apply a partial update by `place_id`. Returns false when no row
    /// matched.
    async fn update(
        &self,
        trip_id: i32,
        place_id: &str,
        changes: &LocationChanges,
    ) -> Result<bool, RepositoryError>;

    /// Remove a location by `place_id`. Returns false when no row matched.
    async fn remove(&self, trip_id: i32, place_id: &str) -> Result<bool, RepositoryError>;

    /// All locations of a trip with resolved category names.
    async fn list(&self, trip_id: i32) -> Result<Vec<LocationRecord>, RepositoryError>;
}

// ---------------------------------------------------------------------------
// Itinerary
// ---------------------------------------------------------------------------

/// Persistence port for itinerary entries.
#[async_trait]
pub trait ItineraryRepository: Send + Sync {
    /// Insert an entry. Fails with `Conflict` on a duplicate id.
    async fn add(&self, entry: &ItineraryEntry) -> Result<(), RepositoryError>;

    /// Update an entry's date and description. Returns false when no row
    /// matched.
    async fn update(
        &self,
        trip_id: i32,
        entry_id: &str,
        date: DateTime<Utc>,
        description: &str,
    ) -> Result<bool, RepositoryError>;

    /// All entries of a trip, ordered by date.
    async fn list(&self, trip_id: i32) -> Result<Vec<ItineraryEntry>, RepositoryError>;

    /// Remove an entry. Returns false when no row matched.
    async fn remove(&self, trip_id: i32, entry_id: &str) -> Result<bool, RepositoryError>;
}

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

/// Partial update for a todo item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    pub text: Option<String>,
    pub checked: Option<bool>,
}

/// Persistence port for trip checklists.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a todo. Fails with `Conflict` on a duplicate id.
    async fn add(&self, todo: &TripTodo) -> Result<(), RepositoryError>;

    /// Apply a partial update, stamping the auditing columns. Returns false
    /// when no row matched.
    async fn update(
        &self,
        trip_id: i32,
        todo_id: &str,
        changes: &TodoChanges,
        updated_by: &UserId,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;

    /// All todos of a trip.
    async fn list(&self, trip_id: i32) -> Result<Vec<TripTodo>, RepositoryError>;

    /// Remove a todo. Returns false when no row matched.
    async fn remove(&self, trip_id: i32, todo_id: &str) -> Result<bool, RepositoryError>;
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

/// A new upload pointer recorded after the client reports success.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUpload {
    pub upload_user_id: UserId,
    pub trip_id: i32,
    pub document_category: DocumentCategory,
    pub file_name: String,
    pub object_key: String,
}

/// Persistence port for upload metadata rows.
#[async_trait]
pub trait UploadRepository: Send + Sync {
    /// Record an upload pointer; returns the new row id.
    async fn record(&self, upload: &NewUpload) -> Result<i32, RepositoryError>;

    /// Fetch one pointer row by id.
    async fn find(&self, upload_id: i32) -> Result<Option<UserUpload>, RepositoryError>;

    /// Pointer rows for a trip, optionally narrowed to one category.
    async fn list(
        &self,
        trip_id: i32,
        category: Option<DocumentCategory>,
    ) -> Result<Vec<UserUpload>, RepositoryError>;

    /// Remove a pointer row. Returns false when no row matched.
    async fn remove(&self, upload_id: i32) -> Result<bool, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn connection_errors_map_to_service_unavailable() {
        let error: Error = RepositoryError::connection("pool timed out").into();
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        // Internal pool diagnostics must not reach clients.
        assert!(!error.message().contains("pool timed out"));
    }

    #[rstest]
    fn conflict_errors_keep_their_message() {
        let error: Error = RepositoryError::conflict("User is already a guest of this trip.").into();
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.message(), "User is already a guest of this trip.");
    }

    #[rstest]
    fn rejected_credentials_map_to_unauthorized() {
        let error: Error = IdentityError::rejected("expired").into();
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn identity_outage_maps_to_service_unavailable() {
        let error: Error = IdentityError::unavailable("timeout").into();
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
