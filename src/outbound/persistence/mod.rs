//! PostgreSQL persistence adapters.
//!
//! One Diesel-backed repository per domain port, sharing the async pool and
//! the error mapping helpers. Embedded migrations keep the live schema in
//! step with `schema.rs`.

mod diesel_expense_repository;
mod diesel_guest_repository;
mod diesel_itinerary_repository;
mod diesel_location_repository;
mod diesel_todo_repository;
mod diesel_trip_repository;
mod diesel_upload_repository;
mod diesel_user_repository;
mod error_mapping;
pub(crate) mod models;
pub mod pool;
pub mod schema;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub use diesel_expense_repository::DieselExpenseRepository;
pub use diesel_guest_repository::DieselGuestRepository;
pub use diesel_itinerary_repository::DieselItineraryRepository;
pub use diesel_location_repository::DieselLocationRepository;
pub use diesel_todo_repository::DieselTodoRepository;
pub use diesel_trip_repository::DieselTripRepository;
pub use diesel_upload_repository::DieselUploadRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolError, PoolSettings};

/// Migrations shipped with the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations over a short-lived synchronous connection.
///
/// Runs once at startup, before the async pool takes over.
pub fn run_migrations(database_url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| format!("failed to connect for migrations: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|err| format!("failed to run migrations: {err}"))
}
