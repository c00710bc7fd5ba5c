//! Shared mapping from pool and Diesel failures into port errors.

use tracing::debug;

use crate::domain::ports::RepositoryError;

use super::pool::PoolError;

/// Map a pool failure into the repository connection variant.
pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    let (PoolError::Checkout(message) | PoolError::Build(message)) = error;
    RepositoryError::connection(message)
}

/// Map common Diesel error variants into repository errors.
///
/// Unique-constraint violations become `Conflict` carrying the caller's
/// message so handlers can surface a meaningful 409 body.
pub(crate) fn map_diesel_error(
    conflict_message: &'static str,
) -> impl Fn(diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    move |error| {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                RepositoryError::conflict(conflict_message)
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                RepositoryError::connection("database connection error")
            }
            DieselError::NotFound => RepositoryError::query("record not found"),
            _ => RepositoryError::query("database error"),
        }
    }
}
