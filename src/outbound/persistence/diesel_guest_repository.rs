//! PostgreSQL-backed `GuestRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GuestProfile, GuestRepository, RepositoryError};
use crate::domain::{RsvpStatus, TripGuest, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTripGuestRow, TripGuestRow};
use super::pool::DbPool;
use super::schema::{trip_guests, users};

const DUPLICATE_GUEST: &str = "User is already a guest of this trip.";

/// Diesel-backed implementation of the guest repository port.
#[derive(Clone)]
pub struct DieselGuestRepository {
    pool: DbPool,
}

impl DieselGuestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row into a validated domain guest.
pub(crate) fn row_to_guest(row: TripGuestRow) -> Result<TripGuest, RepositoryError> {
    let guest_id =
        UserId::new(row.guest_id).map_err(|err| RepositoryError::query(err.to_string()))?;
    let rsvp_status = row
        .rsvp_status
        .parse::<RsvpStatus>()
        .map_err(|err| RepositoryError::query(err.to_string()))?;
    Ok(TripGuest {
        trip_id: row.trip_id,
        guest_id,
        is_host: row.is_host,
        rsvp_status,
    })
}

#[async_trait]
impl GuestRepository for DieselGuestRepository {
    async fn list(&self, trip_id: i32) -> Result<Vec<GuestProfile>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(TripGuestRow, String, String)> = trip_guests::table
            .inner_join(users::table.on(users::id.eq(trip_guests::guest_id)))
            .filter(trip_guests::trip_id.eq(trip_id))
            .select((
                TripGuestRow::as_select(),
                users::first_name,
                users::last_name,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error(DUPLICATE_GUEST))?;

        rows.into_iter()
            .map(|(row, first_name, last_name)| {
                Ok(GuestProfile {
                    guest: row_to_guest(row)?,
                    first_name,
                    last_name,
                })
            })
            .collect()
    }

    async fn find(
        &self,
        trip_id: i32,
        user_id: &UserId,
    ) -> Result<Option<TripGuest>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = trip_guests::table
            .filter(trip_guests::trip_id.eq(trip_id))
            .filter(trip_guests::guest_id.eq(user_id.as_str()))
            .select(TripGuestRow::as_select())
            .first::<TripGuestRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error(DUPLICATE_GUEST))?;

        row.map(row_to_guest).transpose()
    }

    async fn add(&self, guest: &TripGuest) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewTripGuestRow {
            trip_id: guest.trip_id,
            guest_id: guest.guest_id.as_str(),
            is_host: guest.is_host,
            rsvp_status: guest.rsvp_status.as_str(),
        };

        diesel::insert_into(trip_guests::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error(DUPLICATE_GUEST))
    }

    async fn remove(&self, trip_id: i32, user_id: &UserId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(
            trip_guests::table
                .filter(trip_guests::trip_id.eq(trip_id))
                .filter(trip_guests::guest_id.eq(user_id.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error(DUPLICATE_GUEST))?;

        Ok(affected > 0)
    }

    async fn set_rsvp(
        &self,
        trip_id: i32,
        user_id: &UserId,
        status: RsvpStatus,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(
            trip_guests::table
                .filter(trip_guests::trip_id.eq(trip_id))
                .filter(trip_guests::guest_id.eq(user_id.as_str())),
        )
        .set(trip_guests::rsvp_status.eq(status.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error(DUPLICATE_GUEST))?;

        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> TripGuestRow {
        TripGuestRow {
            id: 1,
            trip_id: 7,
            guest_id: "user-guest".to_owned(),
            is_host: false,
            rsvp_status: "MAYBE".to_owned(),
        }
    }

    #[rstest]
    fn valid_rows_convert(valid_row: TripGuestRow) {
        let guest = row_to_guest(valid_row).expect("valid row converts");
        assert_eq!(guest.rsvp_status, RsvpStatus::Maybe);
        assert!(!guest.is_host);
    }

    #[rstest]
    #[case("pending")]
    #[case("")]
    fn unknown_rsvp_values_are_query_errors(mut valid_row: TripGuestRow, #[case] rsvp: &str) {
        valid_row.rsvp_status = rsvp.to_owned();
        let error = row_to_guest(valid_row).expect_err("bad rsvp rejected");
        assert!(matches!(error, RepositoryError::Query { .. }));
    }
}
