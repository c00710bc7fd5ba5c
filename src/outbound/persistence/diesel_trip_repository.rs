//! PostgreSQL-backed `TripRepository` implementation using Diesel.
//!
//! This adapter owns the trip aggregate lifecycle: creation seeds the host
//! guest row and the per-day itinerary in the same transaction as the trip,
//! and deletion tears down every dependent table atomically.

use async_trait::async_trait;
use chrono::NaiveTime;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RepositoryError, TripChanges, TripMembership, TripRepository};
use crate::domain::{RsvpStatus, Trip, TripDraft, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    NewItineraryEntryRow, NewTripGuestRow, NewTripRow, TripChangesRow, TripRow,
};
use super::pool::DbPool;
use super::schema::{
    itinerary_entries, location_categories, trip_expense_shares, trip_expenses, trip_guests,
    trip_locations, trip_todos, trips, user_uploads,
};

/// Diesel-backed implementation of the trip aggregate repository.
#[derive(Clone)]
pub struct DieselTripRepository {
    pool: DbPool,
}

impl DieselTripRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row into a validated domain trip.
pub(crate) fn row_to_trip(row: TripRow) -> Result<Trip, RepositoryError> {
    let TripRow {
        id,
        token,
        name,
        description,
        host_id,
        start_date,
        end_date,
        created_at,
    } = row;
    let host_id = UserId::new(host_id).map_err(|err| RepositoryError::query(err.to_string()))?;
    Ok(Trip {
        id,
        token,
        name,
        description,
        host_id,
        start_date,
        end_date,
        created_at,
    })
}

#[async_trait]
impl TripRepository for DieselTripRepository {
    async fn create(&self, draft: &TripDraft) -> Result<Trip, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_trip = NewTripRow {
            token: draft.token.as_str(),
            name: draft.name.as_str(),
            description: draft.description.as_deref(),
            host_id: draft.host_id.as_str(),
            start_date: draft.start_date,
            end_date: draft.end_date,
        };
        let start_date = draft.start_date;
        let end_date = draft.end_date;
        let host_id = draft.host_id.clone();

        let row = conn
            .transaction(|conn| {
                async move {
                    let row: TripRow = diesel::insert_into(trips::table)
                        .values(&new_trip)
                        .returning(TripRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let host_guest = NewTripGuestRow {
                        trip_id: row.id,
                        guest_id: host_id.as_str(),
                        is_host: true,
                        rsvp_status: RsvpStatus::Yes.as_str(),
                    };
                    diesel::insert_into(trip_guests::table)
                        .values(&host_guest)
                        .execute(conn)
                        .await?;

                    // One empty entry per calendar day, start and end inclusive.
                    let ids: Vec<String> = start_date
                        .iter_days()
                        .take_while(|day| *day <= end_date)
                        .map(|_| Uuid::new_v4().to_string())
                        .collect();
                    let seed_rows: Vec<NewItineraryEntryRow<'_>> = start_date
                        .iter_days()
                        .take_while(|day| *day <= end_date)
                        .zip(ids.iter())
                        .map(|(day, id)| NewItineraryEntryRow {
                            id: id.as_str(),
                            trip_id: row.id,
                            date: day.and_time(NaiveTime::MIN).and_utc(),
                            description: "",
                        })
                        .collect();
                    diesel::insert_into(itinerary_entries::table)
                        .values(&seed_rows)
                        .execute(conn)
                        .await?;

                    Ok::<TripRow, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error("Trip already exists."))?;

        row_to_trip(row)
    }

    async fn find_by_id(&self, trip_id: i32) -> Result<Option<Trip>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = trips::table
            .filter(trips::id.eq(trip_id))
            .select(TripRow::as_select())
            .first::<TripRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("Trip already exists."))?;

        row.map(row_to_trip).transpose()
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Trip>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = trips::table
            .filter(trips::token.eq(token))
            .select(TripRow::as_select())
            .first::<TripRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("Trip already exists."))?;

        row.map(row_to_trip).transpose()
    }

    async fn list_for_guest(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TripMembership>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(TripRow, String)> = trips::table
            .inner_join(trip_guests::table.on(trip_guests::trip_id.eq(trips::id)))
            .filter(trip_guests::guest_id.eq(user_id.as_str()))
            .order(trips::start_date.asc())
            .select((TripRow::as_select(), trip_guests::rsvp_status))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("Trip already exists."))?;

        rows.into_iter()
            .map(|(row, rsvp)| {
                let trip = row_to_trip(row)?;
                let rsvp_status = rsvp
                    .parse::<RsvpStatus>()
                    .map_err(|err| RepositoryError::query(err.to_string()))?;
                Ok(TripMembership { trip, rsvp_status })
            })
            .collect()
    }

    async fn update(&self, trip_id: i32, changes: &TripChanges) -> Result<bool, RepositoryError> {
        // Diesel rejects an empty changeset, so a no-field update degrades to
        // an existence check.
        if changes == &TripChanges::default() {
            return Ok(self.find_by_id(trip_id).await?.is_some());
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = TripChangesRow {
            name: changes.name.as_deref(),
            description: changes.description.as_deref(),
            start_date: changes.start_date,
            end_date: changes.end_date,
        };

        let affected = diesel::update(trips::table.filter(trips::id.eq(trip_id)))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error("Trip already exists."))?;

        Ok(affected > 0)
    }

    async fn set_host(
        &self,
        trip_id: i32,
        current_host: &UserId,
        new_host: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let current = current_host.clone();
        let next = new_host.clone();

        conn.transaction(|conn| {
            async move {
                diesel::update(
                    trip_guests::table
                        .filter(trip_guests::trip_id.eq(trip_id))
                        .filter(trip_guests::guest_id.eq(current.as_str())),
                )
                .set(trip_guests::is_host.eq(false))
                .execute(conn)
                .await?;

                diesel::update(
                    trip_guests::table
                        .filter(trip_guests::trip_id.eq(trip_id))
                        .filter(trip_guests::guest_id.eq(next.as_str())),
                )
                .set(trip_guests::is_host.eq(true))
                .execute(conn)
                .await?;

                diesel::update(trips::table.filter(trips::id.eq(trip_id)))
                    .set(trips::host_id.eq(next.as_str()))
                    .execute(conn)
                    .await?;

                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error("Trip already exists."))
    }

    async fn delete_aggregate(&self, trip_id: i32) -> Result<Vec<String>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let object_keys: Vec<String> = user_uploads::table
                    .filter(user_uploads::trip_id.eq(trip_id))
                    .select(user_uploads::object_key)
                    .load(conn)
                    .await?;

                diesel::delete(
                    trip_expense_shares::table.filter(trip_expense_shares::trip_id.eq(trip_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(trip_expenses::table.filter(trip_expenses::trip_id.eq(trip_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(trip_locations::table.filter(trip_locations::trip_id.eq(trip_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    location_categories::table.filter(location_categories::trip_id.eq(trip_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(
                    itinerary_entries::table.filter(itinerary_entries::trip_id.eq(trip_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(trip_todos::table.filter(trip_todos::trip_id.eq(trip_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(user_uploads::table.filter(user_uploads::trip_id.eq(trip_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(trip_guests::table.filter(trip_guests::trip_id.eq(trip_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(trips::table.filter(trips::id.eq(trip_id)))
                    .execute(conn)
                    .await?;

                Ok::<Vec<String>, diesel::result::Error>(object_keys)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error("Trip already exists."))
    }
}
