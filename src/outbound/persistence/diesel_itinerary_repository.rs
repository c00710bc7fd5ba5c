//! PostgreSQL-backed `ItineraryRepository` implementation using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ItineraryEntry;
use crate::domain::ports::{ItineraryRepository, RepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ItineraryEntryRow, NewItineraryEntryRow};
use super::pool::DbPool;
use super::schema::itinerary_entries;

const DUPLICATE_ENTRY: &str = "Itinerary item already exists.";

/// Diesel-backed implementation of the itinerary repository port.
#[derive(Clone)]
pub struct DieselItineraryRepository {
    pool: DbPool,
}

impl DieselItineraryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: ItineraryEntryRow) -> ItineraryEntry {
    ItineraryEntry {
        id: row.id,
        trip_id: row.trip_id,
        date: row.date,
        description: row.description,
    }
}

#[async_trait]
impl ItineraryRepository for DieselItineraryRepository {
    async fn add(&self, entry: &ItineraryEntry) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewItineraryEntryRow {
            id: entry.id.as_str(),
            trip_id: entry.trip_id,
            date: entry.date,
            description: entry.description.as_str(),
        };

        diesel::insert_into(itinerary_entries::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error(DUPLICATE_ENTRY))
    }

    async fn update(
        &self,
        trip_id: i32,
        entry_id: &str,
        date: DateTime<Utc>,
        description: &str,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(
            itinerary_entries::table
                .filter(itinerary_entries::trip_id.eq(trip_id))
                .filter(itinerary_entries::id.eq(entry_id)),
        )
        .set((
            itinerary_entries::date.eq(date),
            itinerary_entries::description.eq(description),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error(DUPLICATE_ENTRY))?;

        Ok(affected > 0)
    }

    async fn list(&self, trip_id: i32) -> Result<Vec<ItineraryEntry>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ItineraryEntryRow> = itinerary_entries::table
            .filter(itinerary_entries::trip_id.eq(trip_id))
            .order(itinerary_entries::date.asc())
            .select(ItineraryEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error(DUPLICATE_ENTRY))?;

        Ok(rows.into_iter().map(row_to_entry).collect())
    }

    async fn remove(&self, trip_id: i32, entry_id: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(
            itinerary_entries::table
                .filter(itinerary_entries::trip_id.eq(trip_id))
                .filter(itinerary_entries::id.eq(entry_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error(DUPLICATE_ENTRY))?;

        Ok(affected > 0)
    }
}
