//! PostgreSQL-backed `LocationRepository` implementation using Diesel.
//!
//! Categories are resolved by name inside the same transaction as the
//! location write, so a first reference creates the category atomically.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::LocationCategory;
use crate::domain::ports::{
    LocationChanges, LocationRecord, LocationRepository, NewLocation, RepositoryError,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LocationCategoryRow, NewLocationCategoryRow, NewTripLocationRow, TripLocationRow};
use super::pool::DbPool;
use super::schema::{location_categories, trip_locations};

const DUPLICATE_CATEGORY: &str = "Category already exists.";
const DUPLICATE_LOCATION: &str = "Location already exists.";

/// Diesel-backed implementation of the location repository port.
#[derive(Clone)]
pub struct DieselLocationRepository {
    pool: DbPool,
}

impl DieselLocationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Resolve a category id by name, creating the row on first reference.
async fn resolve_category(
    conn: &mut AsyncPgConnection,
    trip_id: i32,
    name: &str,
) -> Result<i32, diesel::result::Error> {
    let existing: Option<i32> = location_categories::table
        .filter(location_categories::trip_id.eq(trip_id))
        .filter(location_categories::name.eq(name))
        .select(location_categories::id)
        .first(conn)
        .await
        .optional()?;

    match existing {
        Some(id) => Ok(id),
        None => {
            let new_row = NewLocationCategoryRow { trip_id, name };
            diesel::insert_into(location_categories::table)
                .values(&new_row)
                .returning(location_categories::id)
                .get_result(conn)
                .await
        }
    }
}

#[async_trait]
impl LocationRepository for DieselLocationRepository {
    async fn add_category(&self, trip_id: i32, name: &str) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewLocationCategoryRow { trip_id, name };
        diesel::insert_into(location_categories::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error(DUPLICATE_CATEGORY))
    }

    async fn rename_category(
        &self,
        trip_id: i32,
        old_name: &str,
        new_name: &str,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(
            location_categories::table
                .filter(location_categories::trip_id.eq(trip_id))
                .filter(location_categories::name.eq(old_name)),
        )
        .set(location_categories::name.eq(new_name))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error(DUPLICATE_CATEGORY))?;

        Ok(affected > 0)
    }

    async fn remove_category(&self, trip_id: i32, name: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let name = name.to_owned();

        conn.transaction(|conn| {
            async move {
                let category_id: Option<i32> = location_categories::table
                    .filter(location_categories::trip_id.eq(trip_id))
                    .filter(location_categories::name.eq(name.as_str()))
                    .select(location_categories::id)
                    .first(conn)
                    .await
                    .optional()?;

                let Some(category_id) = category_id else {
                    return Ok(false);
                };

                // Deleting a category takes its locations with it.
                diesel::delete(
                    trip_locations::table.filter(trip_locations::category_id.eq(category_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(
                    location_categories::table.filter(location_categories::id.eq(category_id)),
                )
                .execute(conn)
                .await?;

                Ok::<bool, diesel::result::Error>(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error(DUPLICATE_CATEGORY))
    }

    async fn list_categories(
        &self,
        trip_id: i32,
    ) -> Result<Vec<LocationCategory>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LocationCategoryRow> = location_categories::table
            .filter(location_categories::trip_id.eq(trip_id))
            .order(location_categories::name.asc())
            .select(LocationCategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error(DUPLICATE_CATEGORY))?;

        Ok(rows
            .into_iter()
            .map(|row| LocationCategory {
                id: row.id,
                trip_id: row.trip_id,
                name: row.name,
            })
            .collect())
    }

    async fn add(&self, location: &NewLocation) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let location = location.clone();

        conn.transaction(|conn| {
            async move {
                let category_id = match location.category_name.as_deref() {
                    Some(name) => Some(resolve_category(conn, location.trip_id, name).await?),
                    None => None,
                };

                let new_row = NewTripLocationRow {
                    trip_id: location.trip_id,
                    user_id: location.user_id.as_str(),
                    place_id: location.place_id.as_str(),
                    name: location.name.as_str(),
                    latitude: location.latitude,
                    longitude: location.longitude,
                    category_id,
                };
                diesel::insert_into(trip_locations::table)
                    .values(&new_row)
                    .execute(conn)
                    .await?;

                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error(DUPLICATE_LOCATION))
    }

    async fn update(
        &self,
        trip_id: i32,
        place_id: &str,
        changes: &LocationChanges,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let place_id = place_id.to_owned();
        let changes = changes.clone();

        conn.transaction(|conn| {
            async move {
                let category_id = match changes.category_name.as_deref() {
                    Some(name) => Some(resolve_category(conn, trip_id, name).await?),
                    None => None,
                };

                let target = trip_locations::table
                    .filter(trip_locations::trip_id.eq(trip_id))
                    .filter(trip_locations::place_id.eq(place_id.as_str()));

                let affected = match (changes.name.as_deref(), category_id) {
                    (Some(name), Some(category)) => {
                        diesel::update(target)
                            .set((
                                trip_locations::name.eq(name),
                                trip_locations::category_id.eq(Some(category)),
                            ))
                            .execute(conn)
                            .await?
                    }
                    (Some(name), None) => {
                        diesel::update(target)
                            .set(trip_locations::name.eq(name))
                            .execute(conn)
                            .await?
                    }
                    (None, Some(category)) => {
                        diesel::update(target)
                            .set(trip_locations::category_id.eq(Some(category)))
                            .execute(conn)
                            .await?
                    }
                    (None, None) => target.count().get_result::<i64>(conn).await? as usize,
                };

                Ok::<bool, diesel::result::Error>(affected > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error(DUPLICATE_LOCATION))
    }

    async fn remove(&self, trip_id: i32, place_id: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(
            trip_locations::table
                .filter(trip_locations::trip_id.eq(trip_id))
                .filter(trip_locations::place_id.eq(place_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error(DUPLICATE_LOCATION))?;

        Ok(affected > 0)
    }

    async fn list(&self, trip_id: i32) -> Result<Vec<LocationRecord>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(TripLocationRow, Option<String>)> = trip_locations::table
            .left_join(
                location_categories::table
                    .on(trip_locations::category_id.eq(location_categories::id.nullable())),
            )
            .filter(trip_locations::trip_id.eq(trip_id))
            .order(trip_locations::name.asc())
            .select((
                TripLocationRow::as_select(),
                location_categories::name.nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error(DUPLICATE_LOCATION))?;

        Ok(rows
            .into_iter()
            .map(|(row, category_name)| LocationRecord {
                place_id: row.place_id,
                name: row.name,
                latitude: row.latitude,
                longitude: row.longitude,
                category_id: row.category_id,
                category_name,
            })
            .collect())
    }
}
