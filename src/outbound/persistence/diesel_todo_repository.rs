//! PostgreSQL-backed `TodoRepository` implementation using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, TodoChanges, TodoRepository};
use crate::domain::{TripTodo, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTripTodoRow, TripTodoRow};
use super::pool::DbPool;
use super::schema::trip_todos;

const DUPLICATE_TODO: &str = "Todo already exists.";

/// Diesel-backed implementation of the todo repository port.
#[derive(Clone)]
pub struct DieselTodoRepository {
    pool: DbPool,
}

impl DieselTodoRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row into a validated domain todo.
pub(crate) fn row_to_todo(row: TripTodoRow) -> Result<TripTodo, RepositoryError> {
    let last_updated_by =
        UserId::new(row.last_updated_by).map_err(|err| RepositoryError::query(err.to_string()))?;
    Ok(TripTodo {
        id: row.id,
        trip_id: row.trip_id,
        text: row.text,
        checked: row.checked,
        last_updated_by,
        last_updated_at: row.last_updated_at,
    })
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn add(&self, todo: &TripTodo) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewTripTodoRow {
            id: todo.id.as_str(),
            trip_id: todo.trip_id,
            text: todo.text.as_str(),
            checked: todo.checked,
            last_updated_by: todo.last_updated_by.as_str(),
            last_updated_at: todo.last_updated_at,
        };

        diesel::insert_into(trip_todos::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error(DUPLICATE_TODO))
    }

    async fn update(
        &self,
        trip_id: i32,
        todo_id: &str,
        changes: &TodoChanges,
        updated_by: &UserId,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let target = trip_todos::table
            .filter(trip_todos::trip_id.eq(trip_id))
            .filter(trip_todos::id.eq(todo_id));
        let audit = (
            trip_todos::last_updated_by.eq(updated_by.as_str()),
            trip_todos::last_updated_at.eq(updated_at),
        );

        let affected = match (changes.text.as_deref(), changes.checked) {
            (Some(text), Some(checked)) => {
                diesel::update(target)
                    .set((
                        trip_todos::text.eq(text),
                        trip_todos::checked.eq(checked),
                        audit,
                    ))
                    .execute(&mut conn)
                    .await
            }
            (Some(text), None) => {
                diesel::update(target)
                    .set((trip_todos::text.eq(text), audit))
                    .execute(&mut conn)
                    .await
            }
            (None, Some(checked)) => {
                diesel::update(target)
                    .set((trip_todos::checked.eq(checked), audit))
                    .execute(&mut conn)
                    .await
            }
            (None, None) => diesel::update(target).set(audit).execute(&mut conn).await,
        }
        .map_err(map_diesel_error(DUPLICATE_TODO))?;

        Ok(affected > 0)
    }

    async fn list(&self, trip_id: i32) -> Result<Vec<TripTodo>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TripTodoRow> = trip_todos::table
            .filter(trip_todos::trip_id.eq(trip_id))
            .order(trip_todos::last_updated_at.asc())
            .select(TripTodoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error(DUPLICATE_TODO))?;

        rows.into_iter().map(row_to_todo).collect()
    }

    async fn remove(&self, trip_id: i32, todo_id: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(
            trip_todos::table
                .filter(trip_todos::trip_id.eq(trip_id))
                .filter(trip_todos::id.eq(todo_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error(DUPLICATE_TODO))?;

        Ok(affected > 0)
    }
}
