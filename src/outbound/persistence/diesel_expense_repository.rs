//! PostgreSQL-backed `ExpenseRepository` implementation using Diesel.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::TripExpense;
use crate::domain::UserId;
use crate::domain::ports::{
    ExpenseRecord, ExpenseRepository, NewExpense, RepositoryError, ShareDetail, ShareInput,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTripExpenseRow, NewTripExpenseShareRow, TripExpenseRow};
use super::pool::DbPool;
use super::schema::{trip_expense_shares, trip_expenses, users};

const EXPENSE_CONFLICT: &str = "Expense already exists.";

/// Diesel-backed implementation of the expense repository port.
#[derive(Clone)]
pub struct DieselExpenseRepository {
    pool: DbPool,
}

impl DieselExpenseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row into a validated domain expense.
pub(crate) fn row_to_expense(row: TripExpenseRow) -> Result<TripExpense, RepositoryError> {
    let TripExpenseRow {
        id,
        trip_id,
        user_id,
        title,
        amount,
        settled,
        created_at,
        updated_at,
    } = row;
    let user_id = UserId::new(user_id).map_err(|err| RepositoryError::query(err.to_string()))?;
    Ok(TripExpense {
        id,
        trip_id,
        user_id,
        title,
        amount,
        settled,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl ExpenseRepository for DieselExpenseRepository {
    async fn add(&self, expense: &NewExpense) -> Result<i32, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewTripExpenseRow {
            trip_id: expense.trip_id,
            user_id: expense.payer_id.as_str(),
            title: expense.title.as_str(),
            amount: expense.amount,
            settled: false,
        };
        let trip_id = expense.trip_id;
        let shares = expense.shares.clone();

        conn.transaction(|conn| {
            async move {
                let expense_id: i32 = diesel::insert_into(trip_expenses::table)
                    .values(&new_row)
                    .returning(trip_expenses::id)
                    .get_result(conn)
                    .await?;

                let share_rows: Vec<NewTripExpenseShareRow<'_>> = shares
                    .iter()
                    .map(|share| NewTripExpenseShareRow {
                        expense_id,
                        user_id: share.user_id.as_str(),
                        amount: share.amount,
                        trip_id,
                    })
                    .collect();
                diesel::insert_into(trip_expense_shares::table)
                    .values(&share_rows)
                    .execute(conn)
                    .await?;

                Ok::<i32, diesel::result::Error>(expense_id)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error(EXPENSE_CONFLICT))
    }

    async fn find(&self, expense_id: i32) -> Result<Option<TripExpense>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = trip_expenses::table
            .filter(trip_expenses::id.eq(expense_id))
            .select(TripExpenseRow::as_select())
            .first::<TripExpenseRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error(EXPENSE_CONFLICT))?;

        row.map(row_to_expense).transpose()
    }

    async fn update(
        &self,
        expense_id: i32,
        title: &str,
        amount: f64,
        shares: &[ShareInput],
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let title = title.to_owned();
        let shares = shares.to_vec();

        conn.transaction(|conn| {
            async move {
                let trip_id: i32 = diesel::update(
                    trip_expenses::table.filter(trip_expenses::id.eq(expense_id)),
                )
                .set((
                    trip_expenses::title.eq(title.as_str()),
                    trip_expenses::amount.eq(amount),
                    trip_expenses::updated_at.eq(Utc::now()),
                ))
                .returning(trip_expenses::trip_id)
                .get_result(conn)
                .await?;

                for share in &shares {
                    let existing: Option<i32> = trip_expense_shares::table
                        .filter(trip_expense_shares::expense_id.eq(expense_id))
                        .filter(trip_expense_shares::user_id.eq(share.user_id.as_str()))
                        .select(trip_expense_shares::id)
                        .first(conn)
                        .await
                        .optional()?;

                    match existing {
                        Some(share_id) => {
                            diesel::update(
                                trip_expense_shares::table
                                    .filter(trip_expense_shares::id.eq(share_id)),
                            )
                            .set(trip_expense_shares::amount.eq(share.amount))
                            .execute(conn)
                            .await?;
                        }
                        None => {
                            let new_share = NewTripExpenseShareRow {
                                expense_id,
                                user_id: share.user_id.as_str(),
                                amount: share.amount,
                                trip_id,
                            };
                            diesel::insert_into(trip_expense_shares::table)
                                .values(&new_share)
                                .execute(conn)
                                .await?;
                        }
                    }
                }

                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error(EXPENSE_CONFLICT))
    }

    async fn set_settled(&self, expense_id: i32, settled: bool) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected =
            diesel::update(trip_expenses::table.filter(trip_expenses::id.eq(expense_id)))
                .set((
                    trip_expenses::settled.eq(settled),
                    trip_expenses::updated_at.eq(Utc::now()),
                ))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error(EXPENSE_CONFLICT))?;

        Ok(affected > 0)
    }

    async fn list(&self, trip_id: i32) -> Result<Vec<ExpenseRecord>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let expense_rows: Vec<(TripExpenseRow, String, String)> = trip_expenses::table
            .inner_join(users::table.on(users::id.eq(trip_expenses::user_id)))
            .filter(trip_expenses::trip_id.eq(trip_id))
            .order(trip_expenses::created_at.asc())
            .select((
                TripExpenseRow::as_select(),
                users::first_name,
                users::last_name,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error(EXPENSE_CONFLICT))?;

        let share_rows: Vec<(i32, String, f64, String, String)> = trip_expense_shares::table
            .inner_join(users::table.on(users::id.eq(trip_expense_shares::user_id)))
            .filter(trip_expense_shares::trip_id.eq(trip_id))
            .select((
                trip_expense_shares::expense_id,
                trip_expense_shares::user_id,
                trip_expense_shares::amount,
                users::first_name,
                users::last_name,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error(EXPENSE_CONFLICT))?;

        let mut shares_by_expense: HashMap<i32, Vec<ShareDetail>> = HashMap::new();
        for (expense_id, user_id, amount, first_name, last_name) in share_rows {
            let user_id =
                UserId::new(user_id).map_err(|err| RepositoryError::query(err.to_string()))?;
            shares_by_expense
                .entry(expense_id)
                .or_default()
                .push(ShareDetail {
                    user_id,
                    amount,
                    first_name,
                    last_name,
                });
        }

        expense_rows
            .into_iter()
            .map(|(row, payer_first_name, payer_last_name)| {
                let expense = row_to_expense(row)?;
                let shares = shares_by_expense.remove(&expense.id).unwrap_or_default();
                Ok(ExpenseRecord {
                    expense,
                    payer_first_name,
                    payer_last_name,
                    shares,
                })
            })
            .collect()
    }

    async fn remove(&self, expense_id: i32) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::delete(
                    trip_expense_shares::table
                        .filter(trip_expense_shares::expense_id.eq(expense_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(trip_expenses::table.filter(trip_expenses::id.eq(expense_id)))
                    .execute(conn)
                    .await?;

                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error(EXPENSE_CONFLICT))
    }
}
