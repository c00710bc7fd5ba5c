//! PostgreSQL-backed `UploadRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUpload, RepositoryError, UploadRepository};
use crate::domain::{DocumentCategory, UserId, UserUpload};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserUploadRow, UserUploadRow};
use super::pool::DbPool;
use super::schema::user_uploads;

const DUPLICATE_UPLOAD: &str = "Upload already exists.";

/// Diesel-backed implementation of the upload repository port.
#[derive(Clone)]
pub struct DieselUploadRepository {
    pool: DbPool,
}

impl DieselUploadRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row into a validated domain upload pointer.
pub(crate) fn row_to_upload(row: UserUploadRow) -> Result<UserUpload, RepositoryError> {
    let upload_user_id =
        UserId::new(row.upload_user_id).map_err(|err| RepositoryError::query(err.to_string()))?;
    let document_category = row
        .document_category
        .parse::<DocumentCategory>()
        .map_err(|err| RepositoryError::query(err.to_string()))?;
    Ok(UserUpload {
        id: row.id,
        upload_user_id,
        trip_id: row.trip_id,
        document_category,
        file_name: row.file_name,
        object_key: row.object_key,
        upload_timestamp: row.upload_timestamp,
    })
}

#[async_trait]
impl UploadRepository for DieselUploadRepository {
    async fn record(&self, upload: &NewUpload) -> Result<i32, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserUploadRow {
            upload_user_id: upload.upload_user_id.as_str(),
            trip_id: upload.trip_id,
            document_category: upload.document_category.as_str(),
            file_name: upload.file_name.as_str(),
            object_key: upload.object_key.as_str(),
        };

        diesel::insert_into(user_uploads::table)
            .values(&new_row)
            .returning(user_uploads::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error(DUPLICATE_UPLOAD))
    }

    async fn find(&self, upload_id: i32) -> Result<Option<UserUpload>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = user_uploads::table
            .filter(user_uploads::id.eq(upload_id))
            .select(UserUploadRow::as_select())
            .first::<UserUploadRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error(DUPLICATE_UPLOAD))?;

        row.map(row_to_upload).transpose()
    }

    async fn list(
        &self,
        trip_id: i32,
        category: Option<DocumentCategory>,
    ) -> Result<Vec<UserUpload>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = user_uploads::table
            .filter(user_uploads::trip_id.eq(trip_id))
            .into_boxed();
        if let Some(category) = category {
            query = query.filter(user_uploads::document_category.eq(category.as_str()));
        }

        let rows: Vec<UserUploadRow> = query
            .order(user_uploads::upload_timestamp.asc())
            .select(UserUploadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error(DUPLICATE_UPLOAD))?;

        rows.into_iter().map(row_to_upload).collect()
    }

    async fn remove(&self, upload_id: i32) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected =
            diesel::delete(user_uploads::table.filter(user_uploads::id.eq(upload_id)))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error(DUPLICATE_UPLOAD))?;

        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> UserUploadRow {
        UserUploadRow {
            id: 1,
            upload_user_id: "user-guest".to_owned(),
            trip_id: 7,
            document_category: "accommodation".to_owned(),
            file_name: "booking.pdf".to_owned(),
            object_key: "user_uploads/7/user-guest/booking.pdf".to_owned(),
            upload_timestamp: Utc::now(),
        }
    }

    #[rstest]
    fn valid_rows_convert(valid_row: UserUploadRow) {
        let upload = row_to_upload(valid_row).expect("valid row converts");
        assert_eq!(upload.document_category, DocumentCategory::Accommodation);
    }

    #[rstest]
    #[case("ACCOMMODATION")]
    #[case("passport")]
    fn unknown_categories_are_query_errors(mut valid_row: UserUploadRow, #[case] category: &str) {
        valid_row.document_category = category.to_owned();
        let error = row_to_upload(valid_row).expect_err("bad category rejected");
        assert!(matches!(error, RepositoryError::Query { .. }));
    }
}
