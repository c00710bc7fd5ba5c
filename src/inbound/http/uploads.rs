//! Document upload HTTP handlers.
//!
//! ```text
//! POST   /user_uploads/generate-presigned-url
//! POST   /user_uploads/save-upload-metadata
//! GET    /user_uploads/get-uploads
//! DELETE /user_uploads/delete-upload
//! ```
//!
//! The backend never proxies file bytes. Clients upload and download through
//! signed URLs; the database row recorded afterwards is the source of truth
//! for the object key.

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DocumentCategory, Error};
use crate::domain::ports::NewUpload;
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{require_guest, require_trip};
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponseBody;
use crate::inbound::http::validation::{parse_trip_id, require_non_blank};

/// Request payload for signing an upload or download URL.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GeneratePresignedUrlRequestBody {
    pub trip_id: i32,
    pub document_category: String,
    pub file_name: String,
    pub file_type: String,
    /// Either `upload` or `download`.
    pub url_type: String,
}

/// Response payload carrying a signed URL.
#[derive(Debug, Serialize, ToSchema)]
pub struct PresignedUrlResponseBody {
    pub url: String,
    pub object_key: String,
}

/// Request payload recording a completed upload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SaveUploadMetadataRequestBody {
    pub trip_id: i32,
    pub document_category: String,
    pub file_name: String,
    pub object_key: String,
}

/// Response payload after recording an upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveUploadMetadataResponseBody {
    pub message: String,
    pub upload_id: i32,
}

/// Request payload for deleting an upload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteUploadRequestBody {
    pub trip_id: i32,
    pub upload_id: i32,
}

/// One upload pointer as serialised to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadBody {
    pub id: i32,
    pub file_name: String,
    pub document_category: String,
    pub upload_user_id: String,
    pub object_key: String,
    pub upload_timestamp: String,
}

/// Response payload listing a trip's uploads.
#[derive(Debug, Serialize, ToSchema)]
pub struct GetUploadsResponseBody {
    pub uploads: Vec<UploadBody>,
}

/// Query parameters for listing uploads.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadsQuery {
    pub trip_id: String,
    pub document_category: Option<String>,
}

fn parse_document_category(value: &str) -> Result<DocumentCategory, Error> {
    value
        .parse::<DocumentCategory>()
        .map_err(|_| Error::invalid_request("Invalid document category."))
}

fn object_key_for(trip_id: i32, user_id: &str, file_name: &str) -> String {
    format!("user_uploads/{trip_id}/{user_id}/{file_name}")
}

/// Sign a time-limited upload or download URL.
#[utoipa::path(
    post,
    path = "/user_uploads/generate-presigned-url",
    request_body = GeneratePresignedUrlRequestBody,
    responses(
        (status = 200, description = "Signed URL", body = PresignedUrlResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 500, description = "Signing failed", body = Error)
    ),
    tags = ["user-uploads"],
    operation_id = "generatePresignedUrl",
    security(("BearerToken" = []))
)]
#[post("/generate-presigned-url")]
pub async fn generate_presigned_url(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<GeneratePresignedUrlRequestBody>,
) -> ApiResult<web::Json<PresignedUrlResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;
    require_non_blank(&payload.file_name, "File name is required.")?;
    parse_document_category(&payload.document_category)?;

    let key = object_key_for(payload.trip_id, identity.user_id.as_str(), &payload.file_name);
    let ttl = state.upload_url_ttl;
    let url = match payload.url_type.as_str() {
        "upload" => state
            .store
            .issue_upload_url(&key, &payload.file_type, ttl)
            .await
            .map_err(Error::from)?,
        "download" => state
            .store
            .issue_download_url(&key, ttl)
            .await
            .map_err(Error::from)?,
        _ => return Err(Error::invalid_request("Invalid URL type.")),
    };

    Ok(web::Json(PresignedUrlResponseBody {
        url,
        object_key: key,
    }))
}

/// Record the pointer row for a client-reported successful upload.
///
/// The object itself is not verified; the row is taken on the client's word.
#[utoipa::path(
    post,
    path = "/user_uploads/save-upload-metadata",
    request_body = SaveUploadMetadataRequestBody,
    responses(
        (status = 201, description = "Metadata saved", body = SaveUploadMetadataResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["user-uploads"],
    operation_id = "saveUploadMetadata",
    security(("BearerToken" = []))
)]
#[post("/save-upload-metadata")]
pub async fn save_upload_metadata(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<SaveUploadMetadataRequestBody>,
) -> ApiResult<(web::Json<SaveUploadMetadataResponseBody>, StatusCode)> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;
    require_non_blank(&payload.file_name, "File name is required.")?;
    require_non_blank(&payload.object_key, "Object key is required.")?;
    let document_category = parse_document_category(&payload.document_category)?;

    let upload = NewUpload {
        upload_user_id: identity.user_id,
        trip_id: payload.trip_id,
        document_category,
        file_name: payload.file_name,
        object_key: payload.object_key,
    };
    let upload_id = state.uploads.record(&upload).await?;

    Ok((
        web::Json(SaveUploadMetadataResponseBody {
            message: "Metadata saved successfully.".to_owned(),
            upload_id,
        }),
        StatusCode::CREATED,
    ))
}

/// List a trip's uploads, optionally narrowed to one category.
#[utoipa::path(
    get,
    path = "/user_uploads/get-uploads",
    params(UploadsQuery),
    responses(
        (status = 200, description = "Upload list", body = GetUploadsResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["user-uploads"],
    operation_id = "getUploads",
    security(("BearerToken" = []))
)]
#[get("/get-uploads")]
pub async fn get_uploads(
    state: web::Data<HttpState>,
    token: BearerToken,
    query: web::Query<UploadsQuery>,
) -> ApiResult<web::Json<GetUploadsResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let trip_id = parse_trip_id(&query.trip_id)?;
    require_trip(&state, trip_id).await?;
    require_guest(&state, trip_id, &identity.user_id).await?;

    let category = query
        .document_category
        .as_deref()
        .map(parse_document_category)
        .transpose()?;

    let uploads = state
        .uploads
        .list(trip_id, category)
        .await
        .map_err(Error::from)?
        .into_iter()
        .map(|upload| UploadBody {
            id: upload.id,
            file_name: upload.file_name,
            document_category: upload.document_category.to_string(),
            upload_user_id: upload.upload_user_id.to_string(),
            object_key: upload.object_key,
            upload_timestamp: upload.upload_timestamp.to_rfc3339(),
        })
        .collect();

    Ok(web::Json(GetUploadsResponseBody { uploads }))
}

/// Delete an upload: the stored object best-effort, then the pointer row.
///
/// Only the uploader or the host may delete an upload.
#[utoipa::path(
    delete,
    path = "/user_uploads/delete-upload",
    request_body = DeleteUploadRequestBody,
    responses(
        (status = 200, description = "Upload deleted", body = MessageResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Trip or upload not found", body = Error)
    ),
    tags = ["user-uploads"],
    operation_id = "deleteUpload",
    security(("BearerToken" = []))
)]
#[delete("/delete-upload")]
pub async fn delete_upload(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<DeleteUploadRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    let trip = require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;

    let upload = state
        .uploads
        .find(payload.upload_id)
        .await
        .map_err(Error::from)?
        .filter(|upload| upload.trip_id == payload.trip_id)
        .ok_or_else(|| Error::not_found("Upload not found."))?;

    if upload.upload_user_id != identity.user_id && trip.host_id != identity.user_id {
        return Err(Error::forbidden(
            "Only the uploader or the host can delete an upload.",
        ));
    }

    if let Err(error) = state.store.delete_object(&upload.object_key).await {
        warn!(%error, key = upload.object_key, "failed to delete stored object");
    }
    state.uploads.remove(payload.upload_id).await?;

    Ok(web::Json(MessageResponseBody {
        message: "Upload deleted successfully.".to_owned(),
    }))
}
