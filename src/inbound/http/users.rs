//! User registration and profile HTTP handlers.
//!
//! ```text
//! POST /users/create-user
//! POST /users/validate-user
//! ```

use actix_web::{post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::require_non_blank;

/// Request payload for completing registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequestBody {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

/// Response payload confirming registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponseBody {
    pub message: String,
}

/// Response payload describing the caller's stored profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateUserResponseBody {
    pub message: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

/// Complete registration for the verified identity.
///
/// The id and phone number come from the credential, never from the body, so
/// a caller can only ever register themselves.
#[utoipa::path(
    post,
    path = "/users/create-user",
    request_body = CreateUserRequestBody,
    responses(
        (status = 201, description = "User created", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 409, description = "Already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security(("BearerToken" = []))
)]
#[post("/create-user")]
pub async fn create_user(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<CreateUserRequestBody>,
) -> ApiResult<(web::Json<MessageResponseBody>, actix_web::http::StatusCode)> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();
    require_non_blank(&payload.first_name, "First name is required.")?;
    require_non_blank(&payload.last_name, "Last name is required.")?;

    let user = User {
        id: identity.user_id,
        phone_number: identity.phone_number,
        first_name: payload.first_name,
        last_name: payload.last_name,
        created_at: Utc::now(),
    };
    state.users.create(&user).await?;

    Ok((
        web::Json(MessageResponseBody {
            message: "User created successfully".to_owned(),
        }),
        actix_web::http::StatusCode::CREATED,
    ))
}

/// Return the stored profile for the caller's identity.
#[utoipa::path(
    post,
    path = "/users/validate-user",
    responses(
        (status = 200, description = "User validated", body = ValidateUserResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Not registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "validateUser",
    security(("BearerToken" = []))
)]
#[post("/validate-user")]
pub async fn validate_user(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<web::Json<ValidateUserResponseBody>> {
    let identity = authenticate(&state, &token).await?;

    let user = state
        .users
        .find_by_id(&identity.user_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("User not found."))?;

    Ok(web::Json(ValidateUserResponseBody {
        message: "User validated successfully.".to_owned(),
        phone_number: user.phone_number,
        first_name: user.first_name,
        last_name: user.last_name,
    }))
}
