//! Itinerary HTTP handlers.
//!
//! ```text
//! POST   /trip_itinerary/add-item
//! PUT    /trip_itinerary/update-item
//! GET    /trip_itinerary/get-itinerary
//! DELETE /trip_itinerary/delete-item
//! ```

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::dates::format_itinerary_date;
use crate::domain::{Error, ItineraryEntry};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{require_guest, require_trip};
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponseBody;
use crate::inbound::http::validation::{
    parse_itinerary_date, parse_trip_id, require_non_blank,
};

/// Request payload for adding or updating an itinerary item.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ItineraryItemRequestBody {
    pub trip_id: i32,
    pub item_id: String,
    /// RFC 2822 timestamp, e.g. `Fri, 08 Nov 2024 00:00:00 GMT`.
    pub date: String,
    pub description: String,
}

/// Request payload for deleting an itinerary item.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteItineraryItemRequestBody {
    pub trip_id: i32,
    pub item_id: String,
}

/// One itinerary entry as serialised to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItineraryItemBody {
    pub id: String,
    pub date: String,
    pub description: String,
}

/// Response payload listing a trip's itinerary.
#[derive(Debug, Serialize, ToSchema)]
pub struct GetItineraryResponseBody {
    pub itinerary: Vec<ItineraryItemBody>,
}

/// Query parameters identifying a trip.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ItineraryTripQuery {
    pub trip_id: String,
}

/// Add an itinerary item with a client-supplied id.
#[utoipa::path(
    post,
    path = "/trip_itinerary/add-item",
    request_body = ItineraryItemRequestBody,
    responses(
        (status = 201, description = "Item added", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 409, description = "Duplicate item id", body = Error)
    ),
    tags = ["trip-itinerary"],
    operation_id = "addItineraryItem",
    security(("BearerToken" = []))
)]
#[post("/add-item")]
pub async fn add_item(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<ItineraryItemRequestBody>,
) -> ApiResult<(web::Json<MessageResponseBody>, StatusCode)> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;
    require_non_blank(&payload.item_id, "Item id is required.")?;
    require_non_blank(&payload.description, "Description cannot be empty.")?;
    let date = parse_itinerary_date(&payload.date)?;

    let entry = ItineraryEntry {
        id: payload.item_id,
        trip_id: payload.trip_id,
        date,
        description: payload.description,
    };
    state.itinerary.add(&entry).await?;

    Ok((
        web::Json(MessageResponseBody {
            message: "Itinerary item added successfully.".to_owned(),
        }),
        StatusCode::CREATED,
    ))
}

/// Update an itinerary item's date and description.
#[utoipa::path(
    put,
    path = "/trip_itinerary/update-item",
    request_body = ItineraryItemRequestBody,
    responses(
        (status = 200, description = "Item updated", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip or item not found", body = Error)
    ),
    tags = ["trip-itinerary"],
    operation_id = "updateItineraryItem",
    security(("BearerToken" = []))
)]
#[put("/update-item")]
pub async fn update_item(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<ItineraryItemRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;
    require_non_blank(&payload.description, "Description cannot be empty.")?;
    let date = parse_itinerary_date(&payload.date)?;

    let updated = state
        .itinerary
        .update(payload.trip_id, &payload.item_id, date, &payload.description)
        .await?;
    if !updated {
        return Err(Error::not_found("Item not found."));
    }

    Ok(web::Json(MessageResponseBody {
        message: "Itinerary item updated successfully.".to_owned(),
    }))
}

/// List a trip's itinerary ordered by date.
#[utoipa::path(
    get,
    path = "/trip_itinerary/get-itinerary",
    params(ItineraryTripQuery),
    responses(
        (status = 200, description = "Itinerary", body = GetItineraryResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trip-itinerary"],
    operation_id = "getItinerary",
    security(("BearerToken" = []))
)]
#[get("/get-itinerary")]
pub async fn get_itinerary(
    state: web::Data<HttpState>,
    token: BearerToken,
    query: web::Query<ItineraryTripQuery>,
) -> ApiResult<web::Json<GetItineraryResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let trip_id = parse_trip_id(&query.trip_id)?;
    require_trip(&state, trip_id).await?;
    require_guest(&state, trip_id, &identity.user_id).await?;

    let itinerary = state
        .itinerary
        .list(trip_id)
        .await
        .map_err(Error::from)?
        .into_iter()
        .map(|entry| ItineraryItemBody {
            id: entry.id,
            date: format_itinerary_date(entry.date),
            description: entry.description,
        })
        .collect();

    Ok(web::Json(GetItineraryResponseBody { itinerary }))
}

/// Delete an itinerary item.
#[utoipa::path(
    delete,
    path = "/trip_itinerary/delete-item",
    request_body = DeleteItineraryItemRequestBody,
    responses(
        (status = 200, description = "Item deleted", body = MessageResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip or item not found", body = Error)
    ),
    tags = ["trip-itinerary"],
    operation_id = "deleteItineraryItem",
    security(("BearerToken" = []))
)]
#[delete("/delete-item")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<DeleteItineraryItemRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;

    let removed = state
        .itinerary
        .remove(payload.trip_id, &payload.item_id)
        .await?;
    if !removed {
        return Err(Error::not_found("Item not found."));
    }

    Ok(web::Json(MessageResponseBody {
        message: "Itinerary item deleted successfully.".to_owned(),
    }))
}
