//! Trip aggregate HTTP handlers.
//!
//! ```text
//! POST   /trips/create-trip
//! GET    /trips/get-trip
//! GET    /trips/get-user-trips
//! PUT    /trips/update-trip
//! PUT    /trips/set-host
//! DELETE /trips/delete-trip
//! ```

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use crate::domain::dates::format_trip_date;
use crate::domain::ports::TripChanges;
use crate::domain::{Error, Trip, TripDraft, TripValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{require_host, require_trip};
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponseBody;
use crate::inbound::http::validation::{
    parse_trip_date, parse_trip_id, parse_user_id, require_non_blank,
};

/// Request payload for creating a trip.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTripRequestBody {
    pub trip_name: String,
    pub trip_description: Option<String>,
    pub trip_start_date: Option<String>,
    pub trip_end_date: Option<String>,
}

/// Response payload for trip creation.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTripResponseBody {
    pub message: String,
    pub trip_id: i32,
    pub trip_token: String,
}

/// Trip fields as serialised to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct TripDetailsBody {
    pub trip_id: i32,
    pub trip_name: String,
    pub trip_description: Option<String>,
    pub trip_hostname: String,
    pub trip_start_date: String,
    pub trip_end_date: String,
    pub trip_token: String,
}

/// Response payload wrapping a single trip.
#[derive(Debug, Serialize, ToSchema)]
pub struct GetTripResponseBody {
    pub trip_details: TripDetailsBody,
}

/// One trip in the caller's trip list, with their own RSVP.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserTripBody {
    #[serde(flatten)]
    pub details: TripDetailsBody,
    pub rsvp_status: String,
}

/// Response payload listing the caller's trips.
#[derive(Debug, Serialize, ToSchema)]
pub struct GetUserTripsResponseBody {
    pub trips: Vec<UserTripBody>,
}

/// Request payload for updating a trip.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTripRequestBody {
    pub trip_id: i32,
    pub trip_name: Option<String>,
    pub trip_description: Option<String>,
    pub trip_start_date: Option<String>,
    pub trip_end_date: Option<String>,
}

/// Request payload for transferring hostship.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetHostRequestBody {
    pub trip_id: i32,
    pub new_host_id: String,
}

/// Request payload for deleting a trip.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteTripRequestBody {
    pub trip_id: i32,
}

/// Query parameters identifying a trip.
#[derive(Debug, Deserialize, IntoParams)]
pub struct TripIdQuery {
    pub trip_id: String,
}

fn trip_details(trip: &Trip) -> TripDetailsBody {
    TripDetailsBody {
        trip_id: trip.id,
        trip_name: trip.name.clone(),
        trip_description: trip.description.clone(),
        trip_hostname: trip.host_id.to_string(),
        trip_start_date: format_trip_date(trip.start_date),
        trip_end_date: format_trip_date(trip.end_date),
        trip_token: trip.token.clone(),
    }
}

fn map_draft_error(error: TripValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

/// Create a trip hosted by the caller.
///
/// The trip, its host guest row and one itinerary entry per calendar day are
/// inserted in a single transaction; a failure anywhere leaves nothing
/// behind.
#[utoipa::path(
    post,
    path = "/trips/create-trip",
    request_body = CreateTripRequestBody,
    responses(
        (status = 201, description = "Trip created", body = CreateTripResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "createTrip",
    security(("BearerToken" = []))
)]
#[post("/create-trip")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<CreateTripRequestBody>,
) -> ApiResult<(web::Json<CreateTripResponseBody>, StatusCode)> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_non_blank(&payload.trip_name, "Trip name is required.")?;
    let (Some(start_raw), Some(end_raw)) = (&payload.trip_start_date, &payload.trip_end_date)
    else {
        return Err(Error::invalid_request("Start and end dates are required."));
    };
    let start_date = parse_trip_date(start_raw)?;
    let end_date = parse_trip_date(end_raw)?;

    let host = state
        .users
        .find_by_id(&identity.user_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("User not found."))?;

    let draft = TripDraft::new(
        payload.trip_name,
        payload.trip_description,
        host.id,
        start_date,
        end_date,
    )
    .map_err(map_draft_error)?;

    let trip = state.trips.create(&draft).await?;

    Ok((
        web::Json(CreateTripResponseBody {
            message: "Trip created successfully.".to_owned(),
            trip_id: trip.id,
            trip_token: trip.token,
        }),
        StatusCode::CREATED,
    ))
}

/// Fetch one trip by id.
#[utoipa::path(
    get,
    path = "/trips/get-trip",
    params(TripIdQuery),
    responses(
        (status = 200, description = "Trip details", body = GetTripResponseBody),
        (status = 400, description = "Invalid trip id", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "getTrip",
    security(("BearerToken" = []))
)]
#[get("/get-trip")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    token: BearerToken,
    query: web::Query<TripIdQuery>,
) -> ApiResult<web::Json<GetTripResponseBody>> {
    authenticate(&state, &token).await?;
    let trip_id = parse_trip_id(&query.trip_id)?;
    let trip = require_trip(&state, trip_id).await?;

    Ok(web::Json(GetTripResponseBody {
        trip_details: trip_details(&trip),
    }))
}

/// List every trip the caller is a guest of.
#[utoipa::path(
    get,
    path = "/trips/get-user-trips",
    responses(
        (status = 200, description = "Caller's trips", body = GetUserTripsResponseBody),
        (status = 401, description = "Unauthorized", body = Error)
    ),
    tags = ["trips"],
    operation_id = "getUserTrips",
    security(("BearerToken" = []))
)]
#[get("/get-user-trips")]
pub async fn get_user_trips(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<web::Json<GetUserTripsResponseBody>> {
    let identity = authenticate(&state, &token).await?;

    let memberships = state.trips.list_for_guest(&identity.user_id).await?;
    let trips = memberships
        .into_iter()
        .map(|membership| UserTripBody {
            details: trip_details(&membership.trip),
            rsvp_status: membership.rsvp_status.to_string(),
        })
        .collect();

    Ok(web::Json(GetUserTripsResponseBody { trips }))
}

/// Apply a partial update to a trip. Host only.
#[utoipa::path(
    put,
    path = "/trips/update-trip",
    request_body = UpdateTripRequestBody,
    responses(
        (status = 200, description = "Trip updated", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the host", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "updateTrip",
    security(("BearerToken" = []))
)]
#[put("/update-trip")]
pub async fn update_trip(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<UpdateTripRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    let trip = require_trip(&state, payload.trip_id).await?;
    require_host(&trip, &identity.user_id)?;

    if let Some(name) = &payload.trip_name {
        require_non_blank(name, "Trip name is required.")?;
    }
    let start_date = payload
        .trip_start_date
        .as_deref()
        .map(parse_trip_date)
        .transpose()?;
    let end_date = payload
        .trip_end_date
        .as_deref()
        .map(parse_trip_date)
        .transpose()?;

    // Re-check ordering against whichever dates the update leaves in place.
    let effective_start = start_date.unwrap_or(trip.start_date);
    let effective_end = end_date.unwrap_or(trip.end_date);
    if effective_start > effective_end {
        return Err(Error::invalid_request(
            "Start date cannot be later than end date.",
        ));
    }

    let changes = TripChanges {
        name: payload.trip_name,
        description: payload.trip_description,
        start_date,
        end_date,
    };
    state.trips.update(payload.trip_id, &changes).await?;

    Ok(web::Json(MessageResponseBody {
        message: "Trip updated successfully.".to_owned(),
    }))
}

/// Transfer hostship to another guest. Host only.
#[utoipa::path(
    put,
    path = "/trips/set-host",
    request_body = SetHostRequestBody,
    responses(
        (status = 200, description = "Host transferred", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the host", body = Error),
        (status = 404, description = "Trip or guest not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "setHost",
    security(("BearerToken" = []))
)]
#[put("/set-host")]
pub async fn set_host(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<SetHostRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    let trip = require_trip(&state, payload.trip_id).await?;
    require_host(&trip, &identity.user_id)?;

    let new_host = parse_user_id(&payload.new_host_id, "New host user id is required.")?;
    state
        .guests
        .find(payload.trip_id, &new_host)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("User is not a guest of this trip."))?;

    state
        .trips
        .set_host(payload.trip_id, &trip.host_id, &new_host)
        .await?;

    Ok(web::Json(MessageResponseBody {
        message: "Host updated successfully.".to_owned(),
    }))
}

/// Delete a trip and everything it owns. Host only.
///
/// The database teardown commits atomically; object deletions for the trip's
/// uploads run afterwards and are best-effort.
#[utoipa::path(
    delete,
    path = "/trips/delete-trip",
    request_body = DeleteTripRequestBody,
    responses(
        (status = 200, description = "Trip deleted", body = MessageResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the host", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "deleteTrip",
    security(("BearerToken" = []))
)]
#[delete("/delete-trip")]
pub async fn delete_trip(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<DeleteTripRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let trip_id = payload.trip_id;

    let trip = require_trip(&state, trip_id).await?;
    require_host(&trip, &identity.user_id)?;

    let object_keys = state.trips.delete_aggregate(trip_id).await?;

    for key in object_keys {
        if let Err(error) = state.store.delete_object(&key).await {
            warn!(%error, key, trip_id, "failed to delete stored object during trip teardown");
        }
    }

    Ok(web::Json(MessageResponseBody {
        message: "Trip deleted successfully.".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::domain::{RsvpStatus, UserId};
    use crate::inbound::http::test_support::{FixtureBackend, test_app};

    const HOST_TOKEN: &str = "host_token";
    const GUEST_TOKEN: &str = "guest_token";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn backend_with_host() -> (Arc<FixtureBackend>, UserId) {
        let backend = FixtureBackend::new();
        let host = backend.seed_user("user-host", "+11234567890", "Ada", "Lovelace");
        backend.register_identity(HOST_TOKEN, &host, "+11234567890");
        (backend, host)
    }

    fn add_guest(backend: &Arc<FixtureBackend>, trip_id: i32) -> UserId {
        let guest = backend.seed_user("user-guest", "+19876543210", "Grace", "Hopper");
        backend.register_identity(GUEST_TOKEN, &guest, "+19876543210");
        backend.seed_guest(trip_id, &guest, RsvpStatus::Yes);
        guest
    }

    fn authed(request: actix_test::TestRequest, token: &str) -> actix_test::TestRequest {
        request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
    }

    #[actix_web::test]
    async fn creating_a_trip_seeds_host_and_itinerary() {
        let (backend, host) = backend_with_host();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trips/create-trip")
            .set_json(CreateTripRequestBody {
                trip_name: "Spain".to_owned(),
                trip_description: Some("Summer".to_owned()),
                trip_start_date: Some("01/01/2022".to_owned()),
                trip_end_date: Some("01/30/2022".to_owned()),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let value: Value = actix_test::read_body_json(response).await;
        let trip_id = value["trip_id"].as_i64().expect("trip id") as i32;
        assert!(!value["trip_token"].as_str().expect("token").is_empty());

        let guests = backend.guest_rows(trip_id);
        assert_eq!(guests.len(), 1);
        assert!(guests[0].is_host);
        assert_eq!(guests[0].guest_id, host);
        assert_eq!(guests[0].rsvp_status, RsvpStatus::Yes);
        // Inclusive date range: 30 calendar days, one entry each.
        assert_eq!(backend.itinerary_count(trip_id), 30);
    }

    #[actix_web::test]
    async fn inverted_dates_leave_nothing_behind() {
        let (backend, _host) = backend_with_host();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trips/create-trip")
            .set_json(CreateTripRequestBody {
                trip_name: "Spain".to_owned(),
                trip_description: None,
                trip_start_date: Some("01/30/2022".to_owned()),
                trip_end_date: Some("01/01/2022".to_owned()),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.trip_count(), 0);
    }

    #[actix_web::test]
    async fn missing_dates_are_rejected() {
        let (backend, _host) = backend_with_host();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trips/create-trip")
            .set_json(CreateTripRequestBody {
                trip_name: "Spain".to_owned(),
                trip_description: None,
                trip_start_date: None,
                trip_end_date: Some("01/30/2022".to_owned()),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["message"], "Start and end dates are required.");
    }

    #[actix_web::test]
    async fn unregistered_creator_is_not_found() {
        let backend = FixtureBackend::new();
        let ghost = UserId::new("user-ghost").expect("fixture id");
        backend.register_identity(HOST_TOKEN, &ghost, "+15550000000");
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trips/create-trip")
            .set_json(CreateTripRequestBody {
                trip_name: "Spain".to_owned(),
                trip_description: None,
                trip_start_date: Some("01/01/2022".to_owned()),
                trip_end_date: Some("01/30/2022".to_owned()),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(backend.trip_count(), 0);
    }

    #[actix_web::test]
    async fn get_trip_round_trips_wire_dates() {
        let (backend, host) = backend_with_host();
        let trip = backend.seed_trip(&host, "Spain", date(2022, 1, 1), date(2022, 1, 30));
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
            .uri(&format!("/trips/get-trip?trip_id={}", trip.id))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["trip_details"]["trip_name"], "Spain");
        assert_eq!(value["trip_details"]["trip_start_date"], "01/01/2022");
        assert_eq!(value["trip_details"]["trip_end_date"], "01/30/2022");
    }

    #[actix_web::test]
    async fn get_trip_unknown_id_is_not_found() {
        let (backend, _host) = backend_with_host();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
            .uri("/trips/get-trip?trip_id=999")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn get_user_trips_carries_the_callers_rsvp() {
        let (backend, host) = backend_with_host();
        let trip = backend.seed_trip(&host, "Spain", date(2022, 1, 1), date(2022, 1, 30));
        let guest = add_guest(&backend, trip.id);
        backend.seed_guest(
            backend.seed_trip(&host, "Italy", date(2022, 3, 1), date(2022, 3, 5)).id,
            &guest,
            RsvpStatus::Maybe,
        );
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::get(), GUEST_TOKEN)
            .uri("/trips/get-user-trips")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let value: Value = actix_test::read_body_json(response).await;
        let trips = value["trips"].as_array().expect("trips array");
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0]["trip_name"], "Spain");
        assert_eq!(trips[0]["rsvp_status"], "YES");
        assert_eq!(trips[1]["rsvp_status"], "MAYBE");
    }

    #[actix_web::test]
    async fn non_host_cannot_update_the_trip() {
        let (backend, host) = backend_with_host();
        let trip = backend.seed_trip(&host, "Spain", date(2022, 1, 1), date(2022, 1, 30));
        add_guest(&backend, trip.id);
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::put(), GUEST_TOKEN)
            .uri("/trips/update-trip")
            .set_json(UpdateTripRequestBody {
                trip_id: trip.id,
                trip_name: Some("Hijacked".to_owned()),
                trip_description: None,
                trip_start_date: None,
                trip_end_date: None,
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn update_rechecks_date_ordering_against_stored_dates() {
        let (backend, host) = backend_with_host();
        let trip = backend.seed_trip(&host, "Spain", date(2022, 1, 1), date(2022, 1, 30));
        let app = actix_test::init_service(test_app(&backend)).await;

        // Moving only the start past the stored end must fail.
        let request = authed(actix_test::TestRequest::put(), HOST_TOKEN)
            .uri("/trips/update-trip")
            .set_json(UpdateTripRequestBody {
                trip_id: trip.id,
                trip_name: None,
                trip_description: None,
                trip_start_date: Some("02/15/2022".to_owned()),
                trip_end_date: None,
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn set_host_leaves_exactly_one_host() {
        let (backend, host) = backend_with_host();
        let trip = backend.seed_trip(&host, "Spain", date(2022, 1, 1), date(2022, 1, 30));
        let guest = add_guest(&backend, trip.id);
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::put(), HOST_TOKEN)
            .uri("/trips/set-host")
            .set_json(SetHostRequestBody {
                trip_id: trip.id,
                new_host_id: guest.to_string(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let hosts: Vec<_> = backend
            .guest_rows(trip.id)
            .into_iter()
            .filter(|row| row.is_host)
            .collect();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].guest_id, guest);
    }

    #[actix_web::test]
    async fn set_host_rejects_non_hosts_and_non_guests() {
        let (backend, host) = backend_with_host();
        let trip = backend.seed_trip(&host, "Spain", date(2022, 1, 1), date(2022, 1, 30));
        let guest = add_guest(&backend, trip.id);
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::put(), GUEST_TOKEN)
            .uri("/trips/set-host")
            .set_json(SetHostRequestBody {
                trip_id: trip.id,
                new_host_id: guest.to_string(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request = authed(actix_test::TestRequest::put(), HOST_TOKEN)
            .uri("/trips/set-host")
            .set_json(SetHostRequestBody {
                trip_id: trip.id,
                new_host_id: "user-stranger".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // The failed attempts must not have moved hostship.
        let hosts: Vec<_> = backend
            .guest_rows(trip.id)
            .into_iter()
            .filter(|row| row.is_host)
            .collect();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].guest_id, host);
    }

    #[actix_web::test]
    async fn delete_clears_every_dependent_table() {
        let (backend, host) = backend_with_host();
        let trip = backend.seed_trip(&host, "Spain", date(2022, 1, 1), date(2022, 1, 30));
        add_guest(&backend, trip.id);
        backend.seed_upload(trip.id, &host, "user_uploads/1/user-host/passport.pdf");
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::delete(), HOST_TOKEN)
            .uri("/trips/delete-trip")
            .set_json(DeleteTripRequestBody { trip_id: trip.id })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(backend.trip_count(), 0);
        assert_eq!(backend.dependent_row_count(trip.id), 0);
        assert_eq!(
            backend.deleted_object_keys(),
            vec!["user_uploads/1/user-host/passport.pdf".to_owned()]
        );
    }

    #[actix_web::test]
    async fn delete_rejects_non_hosts_and_changes_nothing() {
        let (backend, host) = backend_with_host();
        let trip = backend.seed_trip(&host, "Spain", date(2022, 1, 1), date(2022, 1, 30));
        add_guest(&backend, trip.id);
        let rows_before = backend.dependent_row_count(trip.id);
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::delete(), GUEST_TOKEN)
            .uri("/trips/delete-trip")
            .set_json(DeleteTripRequestBody { trip_id: trip.id })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        assert_eq!(backend.trip_count(), 1);
        assert_eq!(backend.dependent_row_count(trip.id), rows_before);
        assert!(backend.deleted_object_keys().is_empty());
    }

    #[actix_web::test]
    async fn requests_without_credentials_are_unauthorized() {
        let (backend, _host) = backend_with_host();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = actix_test::TestRequest::get()
            .uri("/trips/get-user-trips")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
