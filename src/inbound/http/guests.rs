//! Trip membership and RSVP HTTP handlers.
//!
//! ```text
//! GET    /trip_guests/get-trip-guests
//! GET    /trip_guests/get-guest-info
//! POST   /trip_guests/accept-invite
//! PUT    /trip_guests/update-rsvp-status
//! DELETE /trip_guests/delete-trip-guest
//! ```

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, RsvpStatus, TripGuest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{require_guest, require_trip};
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponseBody;
use crate::inbound::http::validation::{parse_settable_rsvp, parse_trip_id, parse_user_id};

/// One guest in a trip's guest list.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuestBody {
    pub guest_username: String,
    pub is_host: bool,
    pub guest_first_name: String,
    pub guest_last_name: String,
    pub rsvp_status: String,
}

/// Response payload listing a trip's guests.
#[derive(Debug, Serialize, ToSchema)]
pub struct GetTripGuestsResponseBody {
    pub guests: Vec<GuestBody>,
}

/// The caller's own membership row.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuestInfoBody {
    pub trip_id: i32,
    pub guest_user_id: String,
    pub rsvp_status: String,
    pub is_host: bool,
}

/// Response payload wrapping the caller's membership.
#[derive(Debug, Serialize, ToSchema)]
pub struct GetGuestInfoResponseBody {
    pub guest: GuestInfoBody,
}

/// Request payload for joining a trip via invite token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AcceptInviteRequestBody {
    pub trip_token: String,
}

/// Response payload after joining a trip.
#[derive(Debug, Serialize, ToSchema)]
pub struct AcceptInviteResponseBody {
    pub message: String,
    pub trip_id: i32,
}

/// Request payload for updating the caller's RSVP.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateRsvpRequestBody {
    pub trip_id: i32,
    pub rsvp_status: String,
}

/// Request payload for removing a guest.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteTripGuestRequestBody {
    pub trip_id: i32,
    pub guest_id: String,
}

/// Query parameters identifying a trip.
#[derive(Debug, Deserialize, IntoParams)]
pub struct GuestTripQuery {
    pub trip_id: String,
}

/// List a trip's guests with their names.
#[utoipa::path(
    get,
    path = "/trip_guests/get-trip-guests",
    params(GuestTripQuery),
    responses(
        (status = 200, description = "Guest list", body = GetTripGuestsResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trip-guests"],
    operation_id = "getTripGuests",
    security(("BearerToken" = []))
)]
#[get("/get-trip-guests")]
pub async fn get_trip_guests(
    state: web::Data<HttpState>,
    token: BearerToken,
    query: web::Query<GuestTripQuery>,
) -> ApiResult<web::Json<GetTripGuestsResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let trip_id = parse_trip_id(&query.trip_id)?;
    require_trip(&state, trip_id).await?;
    require_guest(&state, trip_id, &identity.user_id).await?;

    let guests = state
        .guests
        .list(trip_id)
        .await
        .map_err(Error::from)?
        .into_iter()
        .map(|profile| GuestBody {
            guest_username: profile.guest.guest_id.to_string(),
            is_host: profile.guest.is_host,
            guest_first_name: profile.first_name,
            guest_last_name: profile.last_name,
            rsvp_status: profile.guest.rsvp_status.to_string(),
        })
        .collect();

    Ok(web::Json(GetTripGuestsResponseBody { guests }))
}

/// Fetch the caller's own membership row for a trip.
#[utoipa::path(
    get,
    path = "/trip_guests/get-guest-info",
    params(GuestTripQuery),
    responses(
        (status = 200, description = "Membership", body = GetGuestInfoResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Guest not found", body = Error)
    ),
    tags = ["trip-guests"],
    operation_id = "getGuestInfo",
    security(("BearerToken" = []))
)]
#[get("/get-guest-info")]
pub async fn get_guest_info(
    state: web::Data<HttpState>,
    token: BearerToken,
    query: web::Query<GuestTripQuery>,
) -> ApiResult<web::Json<GetGuestInfoResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let trip_id = parse_trip_id(&query.trip_id)?;

    let guest = state
        .guests
        .find(trip_id, &identity.user_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("Guest not found"))?;

    Ok(web::Json(GetGuestInfoResponseBody {
        guest: GuestInfoBody {
            trip_id: guest.trip_id,
            guest_user_id: guest.guest_id.to_string(),
            rsvp_status: guest.rsvp_status.to_string(),
            is_host: guest.is_host,
        },
    }))
}

/// Join a trip through its invite token.
#[utoipa::path(
    post,
    path = "/trip_guests/accept-invite",
    request_body = AcceptInviteRequestBody,
    responses(
        (status = 200, description = "Invite accepted", body = AcceptInviteResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Unknown token", body = Error),
        (status = 409, description = "Already a guest", body = Error)
    ),
    tags = ["trip-guests"],
    operation_id = "acceptInvite",
    security(("BearerToken" = []))
)]
#[post("/accept-invite")]
pub async fn accept_invite(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<AcceptInviteRequestBody>,
) -> ApiResult<web::Json<AcceptInviteResponseBody>> {
    let identity = authenticate(&state, &token).await?;

    let trip = state
        .trips
        .find_by_token(&payload.trip_token)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("Trip not found."))?;

    if state
        .guests
        .find(trip.id, &identity.user_id)
        .await
        .map_err(Error::from)?
        .is_some()
    {
        return Err(Error::conflict("User is already a guest of this trip."));
    }

    let guest = TripGuest {
        trip_id: trip.id,
        guest_id: identity.user_id,
        is_host: false,
        rsvp_status: RsvpStatus::Invited,
    };
    state.guests.add(&guest).await?;

    Ok(web::Json(AcceptInviteResponseBody {
        message: "Invite accepted successfully.".to_owned(),
        trip_id: trip.id,
    }))
}

/// Update the caller's RSVP. The host's RSVP is immutable.
#[utoipa::path(
    put,
    path = "/trip_guests/update-rsvp-status",
    request_body = UpdateRsvpRequestBody,
    responses(
        (status = 200, description = "RSVP updated", body = MessageResponseBody),
        (status = 400, description = "Invalid status", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Host or non-guest", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trip-guests"],
    operation_id = "updateRsvpStatus",
    security(("BearerToken" = []))
)]
#[put("/update-rsvp-status")]
pub async fn update_rsvp_status(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<UpdateRsvpRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    let guest = require_guest(&state, payload.trip_id, &identity.user_id).await?;
    if guest.is_host {
        return Err(Error::forbidden("Host cannot update their RSVP status."));
    }

    let status = parse_settable_rsvp(&payload.rsvp_status)?;
    state
        .guests
        .set_rsvp(payload.trip_id, &identity.user_id, status)
        .await?;

    Ok(web::Json(MessageResponseBody {
        message: "RSVP status updated successfully.".to_owned(),
    }))
}

/// Remove a guest from a trip.
///
/// Guests may remove themselves; the host may remove anyone. The host cannot
/// be removed without transferring hostship first.
#[utoipa::path(
    delete,
    path = "/trip_guests/delete-trip-guest",
    request_body = DeleteTripGuestRequestBody,
    responses(
        (status = 200, description = "Guest removed", body = MessageResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Trip or guest not found", body = Error)
    ),
    tags = ["trip-guests"],
    operation_id = "deleteTripGuest",
    security(("BearerToken" = []))
)]
#[delete("/delete-trip-guest")]
pub async fn delete_trip_guest(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<DeleteTripGuestRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    let trip = require_trip(&state, payload.trip_id).await?;
    let target_id = parse_user_id(&payload.guest_id, "Guest user id is required.")?;

    let target = state
        .guests
        .find(payload.trip_id, &target_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("User is not a guest of this trip."))?;

    if target.is_host {
        return Err(Error::forbidden(
            "Host cannot delete themselves from the trip.",
        ));
    }
    if identity.user_id != target_id && trip.host_id != identity.user_id {
        return Err(Error::forbidden(
            "Only the host can remove other guests.",
        ));
    }

    state.guests.remove(payload.trip_id, &target_id).await?;

    Ok(web::Json(MessageResponseBody {
        message: "Guest deleted successfully.".to_owned(),
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

    use crate::domain::{Trip, UserId};
    use crate::inbound::http::test_support::{FixtureBackend, test_app};

    const HOST_TOKEN: &str = "host_token";
    const GUEST_TOKEN: &str = "guest_token";
    const JOINER_TOKEN: &str = "joiner_token";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    struct Scenario {
        backend: Arc<FixtureBackend>,
        trip: Trip,
        host: UserId,
        guest: UserId,
    }

    /// A trip with a host and one invited guest, plus a registered user who
    /// has not joined yet (`JOINER_TOKEN`).
    fn scenario() -> Scenario {
        let backend = FixtureBackend::new();
        let host = backend.seed_user("user-host", "+11234567890", "Ada", "Lovelace");
        backend.register_identity(HOST_TOKEN, &host, "+11234567890");
        let guest = backend.seed_user("user-guest", "+19876543210", "Grace", "Hopper");
        backend.register_identity(GUEST_TOKEN, &guest, "+19876543210");
        let joiner = backend.seed_user("user-joiner", "+15551112222", "Edsger", "Dijkstra");
        backend.register_identity(JOINER_TOKEN, &joiner, "+15551112222");

        let trip = backend.seed_trip(&host, "Spain", date(2022, 1, 1), date(2022, 1, 30));
        backend.seed_guest(trip.id, &guest, RsvpStatus::Invited);
        Scenario {
            backend,
            trip,
            host,
            guest,
        }
    }

    fn authed(request: actix_test::TestRequest, token: &str) -> actix_test::TestRequest {
        request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
    }

    #[actix_web::test]
    async fn accept_invite_adds_an_invited_guest() {
        let Scenario { backend, trip, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), JOINER_TOKEN)
            .uri("/trip_guests/accept-invite")
            .set_json(AcceptInviteRequestBody {
                trip_token: trip.token.clone(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["trip_id"].as_i64(), Some(i64::from(trip.id)));

        let joined = backend
            .guest_rows(trip.id)
            .into_iter()
            .find(|row| row.guest_id.as_str() == "user-joiner")
            .expect("joined row");
        assert!(!joined.is_host);
        assert_eq!(joined.rsvp_status, RsvpStatus::Invited);
    }

    #[actix_web::test]
    async fn accepting_the_same_invite_twice_conflicts() {
        let Scenario { backend, trip, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        for expected in [StatusCode::OK, StatusCode::CONFLICT] {
            let request = authed(actix_test::TestRequest::post(), JOINER_TOKEN)
                .uri("/trip_guests/accept-invite")
                .set_json(AcceptInviteRequestBody {
                    trip_token: trip.token.clone(),
                })
                .to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), expected);
        }
    }

    #[actix_web::test]
    async fn unknown_invite_tokens_are_not_found() {
        let Scenario { backend, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), JOINER_TOKEN)
            .uri("/trip_guests/accept-invite")
            .set_json(AcceptInviteRequestBody {
                trip_token: "no-such-token".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn guests_can_answer_an_invitation() {
        let Scenario {
            backend,
            trip,
            guest,
            ..
        } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::put(), GUEST_TOKEN)
            .uri("/trip_guests/update-rsvp-status")
            .set_json(UpdateRsvpRequestBody {
                trip_id: trip.id,
                rsvp_status: "YES".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let row = backend
            .guest_rows(trip.id)
            .into_iter()
            .find(|row| row.guest_id == guest)
            .expect("guest row");
        assert_eq!(row.rsvp_status, RsvpStatus::Yes);
    }

    #[actix_web::test]
    async fn the_hosts_rsvp_is_immutable() {
        let Scenario { backend, trip, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::put(), HOST_TOKEN)
            .uri("/trip_guests/update-rsvp-status")
            .set_json(UpdateRsvpRequestBody {
                trip_id: trip.id,
                rsvp_status: "NO".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn non_guests_cannot_answer() {
        let Scenario { backend, trip, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::put(), JOINER_TOKEN)
            .uri("/trip_guests/update-rsvp-status")
            .set_json(UpdateRsvpRequestBody {
                trip_id: trip.id,
                rsvp_status: "YES".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn invited_cannot_be_chosen_as_an_answer() {
        let Scenario { backend, trip, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::put(), GUEST_TOKEN)
            .uri("/trip_guests/update-rsvp-status")
            .set_json(UpdateRsvpRequestBody {
                trip_id: trip.id,
                rsvp_status: "INVITED".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn guest_list_joins_user_names() {
        let Scenario { backend, trip, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::get(), GUEST_TOKEN)
            .uri(&format!("/trip_guests/get-trip-guests?trip_id={}", trip.id))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let value: Value = actix_test::read_body_json(response).await;
        let guests = value["guests"].as_array().expect("guests array");
        assert_eq!(guests.len(), 2);
        assert_eq!(guests[0]["guest_first_name"], "Ada");
        assert_eq!(guests[0]["is_host"], true);
        assert_eq!(guests[1]["guest_first_name"], "Grace");
        assert_eq!(guests[1]["rsvp_status"], "INVITED");
    }

    #[actix_web::test]
    async fn guest_list_is_hidden_from_non_guests() {
        let Scenario { backend, trip, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::get(), JOINER_TOKEN)
            .uri(&format!("/trip_guests/get-trip-guests?trip_id={}", trip.id))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn guest_info_returns_the_callers_own_row() {
        let Scenario { backend, trip, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::get(), GUEST_TOKEN)
            .uri(&format!("/trip_guests/get-guest-info?trip_id={}", trip.id))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["guest"]["guest_user_id"], "user-guest");
        assert_eq!(value["guest"]["rsvp_status"], "INVITED");
        assert_eq!(value["guest"]["is_host"], false);

        let request = authed(actix_test::TestRequest::get(), JOINER_TOKEN)
            .uri(&format!("/trip_guests/get-guest-info?trip_id={}", trip.id))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn guests_can_leave_a_trip() {
        let Scenario {
            backend,
            trip,
            guest,
            ..
        } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::delete(), GUEST_TOKEN)
            .uri("/trip_guests/delete-trip-guest")
            .set_json(DeleteTripGuestRequestBody {
                trip_id: trip.id,
                guest_id: guest.to_string(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        assert!(
            backend
                .guest_rows(trip.id)
                .iter()
                .all(|row| row.guest_id != guest)
        );
    }

    #[actix_web::test]
    async fn only_the_host_removes_other_guests() {
        let Scenario {
            backend,
            trip,
            guest,
            ..
        } = scenario();
        let joiner = UserId::new("user-joiner").expect("fixture id");
        backend.seed_guest(trip.id, &joiner, RsvpStatus::Invited);
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::delete(), GUEST_TOKEN)
            .uri("/trip_guests/delete-trip-guest")
            .set_json(DeleteTripGuestRequestBody {
                trip_id: trip.id,
                guest_id: joiner.to_string(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request = authed(actix_test::TestRequest::delete(), HOST_TOKEN)
            .uri("/trip_guests/delete-trip-guest")
            .set_json(DeleteTripGuestRequestBody {
                trip_id: trip.id,
                guest_id: guest.to_string(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn the_host_cannot_be_removed() {
        let Scenario {
            backend,
            trip,
            host,
            ..
        } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::delete(), HOST_TOKEN)
            .uri("/trip_guests/delete-trip-guest")
            .set_json(DeleteTripGuestRequestBody {
                trip_id: trip.id,
                guest_id: host.to_string(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(backend.guest_rows(trip.id).len(), 2);
    }
}
