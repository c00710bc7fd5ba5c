//! Map location and category HTTP handlers.
//!
//! ```text
//! POST   /trip_locations/add-category
//! PUT    /trip_locations/update-category
//! DELETE /trip_locations/delete-category
//! POST   /trip_locations/add-location
//! PUT    /trip_locations/update-location
//! DELETE /trip_locations/delete-location
//! GET    /trip_locations/get-locations
//! ```

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::ports::{LocationChanges, NewLocation};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{require_guest, require_trip};
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponseBody;
use crate::inbound::http::validation::{parse_trip_id, require_non_blank};

/// Request payload for creating a category.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddCategoryRequestBody {
    pub trip_id: i32,
    pub category: String,
}

/// Request payload for renaming a category.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCategoryRequestBody {
    pub trip_id: i32,
    pub old_category_name: String,
    pub new_category_name: String,
}

/// Request payload for deleting a category.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteCategoryRequestBody {
    pub trip_id: i32,
    pub category_name: String,
}

/// Request payload for pinning a location.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddLocationRequestBody {
    pub trip_id: i32,
    pub place_id: String,
    pub place_name: String,
    pub lat: f64,
    pub lng: f64,
    pub category_name: Option<String>,
}

/// Request payload for updating a pinned location.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateLocationRequestBody {
    pub trip_id: i32,
    pub place_id: String,
    pub place_name: Option<String>,
    pub category_name: Option<String>,
}

/// Request payload for removing a pinned location.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteLocationRequestBody {
    pub trip_id: i32,
    pub place_id: String,
}

/// One pinned location in a trip's list.
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationBody {
    pub place_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub category: String,
    pub category_id: Option<i32>,
}

/// Response payload listing a trip's locations.
#[derive(Debug, Serialize, ToSchema)]
pub struct GetLocationsResponseBody {
    pub locations: Vec<LocationBody>,
}

/// Query parameters identifying a trip.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LocationsTripQuery {
    pub trip_id: String,
}

/// Create a location category.
#[utoipa::path(
    post,
    path = "/trip_locations/add-category",
    request_body = AddCategoryRequestBody,
    responses(
        (status = 201, description = "Category added", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 409, description = "Duplicate name", body = Error)
    ),
    tags = ["trip-locations"],
    operation_id = "addCategory",
    security(("BearerToken" = []))
)]
#[post("/add-category")]
pub async fn add_category(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<AddCategoryRequestBody>,
) -> ApiResult<(web::Json<MessageResponseBody>, StatusCode)> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;
    require_non_blank(&payload.category, "Category name is required.")?;

    state
        .locations
        .add_category(payload.trip_id, payload.category.trim())
        .await?;

    Ok((
        web::Json(MessageResponseBody {
            message: "Category successfully added.".to_owned(),
        }),
        StatusCode::CREATED,
    ))
}

/// Rename a location category.
#[utoipa::path(
    put,
    path = "/trip_locations/update-category",
    request_body = UpdateCategoryRequestBody,
    responses(
        (status = 200, description = "Category renamed", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip or category not found", body = Error),
        (status = 409, description = "Duplicate name", body = Error)
    ),
    tags = ["trip-locations"],
    operation_id = "updateCategory",
    security(("BearerToken" = []))
)]
#[put("/update-category")]
pub async fn update_category(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<UpdateCategoryRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;
    require_non_blank(&payload.new_category_name, "Category name is required.")?;

    let renamed = state
        .locations
        .rename_category(
            payload.trip_id,
            &payload.old_category_name,
            payload.new_category_name.trim(),
        )
        .await?;
    if !renamed {
        return Err(Error::not_found("Category not found."));
    }

    Ok(web::Json(MessageResponseBody {
        message: "Category successfully updated.".to_owned(),
    }))
}

/// Delete a category and every location in it.
#[utoipa::path(
    delete,
    path = "/trip_locations/delete-category",
    request_body = DeleteCategoryRequestBody,
    responses(
        (status = 200, description = "Category deleted", body = MessageResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip or category not found", body = Error)
    ),
    tags = ["trip-locations"],
    operation_id = "deleteCategory",
    security(("BearerToken" = []))
)]
#[delete("/delete-category")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<DeleteCategoryRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;

    let removed = state
        .locations
        .remove_category(payload.trip_id, &payload.category_name)
        .await?;
    if !removed {
        return Err(Error::not_found("Category not found."));
    }

    Ok(web::Json(MessageResponseBody {
        message: "Category successfully deleted.".to_owned(),
    }))
}

/// Pin a location to a trip's map.
#[utoipa::path(
    post,
    path = "/trip_locations/add-location",
    request_body = AddLocationRequestBody,
    responses(
        (status = 201, description = "Location added", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 409, description = "Duplicate place", body = Error)
    ),
    tags = ["trip-locations"],
    operation_id = "addLocation",
    security(("BearerToken" = []))
)]
#[post("/add-location")]
pub async fn add_location(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<AddLocationRequestBody>,
) -> ApiResult<(web::Json<MessageResponseBody>, StatusCode)> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;
    require_non_blank(&payload.place_id, "Place id is required.")?;
    require_non_blank(&payload.place_name, "Place name is required.")?;
    if !payload.lat.is_finite() || !payload.lng.is_finite() {
        return Err(Error::invalid_request("Invalid location."));
    }

    let new_location = NewLocation {
        trip_id: payload.trip_id,
        user_id: identity.user_id,
        place_id: payload.place_id,
        name: payload.place_name,
        latitude: payload.lat,
        longitude: payload.lng,
        category_name: payload.category_name,
    };
    state.locations.add(&new_location).await?;

    Ok((
        web::Json(MessageResponseBody {
            message: "Location successfully added.".to_owned(),
        }),
        StatusCode::CREATED,
    ))
}

/// Update a pinned location's name or category.
#[utoipa::path(
    put,
    path = "/trip_locations/update-location",
    request_body = UpdateLocationRequestBody,
    responses(
        (status = 200, description = "Location updated", body = MessageResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip or location not found", body = Error)
    ),
    tags = ["trip-locations"],
    operation_id = "updateLocation",
    security(("BearerToken" = []))
)]
#[put("/update-location")]
pub async fn update_location(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<UpdateLocationRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;

    let changes = LocationChanges {
        name: payload.place_name,
        category_name: payload.category_name,
    };
    let updated = state
        .locations
        .update(payload.trip_id, &payload.place_id, &changes)
        .await?;
    if !updated {
        return Err(Error::not_found("Location not found."));
    }

    Ok(web::Json(MessageResponseBody {
        message: "Location successfully updated.".to_owned(),
    }))
}

/// Remove a pinned location.
#[utoipa::path(
    delete,
    path = "/trip_locations/delete-location",
    request_body = DeleteLocationRequestBody,
    responses(
        (status = 200, description = "Location deleted", body = MessageResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip or location not found", body = Error)
    ),
    tags = ["trip-locations"],
    operation_id = "deleteLocation",
    security(("BearerToken" = []))
)]
#[delete("/delete-location")]
pub async fn delete_location(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<DeleteLocationRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;

    let removed = state
        .locations
        .remove(payload.trip_id, &payload.place_id)
        .await?;
    if !removed {
        return Err(Error::not_found("Location not found."));
    }

    Ok(web::Json(MessageResponseBody {
        message: "Location successfully deleted.".to_owned(),
    }))
}

/// List a trip's pinned locations with resolved category names.
#[utoipa::path(
    get,
    path = "/trip_locations/get-locations",
    params(LocationsTripQuery),
    responses(
        (status = 200, description = "Location list", body = GetLocationsResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trip-locations"],
    operation_id = "getLocations",
    security(("BearerToken" = []))
)]
#[get("/get-locations")]
pub async fn get_locations(
    state: web::Data<HttpState>,
    token: BearerToken,
    query: web::Query<LocationsTripQuery>,
) -> ApiResult<web::Json<GetLocationsResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let trip_id = parse_trip_id(&query.trip_id)?;
    require_trip(&state, trip_id).await?;
    require_guest(&state, trip_id, &identity.user_id).await?;

    let locations = state
        .locations
        .list(trip_id)
        .await
        .map_err(Error::from)?
        .into_iter()
        .map(|record| LocationBody {
            place_id: record.place_id,
            name: record.name,
            lat: record.latitude,
            lng: record.longitude,
            category: record.category_name.unwrap_or_default(),
            category_id: record.category_id,
        })
        .collect();

    Ok(web::Json(GetLocationsResponseBody { locations }))
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
    const OUTSIDER_TOKEN: &str = "outsider_token";

    struct Scenario {
        backend: Arc<FixtureBackend>,
        trip: Trip,
    }

    fn scenario() -> Scenario {
        let backend = FixtureBackend::new();
        let host = backend.seed_user("user-host", "+11234567890", "Ada", "Lovelace");
        backend.register_identity(HOST_TOKEN, &host, "+11234567890");
        let outsider = UserId::new("user-outsider").expect("fixture id");
        backend.register_identity(OUTSIDER_TOKEN, &outsider, "+15551112222");

        let start = NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2022, 1, 30).expect("valid date");
        let trip = backend.seed_trip(&host, "Spain", start, end);
        Scenario { backend, trip }
    }

    fn authed(request: actix_test::TestRequest, token: &str) -> actix_test::TestRequest {
        request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
    }

    fn pin_request(trip_id: i32, place_id: &str, category: Option<&str>) -> AddLocationRequestBody {
        AddLocationRequestBody {
            trip_id,
            place_id: place_id.to_owned(),
            place_name: "Sagrada Familia".to_owned(),
            lat: 41.4036,
            lng: 2.1744,
            category_name: category.map(str::to_owned),
        }
    }

    #[actix_web::test]
    async fn duplicate_category_names_conflict() {
        let Scenario { backend, trip } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
                .uri("/trip_locations/add-category")
                .set_json(AddCategoryRequestBody {
                    trip_id: trip.id,
                    category: "Sights".to_owned(),
                })
                .to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), expected);
        }
        assert_eq!(backend.category_rows(trip.id).len(), 1);
    }

    #[actix_web::test]
    async fn pinning_auto_creates_its_category() {
        let Scenario { backend, trip } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trip_locations/add-location")
            .set_json(pin_request(trip.id, "place-1", Some("Sights")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let categories = backend.category_rows(trip.id);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Sights");
        let locations = backend.location_rows(trip.id);
        assert_eq!(locations[0].category_id, Some(categories[0].id));

        // A second pin in the same category reuses the row.
        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trip_locations/add-location")
            .set_json(pin_request(trip.id, "place-2", Some("Sights")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(backend.category_rows(trip.id).len(), 1);
    }

    #[actix_web::test]
    async fn duplicate_place_ids_conflict() {
        let Scenario { backend, trip } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
                .uri("/trip_locations/add-location")
                .set_json(pin_request(trip.id, "place-1", None))
                .to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), expected);
        }
    }

    #[actix_web::test]
    async fn deleting_a_category_removes_its_locations() {
        let Scenario { backend, trip } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trip_locations/add-location")
            .set_json(pin_request(trip.id, "place-1", Some("Sights")))
            .to_request();
        actix_test::call_service(&app, request).await;
        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trip_locations/add-location")
            .set_json(pin_request(trip.id, "place-2", None))
            .to_request();
        actix_test::call_service(&app, request).await;

        let request = authed(actix_test::TestRequest::delete(), HOST_TOKEN)
            .uri("/trip_locations/delete-category")
            .set_json(DeleteCategoryRequestBody {
                trip_id: trip.id,
                category_name: "Sights".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        // Only the uncategorised pin survives.
        let locations = backend.location_rows(trip.id);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].place_id, "place-2");
        assert!(backend.category_rows(trip.id).is_empty());
    }

    #[actix_web::test]
    async fn renaming_a_category_updates_the_listing() {
        let Scenario { backend, trip } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trip_locations/add-location")
            .set_json(pin_request(trip.id, "place-1", Some("Sights")))
            .to_request();
        actix_test::call_service(&app, request).await;

        let request = authed(actix_test::TestRequest::put(), HOST_TOKEN)
            .uri("/trip_locations/update-category")
            .set_json(UpdateCategoryRequestBody {
                trip_id: trip.id,
                old_category_name: "Sights".to_owned(),
                new_category_name: "Must see".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
            .uri(&format!("/trip_locations/get-locations?trip_id={}", trip.id))
            .to_request();
        let value: Value =
            actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
        assert_eq!(value["locations"][0]["category"], "Must see");
    }

    #[actix_web::test]
    async fn renaming_a_missing_category_is_not_found() {
        let Scenario { backend, trip } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::put(), HOST_TOKEN)
            .uri("/trip_locations/update-category")
            .set_json(UpdateCategoryRequestBody {
                trip_id: trip.id,
                old_category_name: "Nowhere".to_owned(),
                new_category_name: "Somewhere".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn listing_leaves_uncategorised_pins_blank() {
        let Scenario { backend, trip } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trip_locations/add-location")
            .set_json(pin_request(trip.id, "place-1", None))
            .to_request();
        actix_test::call_service(&app, request).await;

        let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
            .uri(&format!("/trip_locations/get-locations?trip_id={}", trip.id))
            .to_request();
        let value: Value =
            actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
        let locations = value["locations"].as_array().expect("locations array");
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0]["category"], "");
        assert_eq!(locations[0]["lat"], 41.4036);
    }

    #[actix_web::test]
    async fn moving_a_pin_between_categories() {
        let Scenario { backend, trip } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/trip_locations/add-location")
            .set_json(pin_request(trip.id, "place-1", Some("Sights")))
            .to_request();
        actix_test::call_service(&app, request).await;

        let request = authed(actix_test::TestRequest::put(), HOST_TOKEN)
            .uri("/trip_locations/update-location")
            .set_json(UpdateLocationRequestBody {
                trip_id: trip.id,
                place_id: "place-1".to_owned(),
                place_name: None,
                category_name: Some("Food".to_owned()),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
            .uri(&format!("/trip_locations/get-locations?trip_id={}", trip.id))
            .to_request();
        let value: Value =
            actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
        assert_eq!(value["locations"][0]["category"], "Food");
    }

    #[actix_web::test]
    async fn removing_a_missing_pin_is_not_found() {
        let Scenario { backend, trip } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::delete(), HOST_TOKEN)
            .uri("/trip_locations/delete-location")
            .set_json(DeleteLocationRequestBody {
                trip_id: trip.id,
                place_id: "place-1".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn non_guests_cannot_touch_locations() {
        let Scenario { backend, trip } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), OUTSIDER_TOKEN)
            .uri("/trip_locations/add-location")
            .set_json(pin_request(trip.id, "place-1", None))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
