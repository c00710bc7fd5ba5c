//! Application wiring: configuration, state construction and route layout.

pub mod config;

use std::sync::Arc;

use actix_web::web;
use url::Url;

use crate::domain::ports::{IdentityVerifier, ObjectStore};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{expenses, guests, itinerary, locations, todos, trips, uploads, users};
use crate::outbound::identity::HttpIdentityVerifier;
use crate::outbound::persistence::{
    DbPool, DieselExpenseRepository, DieselGuestRepository, DieselItineraryRepository,
    DieselLocationRepository, DieselTodoRepository, DieselTripRepository, DieselUploadRepository,
    DieselUserRepository,
};
use crate::outbound::storage::GatewayObjectStore;

use config::AppConfig;

/// Build the handler state from configuration and a connected pool.
pub fn build_state(config: &AppConfig, pool: DbPool) -> Result<HttpState, String> {
    let identity_endpoint = Url::parse(&config.identity_endpoint)
        .map_err(|err| format!("invalid IDENTITY_ENDPOINT: {err}"))?;
    let storage_endpoint = Url::parse(&config.storage_endpoint)
        .map_err(|err| format!("invalid STORAGE_ENDPOINT: {err}"))?;

    let identity: Arc<dyn IdentityVerifier> = Arc::new(
        HttpIdentityVerifier::new(identity_endpoint)
            .map_err(|err| format!("identity client: {err}"))?,
    );
    let store: Arc<dyn ObjectStore> = Arc::new(
        GatewayObjectStore::new(storage_endpoint, config.storage_bucket.clone())
            .map_err(|err| format!("storage client: {err}"))?
            .with_bearer_token(config.storage_token.clone()),
    );

    Ok(HttpState {
        identity,
        store,
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        trips: Arc::new(DieselTripRepository::new(pool.clone())),
        guests: Arc::new(DieselGuestRepository::new(pool.clone())),
        expenses: Arc::new(DieselExpenseRepository::new(pool.clone())),
        locations: Arc::new(DieselLocationRepository::new(pool.clone())),
        itinerary: Arc::new(DieselItineraryRepository::new(pool.clone())),
        todos: Arc::new(DieselTodoRepository::new(pool.clone())),
        uploads: Arc::new(DieselUploadRepository::new(pool)),
        upload_url_ttl: config.upload_url_ttl,
    })
}

/// Mount every resource scope on the app.
///
/// Kept framework-level so tests can build the same route layout around
/// fixture ports.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(users::create_user)
            .service(users::validate_user),
    )
    .service(
        web::scope("/trips")
            .service(trips::create_trip)
            .service(trips::get_trip)
            .service(trips::get_user_trips)
            .service(trips::update_trip)
            .service(trips::set_host)
            .service(trips::delete_trip),
    )
    .service(
        web::scope("/trip_guests")
            .service(guests::get_trip_guests)
            .service(guests::get_guest_info)
            .service(guests::accept_invite)
            .service(guests::update_rsvp_status)
            .service(guests::delete_trip_guest),
    )
    .service(
        web::scope("/expenses")
            .service(expenses::add_expense)
            .service(expenses::get_expenses)
            .service(expenses::update_expense)
            .service(expenses::settle_expense)
            .service(expenses::delete_expense),
    )
    .service(
        web::scope("/trip_locations")
            .service(locations::add_category)
            .service(locations::update_category)
            .service(locations::delete_category)
            .service(locations::add_location)
            .service(locations::update_location)
            .service(locations::delete_location)
            .service(locations::get_locations),
    )
    .service(
        web::scope("/trip_itinerary")
            .service(itinerary::add_item)
            .service(itinerary::update_item)
            .service(itinerary::get_itinerary)
            .service(itinerary::delete_item),
    )
    .service(
        web::scope("/trip_todos")
            .service(todos::get_todos)
            .service(todos::add_todo)
            .service(todos::update_todo)
            .service(todos::delete_todo),
    )
    .service(
        web::scope("/user_uploads")
            .service(uploads::generate_presigned_url)
            .service(uploads::save_upload_metadata)
            .service(uploads::get_uploads)
            .service(uploads::delete_upload),
    );
}
