//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct that generates the OpenAPI specification for
//! the REST API: every handler path, the request/response schemas, and the
//! bearer-token security scheme. The generated document backs Swagger UI in
//! debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::{expenses, guests, itinerary, locations, todos, trips, uploads, users};

/// Enrich the generated document with the bearer credential scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Identity-provider credential passed as `Authorization: Bearer <token>`.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Trip planning backend API",
        description = "HTTP interface for trips, guests, expenses, locations, itineraries, todos and uploads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::validate_user,
        crate::inbound::http::trips::create_trip,
        crate::inbound::http::trips::get_trip,
        crate::inbound::http::trips::get_user_trips,
        crate::inbound::http::trips::update_trip,
        crate::inbound::http::trips::set_host,
        crate::inbound::http::trips::delete_trip,
        crate::inbound::http::guests::get_trip_guests,
        crate::inbound::http::guests::get_guest_info,
        crate::inbound::http::guests::accept_invite,
        crate::inbound::http::guests::update_rsvp_status,
        crate::inbound::http::guests::delete_trip_guest,
        crate::inbound::http::expenses::add_expense,
        crate::inbound::http::expenses::get_expenses,
        crate::inbound::http::expenses::update_expense,
        crate::inbound::http::expenses::settle_expense,
        crate::inbound::http::expenses::delete_expense,
        crate::inbound::http::locations::add_category,
        crate::inbound::http::locations::update_category,
        crate::inbound::http::locations::delete_category,
        crate::inbound::http::locations::add_location,
        crate::inbound::http::locations::update_location,
        crate::inbound::http::locations::delete_location,
        crate::inbound::http::locations::get_locations,
        crate::inbound::http::itinerary::add_item,
        crate::inbound::http::itinerary::update_item,
        crate::inbound::http::itinerary::get_itinerary,
        crate::inbound::http::itinerary::delete_item,
        crate::inbound::http::todos::get_todos,
        crate::inbound::http::todos::add_todo,
        crate::inbound::http::todos::update_todo,
        crate::inbound::http::todos::delete_todo,
        crate::inbound::http::uploads::generate_presigned_url,
        crate::inbound::http::uploads::save_upload_metadata,
        crate::inbound::http::uploads::get_uploads,
        crate::inbound::http::uploads::delete_upload,
    ),
    components(schemas(
        Error,
        ErrorCode,
        users::CreateUserRequestBody,
        users::MessageResponseBody,
        users::ValidateUserResponseBody,
        trips::CreateTripRequestBody,
        trips::CreateTripResponseBody,
        trips::TripDetailsBody,
        trips::GetTripResponseBody,
        trips::UserTripBody,
        trips::GetUserTripsResponseBody,
        trips::UpdateTripRequestBody,
        trips::SetHostRequestBody,
        trips::DeleteTripRequestBody,
        guests::GuestBody,
        guests::GetTripGuestsResponseBody,
        guests::GuestInfoBody,
        guests::GetGuestInfoResponseBody,
        guests::AcceptInviteRequestBody,
        guests::AcceptInviteResponseBody,
        guests::UpdateRsvpRequestBody,
        guests::DeleteTripGuestRequestBody,
        expenses::UserInvolvedBody,
        expenses::UserInvolvedDetailBody,
        expenses::AddExpenseRequestBody,
        expenses::UpdateExpenseRequestBody,
        expenses::SettleExpenseRequestBody,
        expenses::DeleteExpenseRequestBody,
        expenses::ExpenseBody,
        expenses::GetExpensesResponseBody,
        locations::AddCategoryRequestBody,
        locations::UpdateCategoryRequestBody,
        locations::DeleteCategoryRequestBody,
        locations::AddLocationRequestBody,
        locations::UpdateLocationRequestBody,
        locations::DeleteLocationRequestBody,
        locations::LocationBody,
        locations::GetLocationsResponseBody,
        itinerary::ItineraryItemRequestBody,
        itinerary::DeleteItineraryItemRequestBody,
        itinerary::ItineraryItemBody,
        itinerary::GetItineraryResponseBody,
        todos::AddTodoRequestBody,
        todos::UpdateTodoRequestBody,
        todos::DeleteTodoRequestBody,
        todos::TodoBody,
        todos::GetTodosResponseBody,
        uploads::GeneratePresignedUrlRequestBody,
        uploads::PresignedUrlResponseBody,
        uploads::SaveUploadMetadataRequestBody,
        uploads::SaveUploadMetadataResponseBody,
        uploads::DeleteUploadRequestBody,
        uploads::UploadBody,
        uploads::GetUploadsResponseBody,
    )),
    tags(
        (name = "users", description = "Registration and profile lookups"),
        (name = "trips", description = "Trip aggregate lifecycle"),
        (name = "trip-guests", description = "Membership and RSVP"),
        (name = "expenses", description = "Expense splitting"),
        (name = "trip-locations", description = "Pinned locations and categories"),
        (name = "trip-itinerary", description = "Day-by-day itinerary"),
        (name = "trip-todos", description = "Shared checklists"),
        (name = "user-uploads", description = "Document uploads via signed URLs")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/trips/create-trip"));
        assert!(paths.contains_key("/trip_guests/accept-invite"));
        assert!(paths.contains_key("/user_uploads/generate-presigned-url"));
    }

    #[test]
    fn error_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.keys().any(|name| name.ends_with("Error")));
    }
}
