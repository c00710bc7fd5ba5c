//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{
    ExpenseRepository, GuestRepository, IdentityVerifier, ItineraryRepository, LocationRepository,
    ObjectStore, TodoRepository, TripRepository, UploadRepository, UserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityVerifier>,
    pub store: Arc<dyn ObjectStore>,
    pub users: Arc<dyn UserRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub guests: Arc<dyn GuestRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub itinerary: Arc<dyn ItineraryRepository>,
    pub todos: Arc<dyn TodoRepository>,
    pub uploads: Arc<dyn UploadRepository>,
    /// Lifetime of signed upload/download URLs.
    pub upload_url_ttl: Duration,
}
