//! Domain primitives and aggregates.
//!
//! Purpose: define strongly typed entities shared by the HTTP and
//! persistence layers. Types here are transport agnostic; inbound adapters
//! map them to JSON and outbound adapters map them to rows.

pub mod dates;
pub mod error;
pub mod expense;
pub mod guest;
pub mod itinerary;
pub mod location;
pub mod ports;
pub mod todo;
pub mod trip;
pub mod upload;
pub mod user;

pub use self::error::{Error, ErrorCode};
pub use self::expense::{TripExpense, TripExpenseShare};
pub use self::guest::{RsvpStatus, TripGuest};
pub use self::itinerary::ItineraryEntry;
pub use self::location::{LocationCategory, TripLocation};
pub use self::todo::TripTodo;
pub use self::trip::{Trip, TripDraft, TripValidationError};
pub use self::upload::{DocumentCategory, UserUpload};
pub use self::user::{User, UserId, UserIdValidationError};

/// Convenient result alias for fallible domain operations.
pub type ApiResult<T> = Result<T, Error>;
