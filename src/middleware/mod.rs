//! Actix middleware.

pub mod request_id;
