//! Uniform authorization checks shared by all handler modules.
//!
//! Policy: any authenticated user may read a trip by id; only current guests
//! may read content collections or mutate content rows; only the host may
//! mutate the trip itself, transfer hostship, remove guests or delete todos.

use crate::domain::{Error, RsvpStatus, Trip, TripGuest, UserId};

use super::state::HttpState;

/// Load a trip or fail with 404.
pub(crate) async fn require_trip(state: &HttpState, trip_id: i32) -> Result<Trip, Error> {
    state
        .trips
        .find_by_id(trip_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("Trip not found."))
}

/// Require the user to be a current guest of the trip.
pub(crate) async fn require_guest(
    state: &HttpState,
    trip_id: i32,
    user_id: &UserId,
) -> Result<TripGuest, Error> {
    state
        .guests
        .find(trip_id, user_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::forbidden("User is not a guest of this trip."))
}

/// Require the user to be a guest with a confirmed (`YES`) RSVP.
pub(crate) async fn require_confirmed_guest(
    state: &HttpState,
    trip_id: i32,
    user_id: &UserId,
) -> Result<TripGuest, Error> {
    let guest = require_guest(state, trip_id, user_id).await?;
    if guest.rsvp_status != RsvpStatus::Yes {
        return Err(Error::forbidden(
            "Only guests with a confirmed RSVP can do this.",
        ));
    }
    Ok(guest)
}

/// Require the user to be the trip's host.
pub(crate) fn require_host(trip: &Trip, user_id: &UserId) -> Result<(), Error> {
    if &trip.host_id != user_id {
        return Err(Error::forbidden("User is not the host of this trip."));
    }
    Ok(())
}
