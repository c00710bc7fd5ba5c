//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly. They are used by
//! Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered users, keyed by the identity provider's opaque id.
    users (id) {
        /// Primary key: opaque external identity.
        id -> Varchar,
        /// E.164 phone number, unique across users.
        phone_number -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Trips and their invite tokens.
    trips (id) {
        id -> Int4,
        /// Opaque invite token, unique across trips.
        token -> Varchar,
        name -> Varchar,
        description -> Nullable<Varchar>,
        /// Current host; mirrored by the guest row with `is_host = true`.
        host_id -> Varchar,
        start_date -> Date,
        end_date -> Date,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Trip membership, one row per (trip, user) pair.
    trip_guests (id) {
        id -> Int4,
        trip_id -> Int4,
        guest_id -> Varchar,
        is_host -> Bool,
        /// One of INVITED, YES, NO, MAYBE; validated at the boundary.
        rsvp_status -> Varchar,
    }
}

diesel::table! {
    /// Expenses paid by one guest on behalf of a trip.
    trip_expenses (id) {
        id -> Int4,
        trip_id -> Int4,
        /// The payer.
        user_id -> Varchar,
        title -> Varchar,
        amount -> Float8,
        settled -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user splits of an expense.
    trip_expense_shares (id) {
        id -> Int4,
        expense_id -> Int4,
        user_id -> Varchar,
        amount -> Float8,
        /// Denormalised from the parent expense for query convenience.
        trip_id -> Int4,
    }
}

diesel::table! {
    /// Soft grouping for locations, unique by name within a trip.
    location_categories (id) {
        id -> Int4,
        trip_id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    /// Places pinned to a trip's map, unique by place_id within a trip.
    trip_locations (id) {
        id -> Int4,
        trip_id -> Int4,
        user_id -> Varchar,
        place_id -> Varchar,
        name -> Varchar,
        latitude -> Float8,
        longitude -> Float8,
        category_id -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Day-by-day itinerary entries with client-supplied string ids.
    itinerary_entries (id) {
        id -> Varchar,
        trip_id -> Int4,
        date -> Timestamptz,
        description -> Varchar,
    }
}

diesel::table! {
    /// Shared checklists with client-supplied string ids.
    trip_todos (id) {
        id -> Varchar,
        trip_id -> Int4,
        text -> Varchar,
        checked -> Bool,
        last_updated_by -> Varchar,
        last_updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Upload pointer rows; the row is the source of truth for the object.
    user_uploads (id) {
        id -> Int4,
        upload_user_id -> Varchar,
        trip_id -> Int4,
        /// One of travel, accommodation; validated at the boundary.
        document_category -> Varchar,
        file_name -> Varchar,
        object_key -> Varchar,
        upload_timestamp -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    trips,
    trip_guests,
    trip_expenses,
    trip_expense_shares,
    location_categories,
    trip_locations,
    itinerary_entries,
    trip_todos,
    user_uploads,
);
