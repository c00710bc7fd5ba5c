//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's type
//! requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use super::schema::{
    itinerary_entries, location_categories, trip_expense_shares, trip_expenses, trip_guests,
    trip_locations, trip_todos, trips, user_uploads, users,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub phone_number: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

// ---------------------------------------------------------------------------
// Trips
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripRow {
    pub id: i32,
    pub token: String,
    pub name: String,
    pub description: Option<String>,
    pub host_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trips)]
pub(crate) struct NewTripRow<'a> {
    pub token: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub host_id: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = trips)]
pub(crate) struct TripChangesRow<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Trip guests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trip_guests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripGuestRow {
    #[expect(dead_code, reason = "surrogate key; membership is (trip_id, guest_id)")]
    pub id: i32,
    pub trip_id: i32,
    pub guest_id: String,
    pub is_host: bool,
    pub rsvp_status: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trip_guests)]
pub(crate) struct NewTripGuestRow<'a> {
    pub trip_id: i32,
    pub guest_id: &'a str,
    pub is_host: bool,
    pub rsvp_status: &'a str,
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trip_expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripExpenseRow {
    pub id: i32,
    pub trip_id: i32,
    pub user_id: String,
    pub title: String,
    pub amount: f64,
    pub settled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trip_expenses)]
pub(crate) struct NewTripExpenseRow<'a> {
    pub trip_id: i32,
    pub user_id: &'a str,
    pub title: &'a str,
    pub amount: f64,
    pub settled: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trip_expense_shares)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripExpenseShareRow {
    #[expect(dead_code, reason = "surrogate key; shares are addressed by (expense_id, user_id)")]
    pub id: i32,
    #[expect(dead_code, reason = "read back for listings keyed by the parent expense")]
    pub expense_id: i32,
    pub user_id: String,
    pub amount: f64,
    #[expect(dead_code, reason = "denormalised column used only in WHERE clauses")]
    pub trip_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trip_expense_shares)]
pub(crate) struct NewTripExpenseShareRow<'a> {
    pub expense_id: i32,
    pub user_id: &'a str,
    pub amount: f64,
    pub trip_id: i32,
}

// ---------------------------------------------------------------------------
// Locations & categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = location_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LocationCategoryRow {
    pub id: i32,
    pub trip_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = location_categories)]
pub(crate) struct NewLocationCategoryRow<'a> {
    pub trip_id: i32,
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trip_locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripLocationRow {
    #[expect(dead_code, reason = "surrogate key; locations are addressed by (trip_id, place_id)")]
    pub id: i32,
    #[expect(dead_code, reason = "read back for listings already scoped by trip")]
    pub trip_id: i32,
    #[expect(dead_code, reason = "pinning user is not part of the listing contract")]
    pub user_id: String,
    pub place_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category_id: Option<i32>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trip_locations)]
pub(crate) struct NewTripLocationRow<'a> {
    pub trip_id: i32,
    pub user_id: &'a str,
    pub place_id: &'a str,
    pub name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub category_id: Option<i32>,
}

// ---------------------------------------------------------------------------
// Itinerary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = itinerary_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItineraryEntryRow {
    pub id: String,
    pub trip_id: i32,
    pub date: DateTime<Utc>,
    pub description: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = itinerary_entries)]
pub(crate) struct NewItineraryEntryRow<'a> {
    pub id: &'a str,
    pub trip_id: i32,
    pub date: DateTime<Utc>,
    pub description: &'a str,
}

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trip_todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripTodoRow {
    pub id: String,
    pub trip_id: i32,
    pub text: String,
    pub checked: bool,
    pub last_updated_by: String,
    pub last_updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trip_todos)]
pub(crate) struct NewTripTodoRow<'a> {
    pub id: &'a str,
    pub trip_id: i32,
    pub text: &'a str,
    pub checked: bool,
    pub last_updated_by: &'a str,
    pub last_updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_uploads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserUploadRow {
    pub id: i32,
    pub upload_user_id: String,
    pub trip_id: i32,
    pub document_category: String,
    pub file_name: String,
    pub object_key: String,
    pub upload_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_uploads)]
pub(crate) struct NewUserUploadRow<'a> {
    pub upload_user_id: &'a str,
    pub trip_id: i32,
    pub document_category: &'a str,
    pub file_name: &'a str,
    pub object_key: &'a str,
}
