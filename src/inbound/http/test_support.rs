//! In-memory fixture ports backing handler tests.
//!
//! One [`FixtureBackend`] implements every driven port over mutex-guarded
//! tables, so tests exercise the real route layout and authorization checks
//! without a database or network. Seed helpers mirror what the Diesel
//! adapters would persist.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use actix_web::{App, web};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    ExpenseRecord, ExpenseRepository, GuestProfile, GuestRepository, Identity, IdentityError,
    IdentityVerifier, ItineraryRepository, LocationChanges, LocationRecord, LocationRepository,
    NewExpense, NewLocation, NewUpload, ObjectStore, ObjectStoreError, RepositoryError,
    ShareDetail, ShareInput, TodoChanges, TodoRepository, TripChanges, TripMembership,
    TripRepository, UploadRepository, UserRepository,
};
use crate::domain::{
    DocumentCategory, ItineraryEntry, LocationCategory, RsvpStatus, Trip, TripDraft, TripExpense,
    TripExpenseShare, TripGuest, TripLocation, TripTodo, User, UserId, UserUpload,
};

use super::state::HttpState;

fn lock<T>(table: &Mutex<T>) -> MutexGuard<'_, T> {
    table.lock().expect("fixture state lock")
}

/// In-memory stand-in for every driven adapter.
#[derive(Default)]
pub(crate) struct FixtureBackend {
    identities: Mutex<Vec<(String, Identity)>>,
    users: Mutex<Vec<User>>,
    trips: Mutex<Vec<Trip>>,
    guests: Mutex<Vec<TripGuest>>,
    expenses: Mutex<Vec<TripExpense>>,
    shares: Mutex<Vec<TripExpenseShare>>,
    categories: Mutex<Vec<LocationCategory>>,
    locations: Mutex<Vec<TripLocation>>,
    itinerary: Mutex<Vec<ItineraryEntry>>,
    todos: Mutex<Vec<TripTodo>>,
    uploads: Mutex<Vec<UserUpload>>,
    /// Object keys handed to `delete_object`, in call order.
    deleted_objects: Mutex<Vec<String>>,
    next_id: Mutex<i32>,
}

impl FixtureBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn allocate_id(&self) -> i32 {
        let mut next = lock(&self.next_id);
        *next += 1;
        *next
    }

    /// Make `token` verify as the given user.
    pub fn register_identity(&self, token: &str, user_id: &UserId, phone_number: &str) {
        lock(&self.identities).push((
            token.to_owned(),
            Identity {
                user_id: user_id.clone(),
                phone_number: phone_number.to_owned(),
            },
        ));
    }

    /// Insert a registered user and return their id.
    pub fn seed_user(&self, id: &str, phone_number: &str, first: &str, last: &str) -> UserId {
        let user_id = UserId::new(id).expect("fixture user id");
        lock(&self.users).push(User {
            id: user_id.clone(),
            phone_number: phone_number.to_owned(),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            created_at: Utc::now(),
        });
        user_id
    }

    /// Insert a trip with its host guest row and per-day itinerary seed,
    /// the same shape the aggregate insert produces.
    pub fn seed_trip(&self, host: &UserId, name: &str, start: NaiveDate, end: NaiveDate) -> Trip {
        let id = self.allocate_id();
        let trip = Trip {
            id,
            token: format!("invite-token-{id}"),
            name: name.to_owned(),
            description: None,
            host_id: host.clone(),
            start_date: start,
            end_date: end,
            created_at: Utc::now(),
        };
        lock(&self.trips).push(trip.clone());
        lock(&self.guests).push(TripGuest {
            trip_id: id,
            guest_id: host.clone(),
            is_host: true,
            rsvp_status: RsvpStatus::Yes,
        });
        self.seed_itinerary_days(id, start, end);
        trip
    }

    /// Insert a non-host guest row.
    pub fn seed_guest(&self, trip_id: i32, user: &UserId, rsvp_status: RsvpStatus) {
        lock(&self.guests).push(TripGuest {
            trip_id,
            guest_id: user.clone(),
            is_host: false,
            rsvp_status,
        });
    }

    /// Insert an upload pointer row and return its id.
    pub fn seed_upload(&self, trip_id: i32, user: &UserId, object_key: &str) -> i32 {
        let id = self.allocate_id();
        lock(&self.uploads).push(UserUpload {
            id,
            upload_user_id: user.clone(),
            trip_id,
            document_category: DocumentCategory::Travel,
            file_name: format!("file-{id}.pdf"),
            object_key: object_key.to_owned(),
            upload_timestamp: Utc::now(),
        });
        id
    }

    fn seed_itinerary_days(&self, trip_id: i32, start: NaiveDate, end: NaiveDate) {
        let mut itinerary = lock(&self.itinerary);
        for day in start.iter_days().take_while(|day| *day <= end) {
            itinerary.push(ItineraryEntry {
                id: Uuid::new_v4().to_string(),
                trip_id,
                date: day.and_time(NaiveTime::MIN).and_utc(),
                description: String::new(),
            });
        }
    }

    pub fn trip_count(&self) -> usize {
        lock(&self.trips).len()
    }

    pub fn guest_rows(&self, trip_id: i32) -> Vec<TripGuest> {
        lock(&self.guests)
            .iter()
            .filter(|guest| guest.trip_id == trip_id)
            .cloned()
            .collect()
    }

    pub fn itinerary_count(&self, trip_id: i32) -> usize {
        lock(&self.itinerary)
            .iter()
            .filter(|entry| entry.trip_id == trip_id)
            .count()
    }

    /// Count rows scoped to a trip across every dependent table.
    pub fn dependent_row_count(&self, trip_id: i32) -> usize {
        lock(&self.guests)
            .iter()
            .filter(|row| row.trip_id == trip_id)
            .count()
            + lock(&self.expenses)
                .iter()
                .filter(|row| row.trip_id == trip_id)
                .count()
            + lock(&self.shares)
                .iter()
                .filter(|row| row.trip_id == trip_id)
                .count()
            + lock(&self.categories)
                .iter()
                .filter(|row| row.trip_id == trip_id)
                .count()
            + lock(&self.locations)
                .iter()
                .filter(|row| row.trip_id == trip_id)
                .count()
            + lock(&self.itinerary)
                .iter()
                .filter(|row| row.trip_id == trip_id)
                .count()
            + lock(&self.todos)
                .iter()
                .filter(|row| row.trip_id == trip_id)
                .count()
            + lock(&self.uploads)
                .iter()
                .filter(|row| row.trip_id == trip_id)
                .count()
    }

    pub fn deleted_object_keys(&self) -> Vec<String> {
        lock(&self.deleted_objects).clone()
    }

    pub fn todo_rows(&self, trip_id: i32) -> Vec<TripTodo> {
        lock(&self.todos)
            .iter()
            .filter(|todo| todo.trip_id == trip_id)
            .cloned()
            .collect()
    }

    pub fn category_rows(&self, trip_id: i32) -> Vec<LocationCategory> {
        lock(&self.categories)
            .iter()
            .filter(|category| category.trip_id == trip_id)
            .cloned()
            .collect()
    }

    pub fn location_rows(&self, trip_id: i32) -> Vec<TripLocation> {
        lock(&self.locations)
            .iter()
            .filter(|location| location.trip_id == trip_id)
            .cloned()
            .collect()
    }

    pub fn upload_rows(&self, trip_id: i32) -> Vec<UserUpload> {
        lock(&self.uploads)
            .iter()
            .filter(|upload| upload.trip_id == trip_id)
            .cloned()
            .collect()
    }

    fn user_names(&self, id: &UserId) -> (String, String) {
        lock(&self.users)
            .iter()
            .find(|user| &user.id == id)
            .map(|user| (user.first_name.clone(), user.last_name.clone()))
            .unwrap_or_default()
    }

    fn resolve_or_create_category(&self, trip_id: i32, name: &str) -> i32 {
        let mut categories = lock(&self.categories);
        if let Some(existing) = categories
            .iter()
            .find(|category| category.trip_id == trip_id && category.name == name)
        {
            return existing.id;
        }
        let id = self.allocate_id();
        categories.push(LocationCategory {
            id,
            trip_id,
            name: name.to_owned(),
        });
        id
    }
}

#[async_trait]
impl IdentityVerifier for FixtureBackend {
    async fn verify(&self, bearer_token: &str) -> Result<Identity, IdentityError> {
        lock(&self.identities)
            .iter()
            .find(|(token, _)| token == bearer_token)
            .map(|(_, identity)| identity.clone())
            .ok_or_else(|| IdentityError::rejected("unknown credential"))
    }
}

#[async_trait]
impl ObjectStore for FixtureBackend {
    async fn issue_upload_url(
        &self,
        key: &str,
        _content_type: &str,
        _ttl: Duration,
    ) -> Result<String, ObjectStoreError> {
        Ok(format!("https://storage.test/upload/{key}"))
    }

    async fn issue_download_url(
        &self,
        key: &str,
        _ttl: Duration,
    ) -> Result<String, ObjectStoreError> {
        Ok(format!("https://storage.test/download/{key}"))
    }

    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError> {
        lock(&self.deleted_objects).push(key.to_owned());
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FixtureBackend {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = lock(&self.users);
        if users
            .iter()
            .any(|existing| existing.id == user.id || existing.phone_number == user.phone_number)
        {
            return Err(RepositoryError::conflict("User already exists."));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(lock(&self.users).iter().find(|user| &user.id == id).cloned())
    }
}

#[async_trait]
impl TripRepository for FixtureBackend {
    async fn create(&self, draft: &TripDraft) -> Result<Trip, RepositoryError> {
        let id = self.allocate_id();
        let trip = Trip {
            id,
            token: draft.token.clone(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            host_id: draft.host_id.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: Utc::now(),
        };
        lock(&self.trips).push(trip.clone());
        lock(&self.guests).push(TripGuest {
            trip_id: id,
            guest_id: draft.host_id.clone(),
            is_host: true,
            rsvp_status: RsvpStatus::Yes,
        });
        self.seed_itinerary_days(id, draft.start_date, draft.end_date);
        Ok(trip)
    }

    async fn find_by_id(&self, trip_id: i32) -> Result<Option<Trip>, RepositoryError> {
        Ok(lock(&self.trips)
            .iter()
            .find(|trip| trip.id == trip_id)
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Trip>, RepositoryError> {
        Ok(lock(&self.trips)
            .iter()
            .find(|trip| trip.token == token)
            .cloned())
    }

    async fn list_for_guest(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TripMembership>, RepositoryError> {
        let trips = lock(&self.trips);
        Ok(lock(&self.guests)
            .iter()
            .filter(|guest| &guest.guest_id == user_id)
            .filter_map(|guest| {
                trips
                    .iter()
                    .find(|trip| trip.id == guest.trip_id)
                    .map(|trip| TripMembership {
                        trip: trip.clone(),
                        rsvp_status: guest.rsvp_status,
                    })
            })
            .collect())
    }

    async fn update(&self, trip_id: i32, changes: &TripChanges) -> Result<bool, RepositoryError> {
        let mut trips = lock(&self.trips);
        let Some(trip) = trips.iter_mut().find(|trip| trip.id == trip_id) else {
            return Ok(false);
        };
        if let Some(name) = &changes.name {
            trip.name = name.clone();
        }
        if let Some(description) = &changes.description {
            trip.description = Some(description.clone());
        }
        if let Some(start_date) = changes.start_date {
            trip.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            trip.end_date = end_date;
        }
        Ok(true)
    }

    async fn set_host(
        &self,
        trip_id: i32,
        current_host: &UserId,
        new_host: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut guests = lock(&self.guests);
        for guest in guests.iter_mut().filter(|guest| guest.trip_id == trip_id) {
            if &guest.guest_id == current_host {
                guest.is_host = false;
            }
            if &guest.guest_id == new_host {
                guest.is_host = true;
            }
        }
        if let Some(trip) = lock(&self.trips).iter_mut().find(|trip| trip.id == trip_id) {
            trip.host_id = new_host.clone();
        }
        Ok(())
    }

    async fn delete_aggregate(&self, trip_id: i32) -> Result<Vec<String>, RepositoryError> {
        let object_keys: Vec<String> = lock(&self.uploads)
            .iter()
            .filter(|upload| upload.trip_id == trip_id)
            .map(|upload| upload.object_key.clone())
            .collect();

        lock(&self.shares).retain(|row| row.trip_id != trip_id);
        lock(&self.expenses).retain(|row| row.trip_id != trip_id);
        lock(&self.locations).retain(|row| row.trip_id != trip_id);
        lock(&self.categories).retain(|row| row.trip_id != trip_id);
        lock(&self.itinerary).retain(|row| row.trip_id != trip_id);
        lock(&self.todos).retain(|row| row.trip_id != trip_id);
        lock(&self.uploads).retain(|row| row.trip_id != trip_id);
        lock(&self.guests).retain(|row| row.trip_id != trip_id);
        lock(&self.trips).retain(|trip| trip.id != trip_id);

        Ok(object_keys)
    }
}

#[async_trait]
impl GuestRepository for FixtureBackend {
    async fn list(&self, trip_id: i32) -> Result<Vec<GuestProfile>, RepositoryError> {
        Ok(lock(&self.guests)
            .iter()
            .filter(|guest| guest.trip_id == trip_id)
            .map(|guest| {
                let (first_name, last_name) = self.user_names(&guest.guest_id);
                GuestProfile {
                    guest: guest.clone(),
                    first_name,
                    last_name,
                }
            })
            .collect())
    }

    async fn find(
        &self,
        trip_id: i32,
        user_id: &UserId,
    ) -> Result<Option<TripGuest>, RepositoryError> {
        Ok(lock(&self.guests)
            .iter()
            .find(|guest| guest.trip_id == trip_id && &guest.guest_id == user_id)
            .cloned())
    }

    async fn add(&self, guest: &TripGuest) -> Result<(), RepositoryError> {
        let mut guests = lock(&self.guests);
        if guests
            .iter()
            .any(|row| row.trip_id == guest.trip_id && row.guest_id == guest.guest_id)
        {
            return Err(RepositoryError::conflict(
                "User is already a guest of this trip.",
            ));
        }
        guests.push(guest.clone());
        Ok(())
    }

    async fn remove(&self, trip_id: i32, user_id: &UserId) -> Result<bool, RepositoryError> {
        let mut guests = lock(&self.guests);
        let before = guests.len();
        guests.retain(|guest| !(guest.trip_id == trip_id && &guest.guest_id == user_id));
        Ok(guests.len() < before)
    }

    async fn set_rsvp(
        &self,
        trip_id: i32,
        user_id: &UserId,
        status: RsvpStatus,
    ) -> Result<bool, RepositoryError> {
        let mut guests = lock(&self.guests);
        let Some(guest) = guests
            .iter_mut()
            .find(|guest| guest.trip_id == trip_id && &guest.guest_id == user_id)
        else {
            return Ok(false);
        };
        guest.rsvp_status = status;
        Ok(true)
    }
}

#[async_trait]
impl ExpenseRepository for FixtureBackend {
    async fn add(&self, expense: &NewExpense) -> Result<i32, RepositoryError> {
        let expense_id = self.allocate_id();
        let now = Utc::now();
        lock(&self.expenses).push(TripExpense {
            id: expense_id,
            trip_id: expense.trip_id,
            user_id: expense.payer_id.clone(),
            title: expense.title.clone(),
            amount: expense.amount,
            settled: false,
            created_at: now,
            updated_at: now,
        });
        let mut shares = lock(&self.shares);
        for share in &expense.shares {
            shares.push(TripExpenseShare {
                id: self.allocate_id(),
                expense_id,
                user_id: share.user_id.clone(),
                amount: share.amount,
                trip_id: expense.trip_id,
            });
        }
        Ok(expense_id)
    }

    async fn find(&self, expense_id: i32) -> Result<Option<TripExpense>, RepositoryError> {
        Ok(lock(&self.expenses)
            .iter()
            .find(|expense| expense.id == expense_id)
            .cloned())
    }

    async fn update(
        &self,
        expense_id: i32,
        title: &str,
        amount: f64,
        shares: &[ShareInput],
    ) -> Result<(), RepositoryError> {
        let trip_id = {
            let mut expenses = lock(&self.expenses);
            let Some(expense) = expenses.iter_mut().find(|expense| expense.id == expense_id)
            else {
                return Err(RepositoryError::query("expense vanished mid-update"));
            };
            expense.title = title.to_owned();
            expense.amount = amount;
            expense.updated_at = Utc::now();
            expense.trip_id
        };

        let mut rows = lock(&self.shares);
        for share in shares {
            match rows
                .iter_mut()
                .find(|row| row.expense_id == expense_id && row.user_id == share.user_id)
            {
                Some(row) => row.amount = share.amount,
                None => rows.push(TripExpenseShare {
                    id: self.allocate_id(),
                    expense_id,
                    user_id: share.user_id.clone(),
                    amount: share.amount,
                    trip_id,
                }),
            }
        }
        Ok(())
    }

    async fn set_settled(&self, expense_id: i32, settled: bool) -> Result<bool, RepositoryError> {
        let mut expenses = lock(&self.expenses);
        let Some(expense) = expenses.iter_mut().find(|expense| expense.id == expense_id) else {
            return Ok(false);
        };
        expense.settled = settled;
        expense.updated_at = Utc::now();
        Ok(true)
    }

    async fn list(&self, trip_id: i32) -> Result<Vec<ExpenseRecord>, RepositoryError> {
        let shares = lock(&self.shares);
        Ok(lock(&self.expenses)
            .iter()
            .filter(|expense| expense.trip_id == trip_id)
            .map(|expense| {
                let (payer_first_name, payer_last_name) = self.user_names(&expense.user_id);
                ExpenseRecord {
                    expense: expense.clone(),
                    payer_first_name,
                    payer_last_name,
                    shares: shares
                        .iter()
                        .filter(|share| share.expense_id == expense.id)
                        .map(|share| {
                            let (first_name, last_name) = self.user_names(&share.user_id);
                            ShareDetail {
                                user_id: share.user_id.clone(),
                                amount: share.amount,
                                first_name,
                                last_name,
                            }
                        })
                        .collect(),
                }
            })
            .collect())
    }

    async fn remove(&self, expense_id: i32) -> Result<(), RepositoryError> {
        lock(&self.shares).retain(|share| share.expense_id != expense_id);
        lock(&self.expenses).retain(|expense| expense.id != expense_id);
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for FixtureBackend {
    async fn add_category(&self, trip_id: i32, name: &str) -> Result<(), RepositoryError> {
        let mut categories = lock(&self.categories);
        if categories
            .iter()
            .any(|category| category.trip_id == trip_id && category.name == name)
        {
            return Err(RepositoryError::conflict("Category already exists."));
        }
        let id = self.allocate_id();
        categories.push(LocationCategory {
            id,
            trip_id,
            name: name.to_owned(),
        });
        Ok(())
    }

    async fn rename_category(
        &self,
        trip_id: i32,
        old_name: &str,
        new_name: &str,
    ) -> Result<bool, RepositoryError> {
        let mut categories = lock(&self.categories);
        if categories
            .iter()
            .any(|category| category.trip_id == trip_id && category.name == new_name)
        {
            return Err(RepositoryError::conflict("Category already exists."));
        }
        let Some(category) = categories
            .iter_mut()
            .find(|category| category.trip_id == trip_id && category.name == old_name)
        else {
            return Ok(false);
        };
        category.name = new_name.to_owned();
        Ok(true)
    }

    async fn remove_category(&self, trip_id: i32, name: &str) -> Result<bool, RepositoryError> {
        let category_id = {
            let categories = lock(&self.categories);
            categories
                .iter()
                .find(|category| category.trip_id == trip_id && category.name == name)
                .map(|category| category.id)
        };
        let Some(category_id) = category_id else {
            return Ok(false);
        };
        lock(&self.locations)
            .retain(|location| !(location.trip_id == trip_id && location.category_id == Some(category_id)));
        lock(&self.categories).retain(|category| category.id != category_id);
        Ok(true)
    }

    async fn list_categories(
        &self,
        trip_id: i32,
    ) -> Result<Vec<LocationCategory>, RepositoryError> {
        Ok(lock(&self.categories)
            .iter()
            .filter(|category| category.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn add(&self, location: &NewLocation) -> Result<(), RepositoryError> {
        {
            let locations = lock(&self.locations);
            if locations
                .iter()
                .any(|row| row.trip_id == location.trip_id && row.place_id == location.place_id)
            {
                return Err(RepositoryError::conflict("Location already exists."));
            }
        }
        let category_id = location
            .category_name
            .as_deref()
            .map(|name| self.resolve_or_create_category(location.trip_id, name));
        lock(&self.locations).push(TripLocation {
            id: self.allocate_id(),
            trip_id: location.trip_id,
            user_id: location.user_id.clone(),
            place_id: location.place_id.clone(),
            name: location.name.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            category_id,
        });
        Ok(())
    }

    async fn update(
        &self,
        trip_id: i32,
        place_id: &str,
        changes: &LocationChanges,
    ) -> Result<bool, RepositoryError> {
        let category_id = changes
            .category_name
            .as_deref()
            .map(|name| self.resolve_or_create_category(trip_id, name));
        let mut locations = lock(&self.locations);
        let Some(location) = locations
            .iter_mut()
            .find(|location| location.trip_id == trip_id && location.place_id == place_id)
        else {
            return Ok(false);
        };
        if let Some(name) = &changes.name {
            location.name = name.clone();
        }
        if category_id.is_some() {
            location.category_id = category_id;
        }
        Ok(true)
    }

    async fn remove(&self, trip_id: i32, place_id: &str) -> Result<bool, RepositoryError> {
        let mut locations = lock(&self.locations);
        let before = locations.len();
        locations
            .retain(|location| !(location.trip_id == trip_id && location.place_id == place_id));
        Ok(locations.len() < before)
    }

    async fn list(&self, trip_id: i32) -> Result<Vec<LocationRecord>, RepositoryError> {
        let categories = lock(&self.categories);
        Ok(lock(&self.locations)
            .iter()
            .filter(|location| location.trip_id == trip_id)
            .map(|location| LocationRecord {
                place_id: location.place_id.clone(),
                name: location.name.clone(),
                latitude: location.latitude,
                longitude: location.longitude,
                category_id: location.category_id,
                category_name: location.category_id.and_then(|id| {
                    categories
                        .iter()
                        .find(|category| category.id == id)
                        .map(|category| category.name.clone())
                }),
            })
            .collect())
    }
}

#[async_trait]
impl ItineraryRepository for FixtureBackend {
    async fn add(&self, entry: &ItineraryEntry) -> Result<(), RepositoryError> {
        let mut itinerary = lock(&self.itinerary);
        if itinerary.iter().any(|row| row.id == entry.id) {
            return Err(RepositoryError::conflict("Itinerary item already exists."));
        }
        itinerary.push(entry.clone());
        Ok(())
    }

    async fn update(
        &self,
        trip_id: i32,
        entry_id: &str,
        date: DateTime<Utc>,
        description: &str,
    ) -> Result<bool, RepositoryError> {
        let mut itinerary = lock(&self.itinerary);
        let Some(entry) = itinerary
            .iter_mut()
            .find(|entry| entry.trip_id == trip_id && entry.id == entry_id)
        else {
            return Ok(false);
        };
        entry.date = date;
        entry.description = description.to_owned();
        Ok(true)
    }

    async fn list(&self, trip_id: i32) -> Result<Vec<ItineraryEntry>, RepositoryError> {
        let mut entries: Vec<ItineraryEntry> = lock(&self.itinerary)
            .iter()
            .filter(|entry| entry.trip_id == trip_id)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.date);
        Ok(entries)
    }

    async fn remove(&self, trip_id: i32, entry_id: &str) -> Result<bool, RepositoryError> {
        let mut itinerary = lock(&self.itinerary);
        let before = itinerary.len();
        itinerary.retain(|entry| !(entry.trip_id == trip_id && entry.id == entry_id));
        Ok(itinerary.len() < before)
    }
}

#[async_trait]
impl TodoRepository for FixtureBackend {
    async fn add(&self, todo: &TripTodo) -> Result<(), RepositoryError> {
        let mut todos = lock(&self.todos);
        if todos.iter().any(|row| row.id == todo.id) {
            return Err(RepositoryError::conflict("Todo already exists."));
        }
        todos.push(todo.clone());
        Ok(())
    }

    async fn update(
        &self,
        trip_id: i32,
        todo_id: &str,
        changes: &TodoChanges,
        updated_by: &UserId,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut todos = lock(&self.todos);
        let Some(todo) = todos
            .iter_mut()
            .find(|todo| todo.trip_id == trip_id && todo.id == todo_id)
        else {
            return Ok(false);
        };
        if let Some(text) = &changes.text {
            todo.text = text.clone();
        }
        if let Some(checked) = changes.checked {
            todo.checked = checked;
        }
        todo.last_updated_by = updated_by.clone();
        todo.last_updated_at = updated_at;
        Ok(true)
    }

    async fn list(&self, trip_id: i32) -> Result<Vec<TripTodo>, RepositoryError> {
        Ok(lock(&self.todos)
            .iter()
            .filter(|todo| todo.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn remove(&self, trip_id: i32, todo_id: &str) -> Result<bool, RepositoryError> {
        let mut todos = lock(&self.todos);
        let before = todos.len();
        todos.retain(|todo| !(todo.trip_id == trip_id && todo.id == todo_id));
        Ok(todos.len() < before)
    }
}

#[async_trait]
impl UploadRepository for FixtureBackend {
    async fn record(&self, upload: &NewUpload) -> Result<i32, RepositoryError> {
        let id = self.allocate_id();
        lock(&self.uploads).push(UserUpload {
            id,
            upload_user_id: upload.upload_user_id.clone(),
            trip_id: upload.trip_id,
            document_category: upload.document_category,
            file_name: upload.file_name.clone(),
            object_key: upload.object_key.clone(),
            upload_timestamp: Utc::now(),
        });
        Ok(id)
    }

    async fn find(&self, upload_id: i32) -> Result<Option<UserUpload>, RepositoryError> {
        Ok(lock(&self.uploads)
            .iter()
            .find(|upload| upload.id == upload_id)
            .cloned())
    }

    async fn list(
        &self,
        trip_id: i32,
        category: Option<DocumentCategory>,
    ) -> Result<Vec<UserUpload>, RepositoryError> {
        Ok(lock(&self.uploads)
            .iter()
            .filter(|upload| upload.trip_id == trip_id)
            .filter(|upload| category.is_none_or(|wanted| upload.document_category == wanted))
            .cloned()
            .collect())
    }

    async fn remove(&self, upload_id: i32) -> Result<bool, RepositoryError> {
        let mut uploads = lock(&self.uploads);
        let before = uploads.len();
        uploads.retain(|upload| upload.id != upload_id);
        Ok(uploads.len() < before)
    }
}

/// Handler state wired entirely to one fixture backend.
pub(crate) fn http_state(backend: &Arc<FixtureBackend>) -> HttpState {
    HttpState {
        identity: backend.clone(),
        store: backend.clone(),
        users: backend.clone(),
        trips: backend.clone(),
        guests: backend.clone(),
        expenses: backend.clone(),
        locations: backend.clone(),
        itinerary: backend.clone(),
        todos: backend.clone(),
        uploads: backend.clone(),
        upload_url_ttl: Duration::from_secs(300),
    }
}

/// Build the production route layout around a fixture backend.
pub(crate) fn test_app(
    backend: &Arc<FixtureBackend>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(http_state(backend)))
        .configure(crate::server::configure_api)
}
