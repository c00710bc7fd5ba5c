//! User identity and profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque user identifier issued by the external identity provider.
///
/// The backend never mints these ids; it only validates that they are
/// non-empty and free of surrounding whitespace before trusting them as keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

/// Validation errors returned when constructing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdValidationError {
    /// Identifier is empty after trimming whitespace.
    #[error("user id must not be empty")]
    Empty,
    /// Identifier has leading or trailing whitespace.
    #[error("user id must not contain surrounding whitespace")]
    ContainsWhitespace,
}

impl UserId {
    /// Construct an id after validating its shape.
    pub fn new(value: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(UserIdValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying id as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// A registered user profile.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}
