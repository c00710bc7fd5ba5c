//! Document upload pointers.
//!
//! The database row is the source of truth for an uploaded object; object
//! storage holds no metadata of its own.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::user::UserId;

/// Kind of travel document an upload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Travel,
    Accommodation,
}

/// Error raised when parsing a document category from the wire or a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid document category.")]
pub struct InvalidDocumentCategory;

impl DocumentCategory {
    /// Stable storage/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Accommodation => "accommodation",
        }
    }
}

impl FromStr for DocumentCategory {
    type Err = InvalidDocumentCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "travel" => Ok(Self::Travel),
            "accommodation" => Ok(Self::Accommodation),
            _ => Err(InvalidDocumentCategory),
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata row recorded once a client reports a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UserUpload {
    pub id: i32,
    pub upload_user_id: UserId,
    pub trip_id: i32,
    pub document_category: DocumentCategory,
    pub file_name: String,
    pub object_key: String,
    pub upload_timestamp: DateTime<Utc>,
}
