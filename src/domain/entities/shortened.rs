//! Shortened URL record shared by every storage backend.

use serde::{Deserialize, Serialize};

/// A stored mapping between a short code and the submitted URL.
///
/// The serde field names are the on-disk format of the file backend: one
/// JSON object per line, so renaming a field breaks existing storage files.
/// `userID` and `is_deleted` default when absent so logs written before
/// ownership and soft deletion existed still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenedData {
    pub uuid: String,
    #[serde(rename = "userID", default)]
    pub user_id: String,
    pub short_url: String,
    pub original_url: String,
    #[serde(default)]
    pub is_deleted: bool,
}

impl ShortenedData {
    /// Creates a fresh, not yet stored record with a random UUID.
    pub fn new(
        user_id: impl Into<String>,
        short_url: impl Into<String>,
        original_url: impl Into<String>,
    ) -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            short_url: short_url.into(),
            original_url: original_url.into(),
            is_deleted: false,
        }
    }

    /// Returns true if `user_id` owns this record.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Aggregate counters over all stored records, soft-deleted ones included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistic {
    pub urls: i64,
    pub users: i64,
}
