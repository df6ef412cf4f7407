//! Storage contract implemented by the memory, file and PostgreSQL backends.

use crate::domain::entities::{ShortenedData, Statistic};
use async_trait::async_trait;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Failures reported by a storage backend.
///
/// "URL already shortened" is deliberately absent: it is a successful
/// outcome of [`UrlStorage::store`], see [`StoreOutcome::Existing`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("short url not found: {0}")]
    NotFound(String),

    #[error("no url {short_url} owned by user {user_id}")]
    DeleteRejected { user_id: String, short_url: String },

    #[error("short url {short_url} is already taken by a different url")]
    ShortCodeCollision { short_url: String },

    #[error("storage file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Outcome of a successful [`UrlStorage::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The record was persisted as given.
    Created(ShortenedData),
    /// A record with the same original URL already existed; it is returned
    /// unchanged and nothing was written.
    Existing(ShortenedData),
}

impl StoreOutcome {
    /// The canonical stored record, whichever way the store went.
    pub fn record(&self) -> &ShortenedData {
        match self {
            Self::Created(record) | Self::Existing(record) => record,
        }
    }

    pub fn into_record(self) -> ShortenedData {
        match self {
            Self::Created(record) | Self::Existing(record) => record,
        }
    }

    pub fn is_existing(&self) -> bool {
        matches!(self, Self::Existing(_))
    }
}

/// Persistence interface for shortened URLs.
///
/// Every backend enforces the same rules:
///
/// - one row per `original_url`; storing it again yields
///   [`StoreOutcome::Existing`] with the first record (its `uuid`, owner and
///   `short_url` intact)
/// - `short_url` is unique; a different URL hashing to a taken code fails
///   with [`StorageError::ShortCodeCollision`]
/// - deletion is soft and scoped to the owner
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryStorage`]
/// - [`crate::infrastructure::persistence::FileStorage`]
/// - [`crate::infrastructure::persistence::PgStorage`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStorage: Send + Sync {
    /// Persists `record` unless its original URL is already stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ShortCodeCollision`] if `record.short_url`
    /// belongs to another URL, or a backend I/O error.
    async fn store(&self, record: ShortenedData) -> StorageResult<StoreOutcome>;

    /// Looks a record up by its short code.
    ///
    /// Soft-deleted records are returned too; callers check
    /// [`ShortenedData::is_deleted`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no record has this code.
    async fn get(&self, short_url: &str) -> StorageResult<ShortenedData>;

    /// Returns every record owned by `user_id`, in no particular order.
    ///
    /// A user with no URLs gets an empty list, not an error.
    async fn get_batch_by_user_id(&self, user_id: &str) -> StorageResult<Vec<ShortenedData>>;

    /// Marks the record as deleted if `user_id` owns it.
    ///
    /// Deleting an already deleted record of the same owner succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DeleteRejected`] if the code is unknown or
    /// owned by someone else; the record is left untouched.
    async fn delete_by_user_id_and_short(&self, user_id: &str, short_url: &str)
    -> StorageResult<()>;

    /// Counts stored URLs and distinct owners.
    async fn get_statistic(&self) -> StorageResult<Statistic>;

    /// Checks that the backing medium is reachable.
    async fn ping(&self) -> StorageResult<()>;

    /// Flushes and releases backend resources.
    async fn close(&self) -> StorageResult<()>;
}
