//! Storage backend implementations and runtime backend selection.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - process-lifetime map, nothing persisted
//! - [`FileStorage`] - in-memory map mirrored to a newline-delimited JSON file
//! - [`PgStorage`] - PostgreSQL via SQLx
//!
//! The backend is picked once at startup from [`StorageBackend`]; the rest of
//! the service only sees `Arc<dyn UrlStorage>`.

pub mod file_storage;
pub mod memory_storage;
pub mod pg_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use pg_storage::{PgSettings, PgStorage};

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::repositories::{StorageResult, UrlStorage};

/// Which storage backend to run, with its settings.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory,
    File { path: PathBuf },
    Database(PgSettings),
}

impl StorageBackend {
    /// Short name used in logs and configuration.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File { .. } => "file",
            Self::Database(_) => "db",
        }
    }
}

/// Opens the configured backend.
///
/// # Errors
///
/// Fails if the storage file cannot be read or is corrupt, or if the
/// database is unreachable or its schema cannot be created. The service must
/// not start in either case.
pub async fn connect_storage(backend: &StorageBackend) -> StorageResult<Arc<dyn UrlStorage>> {
    let storage: Arc<dyn UrlStorage> = match backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::File { path } => Arc::new(FileStorage::open(path).await?),
        StorageBackend::Database(settings) => Arc::new(PgStorage::connect(settings).await?),
    };

    tracing::info!(backend = backend.kind(), "Storage ready");
    Ok(storage)
}
