//! Storage trait definitions for the domain layer.
//!
//! The [`UrlStorage`] trait is the single contract every backend satisfies.
//! Implementations live in `crate::infrastructure::persistence`; a mock is
//! generated via `mockall` for service tests.
//!
//! # Testing
//!
//! Backend behavior is covered by unit tests next to each implementation and
//! by `tests/repository_pg.rs` for PostgreSQL.

pub mod url_storage;

pub use url_storage::{StorageError, StorageResult, StoreOutcome, UrlStorage};

#[cfg(test)]
pub use url_storage::MockUrlStorage;
