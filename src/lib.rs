//! # URL Shortener
//!
//! A URL shortening service built with Axum, with pluggable storage: an
//! in-memory map, a newline-delimited JSON file, or PostgreSQL.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Stored records, the storage trait, the deletion worker
//! - **Application Layer** ([`application`]) - Shortening and identity services
//! - **Infrastructure Layer** ([`infrastructure`]) - Memory, file and PostgreSQL backends
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Deterministic short codes derived from the URL (MD5, URL-safe base64)
//! - Deduplication: one short URL per original URL
//! - Per-user URL listing and asynchronous soft deletion
//! - Signed identity tokens via header or cookie
//! - Internal statistics restricted to a trusted subnet
//!
//! ## Quick Start
//!
//! ```bash
//! export TOKEN_SIGNING_SECRET="change-me"
//! export STORAGE_TYPE="memory"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{IdentityService, ShortenerService, UserIdentity};
    pub use crate::domain::entities::{ShortenedData, Statistic};
    pub use crate::domain::repositories::{StorageError, StoreOutcome, UrlStorage};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
