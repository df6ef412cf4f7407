//! Application layer services implementing business logic.
//!
//! Services consume the [`UrlStorage`](crate::domain::repositories::UrlStorage)
//! trait and give HTTP handlers and the admin CLI a storage-agnostic API.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - Shortening, redirects, per-user listing
//! - [`services::identity_service::IdentityService`] - Signed user identity tokens

pub mod services;
