//! Business logic services for the application layer.

pub mod identity_service;
pub mod shortener_service;

pub use identity_service::{IdentityService, UserIdentity};
pub use shortener_service::ShortenerService;
