//! Helper functions used across the application:
//!
//! - [`short_code`] - deterministic short code derivation
//! - [`url_validator`] - validation of submitted URLs
//! - [`trusted_subnet`] - CIDR check guarding internal endpoints

pub mod short_code;
pub mod trusted_subnet;
pub mod url_validator;
