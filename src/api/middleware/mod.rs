//! HTTP middleware for request processing.
//!
//! Provides user identity and observability middleware.

pub mod identity;
pub mod tracing;
