//! Infrastructure layer for external integrations.
//!
//! Implements the storage contract defined by the domain layer against
//! process memory, the local filesystem and PostgreSQL.
//!
//! # Modules
//!
//! - [`persistence`] - storage backends and backend selection

pub mod persistence;
