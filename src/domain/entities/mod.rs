//! Core domain entities.
//!
//! - [`ShortenedData`] - the only persisted entity
//! - [`Statistic`] - aggregate counters reported by storage backends

pub mod shortened;

pub use shortened::{ShortenedData, Statistic};
