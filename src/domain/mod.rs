//! Domain layer: the stored record, the storage contract, and deletion jobs.
//!
//! # Architecture
//!
//! - [`entities`] - `ShortenedData` and `Statistic`
//! - [`repositories`] - the [`repositories::UrlStorage`] trait and its error type
//! - [`deletion_job`] - a batch of short codes a user asked to delete
//! - [`deletion_worker`] - background task applying deletion jobs
//!
//! # Deletion Flow
//!
//! 1. `DELETE /api/user/urls` accepts a list of codes and answers 202 at once
//! 2. A [`deletion_job::DeletionJob`] is pushed onto a bounded channel
//! 3. [`deletion_worker::run_deletion_worker`] soft-deletes each code
//!    independently and logs the ones that fail

pub mod deletion_job;
pub mod deletion_worker;
pub mod entities;
pub mod repositories;
