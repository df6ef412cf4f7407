//! Deletion request queued for asynchronous processing.

/// A user's request to soft-delete a set of short codes.
///
/// Sent from the HTTP handler to [`crate::domain::deletion_worker`] over a
/// bounded channel so the response does not wait for storage writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionJob {
    pub user_id: String,
    pub short_urls: Vec<String>,
}

impl DeletionJob {
    pub fn new(user_id: impl Into<String>, short_urls: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            short_urls,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.short_urls.is_empty()
    }
}
