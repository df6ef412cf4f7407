//! Background worker applying queued soft deletions.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::deletion_job::DeletionJob;
use crate::domain::repositories::UrlStorage;

/// Drains the deletion queue until every sender is dropped.
///
/// Each code of a job is deleted on its own: a code the user does not own,
/// or a storage failure, is logged and counted but never stops the rest of
/// the batch. Nothing is reported back to the requester.
pub async fn run_deletion_worker(
    mut rx: mpsc::Receiver<DeletionJob>,
    storage: Arc<dyn UrlStorage>,
) {
    while let Some(job) = rx.recv().await {
        process_job(storage.as_ref(), job).await;
    }

    info!("Deletion queue closed, worker stopped");
}

async fn process_job(storage: &dyn UrlStorage, job: DeletionJob) {
    for short_url in &job.short_urls {
        match storage
            .delete_by_user_id_and_short(&job.user_id, short_url)
            .await
        {
            Ok(()) => {
                metrics::counter!("shortener_deletions_total", "outcome" => "deleted").increment(1);
                debug!(user_id = %job.user_id, short_url, "Marked url as deleted");
            }
            Err(e) => {
                metrics::counter!("shortener_deletions_total", "outcome" => "failed").increment(1);
                warn!(user_id = %job.user_id, short_url, error = %e, "Failed to mark url as deleted");
            }
        }
    }
}
