//! Shared application state injected into every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{IdentityService, ShortenerService};
use crate::domain::deletion_job::DeletionJob;
use crate::utils::trusted_subnet::TrustedSubnet;

#[derive(Clone)]
pub struct AppState {
    pub shortener_service: Arc<ShortenerService>,
    pub identity_service: Arc<IdentityService>,
    /// Producer side of the bounded queue drained by
    /// [`run_deletion_worker`](crate::domain::deletion_worker::run_deletion_worker).
    pub delete_sender: mpsc::Sender<DeletionJob>,
    /// `None` closes the internal statistics endpoint to everyone.
    pub trusted_subnet: Option<TrustedSubnet>,
}
