//! HTTP server initialization and runtime setup.
//!
//! Opens the configured storage, spawns the deletion worker and runs the Axum
//! server until a shutdown signal arrives.

use crate::application::services::{IdentityService, ShortenerService};
use crate::config::Config;
use crate::domain::deletion_worker::run_deletion_worker;
use crate::infrastructure::persistence::connect_storage;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (memory, file or PostgreSQL with migrations)
/// - Background deletion worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the deletion queue is drained before storage is closed, so
/// accepted deletions are not lost.
///
/// # Errors
///
/// Returns an error if:
/// - Storage cannot be opened
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let backend = config.storage_backend()?;
    let storage = connect_storage(&backend)
        .await
        .with_context(|| format!("Failed to open {} storage", backend.kind()))?;

    let (delete_tx, delete_rx) = mpsc::channel(config.delete_queue_capacity);
    let worker = tokio::spawn(run_deletion_worker(delete_rx, storage.clone()));
    tracing::info!("Deletion worker started");

    let state = AppState {
        shortener_service: Arc::new(ShortenerService::new(storage.clone(), &config.base_url)),
        identity_service: Arc::new(IdentityService::new(&config.token_signing_secret)),
        delete_sender: delete_tx,
        trusted_subnet: config.trusted_subnet,
    };

    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_address))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last sender; the worker exits once the queue is empty.
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Deletion worker panicked");
    }

    storage.close().await.context("Failed to close storage")?;
    tracing::info!("Storage closed, bye");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
