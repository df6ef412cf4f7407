//! Handlers for liveness and health checks.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Storage liveness probe.
///
/// # Endpoint
///
/// `GET /ping`
///
/// - **200 OK**: storage answered
/// - **500 Internal Server Error**: storage is unreachable
pub async fn ping_handler(State(state): State<AppState>) -> StatusCode {
    match state.shortener_service.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Storage ping failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Storage reachable" },
///     "delete_queue": { "status": "ok", "message": "Capacity: 1024" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let delete_queue = check_delete_queue(&state);

    let all_healthy = storage.is_ok() && delete_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage,
            delete_queue,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.shortener_service.ping().await {
        Ok(()) => CheckStatus::ok("Storage reachable"),
        Err(e) => CheckStatus::error(format!("Storage error: {e}")),
    }
}

fn check_delete_queue(state: &AppState) -> CheckStatus {
    if state.delete_sender.is_closed() {
        CheckStatus::error("Deletion queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.delete_sender.capacity()))
    }
}
