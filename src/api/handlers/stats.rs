//! Handler for internal service statistics.

use axum::{Json, extract::State, http::HeaderMap};
use serde_json::json;

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the client address as seen by the reverse proxy.
pub const REAL_IP_HEADER: &str = "x-real-ip";

/// Returns URL and user counts.
///
/// # Endpoint
///
/// `GET /api/internal/stats`
///
/// # Access
///
/// Only clients whose `X-Real-IP` lies inside `TRUSTED_SUBNET`. With no
/// subnet configured the endpoint is closed to everyone.
///
/// # Response
///
/// ```json
/// { "urls": 42, "users": 7 }
/// ```
///
/// Soft-deleted URLs are counted.
///
/// # Errors
///
/// Returns 403 Forbidden when the client is not trusted.
pub async fn internal_stats_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    let real_ip = headers
        .get(REAL_IP_HEADER)
        .and_then(|value| value.to_str().ok());

    let trusted = match (state.trusted_subnet, real_ip) {
        (Some(subnet), Some(ip)) => subnet.allows(ip),
        _ => false,
    };

    if !trusted {
        return Err(AppError::forbidden(
            "Access denied",
            json!({ "reason": "Client is not in the trusted subnet" }),
        ));
    }

    let stat = state.shortener_service.statistic().await?;

    Ok(Json(stat.into()))
}
