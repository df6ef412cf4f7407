//! Handlers for the caller's own URLs.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::api::dto::user_urls::{DeleteUrlsRequest, UserUrlItem};
use crate::application::services::UserIdentity;
use crate::domain::deletion_job::DeletionJob;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's URLs.
///
/// # Endpoint
///
/// `GET /api/user/urls`
///
/// # Response
///
/// ```json
/// [
///   { "short_url": "http://localhost:8080/DdGYF42", "original_url": "https://practicum.yandex.ru/" }
/// ]
/// ```
///
/// **204 No Content** when the caller owns no live URLs. Deleted URLs are not
/// listed.
pub async fn user_urls_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> Result<Response, AppError> {
    let records = state
        .shortener_service
        .user_urls(&identity.user_id)
        .await?;

    if records.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let items: Vec<UserUrlItem> = records
        .into_iter()
        .map(|record| UserUrlItem {
            short_url: state.shortener_service.short_url(&record.short_url),
            original_url: record.original_url,
        })
        .collect();

    Ok(Json(items).into_response())
}

/// Queues the caller's URLs for deletion.
///
/// # Endpoint
///
/// `DELETE /api/user/urls`
///
/// # Request Body
///
/// ```json
/// ["6qxTVvsy", "RTfd56hn", "Jlfd67ds"]
/// ```
///
/// Returns **202 Accepted** as soon as the job is queued. Codes the caller
/// does not own are skipped by the worker without any feedback.
///
/// # Errors
///
/// Returns 400 Bad Request for an empty list and 503 Service Unavailable if
/// the deletion worker is gone.
pub async fn delete_user_urls_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(codes): Json<DeleteUrlsRequest>,
) -> Result<StatusCode, AppError> {
    let job = DeletionJob::new(identity.user_id, codes);
    if job.is_empty() {
        return Err(AppError::bad_request(
            "At least one short url is required",
            json!({}),
        ));
    }

    let count = job.short_urls.len();
    state.delete_sender.send(job).await.map_err(|_| {
        AppError::unavailable(
            "Deletion queue is closed",
            json!({ "reason": "Deletion worker is not running" }),
        )
    })?;
    debug!(count, "Queued urls for deletion");

    Ok(StatusCode::ACCEPTED)
}
