//! Handlers for the shortening endpoints.

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::batch::{BatchRequestItem, BatchResponseItem};
use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::application::services::UserIdentity;
use crate::error::AppError;
use crate::state::AppState;

fn status_for(existing: bool) -> StatusCode {
    if existing {
        StatusCode::CONFLICT
    } else {
        StatusCode::CREATED
    }
}

/// Shortens a URL sent as a plain-text body.
///
/// # Endpoint
///
/// `POST /`
///
/// # Response
///
/// The short URL as `text/plain`, with:
///
/// - **201 Created**: new short URL
/// - **409 Conflict**: the URL was shortened before; body is the existing short URL
///
/// # Errors
///
/// Returns 400 Bad Request if the body is empty or not an HTTP(S) URL.
pub async fn shorten_text_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let original_url = body.trim();
    if original_url.is_empty() {
        return Err(AppError::bad_request(
            "Request body must contain a URL",
            json!({}),
        ));
    }

    let outcome = state
        .shortener_service
        .shorten(&identity.user_id, original_url)
        .await?;
    let short_url = state
        .shortener_service
        .short_url(&outcome.record().short_url);

    Ok((
        status_for(outcome.is_existing()),
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        short_url,
    ))
}

/// Shortens a single URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://practicum.yandex.ru/" }
/// ```
///
/// # Response
///
/// ```json
/// { "result": "http://localhost:8080/DdGYF42" }
/// ```
///
/// 201 for a new short URL, 409 with the same body shape when it already
/// exists.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<ShortenRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let outcome = state
        .shortener_service
        .shorten(&identity.user_id, &payload.url)
        .await?;

    let response = ShortenResponse {
        result: state
            .shortener_service
            .short_url(&outcome.record().short_url),
    };

    Ok((status_for(outcome.is_existing()), Json(response)))
}

/// Shortens a batch of URLs.
///
/// # Endpoint
///
/// `POST /api/shorten/batch`
///
/// # Request Body
///
/// ```json
/// [
///   { "correlation_id": "1", "original_url": "https://a.com" },
///   { "correlation_id": "2", "original_url": "https://b.com" }
/// ]
/// ```
///
/// # Response
///
/// **201 Created** with one `{correlation_id, short_url}` per input, in input
/// order. URLs shortened before resolve to their existing short URL.
///
/// # Errors
///
/// Returns 400 Bad Request for an empty batch or if any entry is invalid;
/// nothing is stored in that case.
pub async fn shorten_batch_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<Vec<BatchRequestItem>>,
) -> Result<impl IntoResponse, AppError> {
    if payload.is_empty() {
        return Err(AppError::bad_request("Batch must not be empty", json!({})));
    }
    for item in &payload {
        item.validate()?;
    }

    let urls: Vec<String> = payload
        .iter()
        .map(|item| item.original_url.clone())
        .collect();
    let outcomes = state
        .shortener_service
        .shorten_many(&identity.user_id, &urls)
        .await?;

    let items: Vec<BatchResponseItem> = payload
        .into_iter()
        .zip(outcomes)
        .map(|(item, outcome)| BatchResponseItem {
            correlation_id: item.correlation_id,
            short_url: state
                .shortener_service
                .short_url(&outcome.record().short_url),
        })
        .collect();

    Ok((StatusCode::CREATED, Json(items)))
}
