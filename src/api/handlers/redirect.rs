//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown and 410 Gone if its owner
/// deleted it.
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let original_url = state.shortener_service.resolve(&id).await?;

    Ok(Redirect::temporary(&original_url))
}
