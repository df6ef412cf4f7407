//! API route configuration.
//!
//! Every route runs behind [`crate::api::middleware::identity`], applied in
//! [`crate::routes::app_router`].

use crate::api::handlers::{
    delete_user_urls_handler, internal_stats_handler, shorten_batch_handler, shorten_handler,
    user_urls_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /shorten`         - Shorten one URL
/// - `POST   /shorten/batch`   - Shorten a batch of URLs
/// - `GET    /user/urls`       - List the caller's URLs
/// - `DELETE /user/urls`       - Queue the caller's URLs for deletion
/// - `GET    /internal/stats`  - URL and user counts (trusted subnet only)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/batch", post(shorten_batch_handler))
        .route(
            "/user/urls",
            get(user_urls_handler).delete(delete_user_urls_handler),
        )
        .route("/internal/stats", get(internal_stats_handler))
}
