//! DTOs for the per-user URL endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserUrlItem {
    pub short_url: String,
    pub original_url: String,
}

/// Body of `DELETE /api/user/urls`: bare short codes, not full URLs.
pub type DeleteUrlsRequest = Vec<String>;
