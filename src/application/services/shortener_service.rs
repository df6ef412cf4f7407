//! Shortening, resolution and per-user listing on top of a [`UrlStorage`].

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{ShortenedData, Statistic};
use crate::domain::repositories::{StorageError, StoreOutcome, UrlStorage};
use crate::error::AppError;
use crate::utils::short_code::{MAX_SHORT_CODE_LEN, SHORT_CODE_LEN, encode_with_len};
use crate::utils::url_validator::validate_url;

/// Service for creating and resolving short URLs.
///
/// Codes are derived from the URL itself, so shortening the same URL twice
/// lands on the same record. When a code is already held by a different URL
/// the code is widened one character at a time until a free one is found.
pub struct ShortenerService {
    storage: Arc<dyn UrlStorage>,
    base_url: String,
}

impl ShortenerService {
    /// Creates a new service; `base_url` prefixes every returned short URL.
    pub fn new(storage: Arc<dyn UrlStorage>, base_url: impl Into<String>) -> Self {
        Self {
            storage,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn storage(&self) -> &Arc<dyn UrlStorage> {
        &self.storage
    }

    /// Shortens `original_url` on behalf of `user_id`.
    ///
    /// Returns [`StoreOutcome::Existing`] with the canonical record when the
    /// URL was shortened before, by anyone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute HTTP(S)
    /// URL, [`AppError::Internal`] if every code width collides or storage
    /// fails.
    pub async fn shorten(&self, user_id: &str, original_url: &str) -> Result<StoreOutcome, AppError> {
        validate_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        self.store_with_widening(user_id, original_url).await
    }

    /// Shortens every URL in `original_urls`, in order.
    ///
    /// All URLs are validated before anything is stored, so an invalid entry
    /// rejects the whole batch.
    pub async fn shorten_many(
        &self,
        user_id: &str,
        original_urls: &[String],
    ) -> Result<Vec<StoreOutcome>, AppError> {
        for (position, url) in original_urls.iter().enumerate() {
            validate_url(url).map_err(|e| {
                AppError::bad_request(
                    "Invalid URL in batch",
                    json!({ "position": position, "reason": e.to_string() }),
                )
            })?;
        }

        let mut outcomes = Vec::with_capacity(original_urls.len());
        for url in original_urls {
            outcomes.push(self.store_with_widening(user_id, url).await?);
        }

        Ok(outcomes)
    }

    async fn store_with_widening(
        &self,
        user_id: &str,
        original_url: &str,
    ) -> Result<StoreOutcome, AppError> {
        for len in SHORT_CODE_LEN..=MAX_SHORT_CODE_LEN {
            let short_url = encode_with_len(original_url.as_bytes(), len);
            let record = ShortenedData::new(user_id, short_url, original_url);

            match self.storage.store(record).await {
                Ok(outcome) => {
                    debug!(
                        short_url = %outcome.record().short_url,
                        existing = outcome.is_existing(),
                        "Stored url"
                    );
                    return Ok(outcome);
                }
                Err(StorageError::ShortCodeCollision { short_url }) => {
                    warn!(%short_url, "Short code collision, widening");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::internal(
            "Failed to allocate short url",
            json!({ "reason": "Every code width collides" }),
        ))
    }

    /// Looks up the original URL behind `short_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code and
    /// [`AppError::Gone`] for a soft-deleted one.
    pub async fn resolve(&self, short_url: &str) -> Result<String, AppError> {
        let record = self.storage.get(short_url).await?;

        if record.is_deleted {
            return Err(AppError::gone(
                "Short url was deleted",
                json!({ "short_url": short_url }),
            ));
        }

        Ok(record.original_url)
    }

    /// Every non-deleted record owned by `user_id`.
    pub async fn user_urls(&self, user_id: &str) -> Result<Vec<ShortenedData>, AppError> {
        let mut records = self.storage.get_batch_by_user_id(user_id).await?;
        records.retain(|record| !record.is_deleted);
        records.sort_by(|a, b| a.short_url.cmp(&b.short_url));
        Ok(records)
    }

    pub async fn statistic(&self) -> Result<Statistic, AppError> {
        Ok(self.storage.get_statistic().await?)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        Ok(self.storage.ping().await?)
    }

    /// Full short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlStorage;
    use mockall::predicate::eq;

    const URL: &str = "https://practicum.yandex.ru/";

    fn service(storage: MockUrlStorage) -> ShortenerService {
        ShortenerService::new(Arc::new(storage), "http://localhost:8080/")
    }

    #[tokio::test]
    async fn test_shorten_success() {
        let mut storage = MockUrlStorage::new();
        storage
            .expect_store()
            .withf(|record| {
                record.short_url == "DdGYF42"
                    && record.original_url == URL
                    && record.user_id == "u1"
                    && !record.is_deleted
            })
            .times(1)
            .returning(|record| Ok(StoreOutcome::Created(record)));

        let outcome = service(storage).shorten("u1", URL).await.unwrap();

        assert!(!outcome.is_existing());
        assert_eq!(outcome.record().short_url, "DdGYF42");
    }

    #[tokio::test]
    async fn test_shorten_existing_is_passed_through() {
        let mut storage = MockUrlStorage::new();
        storage.expect_store().times(1).returning(|record| {
            Ok(StoreOutcome::Existing(ShortenedData::new(
                "someone-else",
                record.short_url,
                record.original_url,
            )))
        });

        let outcome = service(storage).shorten("u1", URL).await.unwrap();

        assert!(outcome.is_existing());
        assert_eq!(outcome.record().user_id, "someone-else");
    }

    #[tokio::test]
    async fn test_shorten_widens_code_on_collision() {
        let mut storage = MockUrlStorage::new();
        storage
            .expect_store()
            .withf(|record| record.short_url == "DdGYF42")
            .times(1)
            .returning(|record| {
                Err(StorageError::ShortCodeCollision {
                    short_url: record.short_url,
                })
            });
        storage
            .expect_store()
            .withf(|record| record.short_url == "DdGYF429")
            .times(1)
            .returning(|record| Ok(StoreOutcome::Created(record)));

        let outcome = service(storage).shorten("u1", URL).await.unwrap();

        assert_eq!(outcome.record().short_url, "DdGYF429");
    }

    #[tokio::test]
    async fn test_shorten_gives_up_when_every_width_collides() {
        let mut storage = MockUrlStorage::new();
        storage
            .expect_store()
            .times(MAX_SHORT_CODE_LEN - SHORT_CODE_LEN + 1)
            .returning(|record| {
                Err(StorageError::ShortCodeCollision {
                    short_url: record.short_url,
                })
            });

        let err = service(storage).shorten("u1", URL).await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let mut storage = MockUrlStorage::new();
        storage.expect_store().times(0);

        let err = service(storage).shorten("u1", "not-a-url").await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_many_rejects_whole_batch() {
        let mut storage = MockUrlStorage::new();
        storage.expect_store().times(0);

        let urls = vec!["https://a.com".to_string(), "javascript:alert(1)".to_string()];
        let err = service(storage).shorten_many("u1", &urls).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_many_keeps_order() {
        let mut storage = MockUrlStorage::new();
        storage
            .expect_store()
            .times(2)
            .returning(|record| Ok(StoreOutcome::Created(record)));

        let urls = vec!["https://a.com".to_string(), "https://b.com".to_string()];
        let outcomes = service(storage).shorten_many("u1", &urls).await.unwrap();

        assert_eq!(outcomes[0].record().original_url, "https://a.com");
        assert_eq!(outcomes[1].record().original_url, "https://b.com");
    }

    #[tokio::test]
    async fn test_resolve() {
        let mut storage = MockUrlStorage::new();
        storage
            .expect_get()
            .with(eq("DdGYF42"))
            .times(1)
            .returning(|code| Ok(ShortenedData::new("u1", code, URL)));

        let url = service(storage).resolve("DdGYF42").await.unwrap();

        assert_eq!(url, URL);
    }

    #[tokio::test]
    async fn test_resolve_deleted_is_gone() {
        let mut storage = MockUrlStorage::new();
        storage.expect_get().times(1).returning(|code| {
            let mut record = ShortenedData::new("u1", code, URL);
            record.is_deleted = true;
            Ok(record)
        });

        let err = service(storage).resolve("DdGYF42").await.unwrap_err();

        assert!(matches!(err, AppError::Gone { .. }));
    }

    #[tokio::test]
    async fn test_resolve_unknown_is_not_found() {
        let mut storage = MockUrlStorage::new();
        storage
            .expect_get()
            .times(1)
            .returning(|code| Err(StorageError::NotFound(code.to_string())));

        let err = service(storage).resolve("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_user_urls_skips_deleted() {
        let mut storage = MockUrlStorage::new();
        storage.expect_get_batch_by_user_id().times(1).returning(|user| {
            let mut deleted = ShortenedData::new(user, "bbbbbbb", "https://b.com");
            deleted.is_deleted = true;
            Ok(vec![
                deleted,
                ShortenedData::new(user, "aaaaaaa", "https://a.com"),
            ])
        });

        let urls = service(storage).user_urls("u1").await.unwrap();

        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].short_url, "aaaaaaa");
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let svc = service(MockUrlStorage::new());

        assert_eq!(svc.short_url("abc1234"), "http://localhost:8080/abc1234");
    }
}
