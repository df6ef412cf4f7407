//! In-memory storage backend.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

use crate::domain::entities::{ShortenedData, Statistic};
use crate::domain::repositories::{StorageError, StorageResult, StoreOutcome, UrlStorage};

/// Records keyed by short code plus a secondary index by original URL.
///
/// Both maps always describe the same set of records.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordIndex {
    by_short: HashMap<String, ShortenedData>,
    short_by_original: HashMap<String, String>,
}

impl RecordIndex {
    /// Inserts `record` unless its original URL or short code is taken.
    pub(crate) fn insert(&mut self, record: ShortenedData) -> StorageResult<StoreOutcome> {
        if let Some(existing) = self
            .short_by_original
            .get(&record.original_url)
            .and_then(|short| self.by_short.get(short))
        {
            return Ok(StoreOutcome::Existing(existing.clone()));
        }

        if self.by_short.contains_key(&record.short_url) {
            return Err(StorageError::ShortCodeCollision {
                short_url: record.short_url,
            });
        }

        self.short_by_original
            .insert(record.original_url.clone(), record.short_url.clone());
        self.by_short
            .insert(record.short_url.clone(), record.clone());

        Ok(StoreOutcome::Created(record))
    }

    pub(crate) fn get(&self, short_url: &str) -> StorageResult<ShortenedData> {
        self.by_short
            .get(short_url)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(short_url.to_string()))
    }

    pub(crate) fn owned_by(&self, user_id: &str) -> Vec<ShortenedData> {
        self.by_short
            .values()
            .filter(|record| record.is_owned_by(user_id))
            .cloned()
            .collect()
    }

    pub(crate) fn mark_deleted(&mut self, user_id: &str, short_url: &str) -> StorageResult<()> {
        match self.by_short.get_mut(short_url) {
            Some(record) if record.is_owned_by(user_id) => {
                record.is_deleted = true;
                Ok(())
            }
            _ => Err(StorageError::DeleteRejected {
                user_id: user_id.to_string(),
                short_url: short_url.to_string(),
            }),
        }
    }

    pub(crate) fn statistic(&self) -> Statistic {
        let users: HashSet<&str> = self
            .by_short
            .values()
            .map(|record| record.user_id.as_str())
            .collect();

        Statistic {
            urls: self.by_short.len() as i64,
            users: users.len() as i64,
        }
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = &ShortenedData> {
        self.by_short.values()
    }
}

/// Process-lifetime storage guarded by a single mutex.
///
/// The lock covers the whole check-then-insert in [`UrlStorage::store`], so
/// concurrent submissions of the same URL produce exactly one record.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    index: Mutex<RecordIndex>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlStorage for MemoryStorage {
    async fn store(&self, record: ShortenedData) -> StorageResult<StoreOutcome> {
        self.index.lock().await.insert(record)
    }

    async fn get(&self, short_url: &str) -> StorageResult<ShortenedData> {
        self.index.lock().await.get(short_url)
    }

    async fn get_batch_by_user_id(&self, user_id: &str) -> StorageResult<Vec<ShortenedData>> {
        Ok(self.index.lock().await.owned_by(user_id))
    }

    async fn delete_by_user_id_and_short(
        &self,
        user_id: &str,
        short_url: &str,
    ) -> StorageResult<()> {
        self.index.lock().await.mark_deleted(user_id, short_url)
    }

    async fn get_statistic(&self) -> StorageResult<Statistic> {
        Ok(self.index.lock().await.statistic())
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(user: &str, short: &str, url: &str) -> ShortenedData {
        ShortenedData::new(user, short, url)
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let storage = MemoryStorage::new();

        let outcome = storage
            .store(record("u1", "abc1234", "https://example.com"))
            .await
            .unwrap();
        assert!(matches!(outcome, StoreOutcome::Created(_)));

        let found = storage.get("abc1234").await.unwrap();
        assert_eq!(found.original_url, "https://example.com");
        assert!(!found.is_deleted);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let storage = MemoryStorage::new();

        let err = storage.get("missing").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(code) if code == "missing"));
    }

    #[tokio::test]
    async fn test_store_same_url_returns_existing_record() {
        let storage = MemoryStorage::new();
        let first = record("u1", "abc1234", "https://example.com");
        let first_uuid = first.uuid.clone();
        storage.store(first).await.unwrap();

        let outcome = storage
            .store(record("u2", "abc1234", "https://example.com"))
            .await
            .unwrap();

        match outcome {
            StoreOutcome::Existing(existing) => {
                assert_eq!(existing.uuid, first_uuid);
                assert_eq!(existing.user_id, "u1");
                assert_eq!(existing.short_url, "abc1234");
            }
            other => panic!("expected existing record, got {other:?}"),
        }

        assert_eq!(storage.get_statistic().await.unwrap().urls, 1);
    }

    #[tokio::test]
    async fn test_store_detects_short_code_collision() {
        let storage = MemoryStorage::new();
        storage
            .store(record("u1", "abc1234", "https://one.com"))
            .await
            .unwrap();

        let err = storage
            .store(record("u1", "abc1234", "https://two.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::ShortCodeCollision { .. }));
        assert_eq!(
            storage.get("abc1234").await.unwrap().original_url,
            "https://one.com"
        );
    }

    #[tokio::test]
    async fn test_batch_by_user() {
        let storage = MemoryStorage::new();
        storage.store(record("u1", "aaaaaaa", "https://a.com")).await.unwrap();
        storage.store(record("u1", "bbbbbbb", "https://b.com")).await.unwrap();
        storage.store(record("u2", "ccccccc", "https://c.com")).await.unwrap();

        let mut codes: Vec<String> = storage
            .get_batch_by_user_id("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.short_url)
            .collect();
        codes.sort();

        assert_eq!(codes, vec!["aaaaaaa", "bbbbbbb"]);
        assert!(storage.get_batch_by_user_id("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_can_soft_delete() {
        let storage = MemoryStorage::new();
        storage.store(record("u1", "abc1234", "https://a.com")).await.unwrap();

        storage
            .delete_by_user_id_and_short("u1", "abc1234")
            .await
            .unwrap();

        let found = storage.get("abc1234").await.unwrap();
        assert!(found.is_deleted);
        assert_eq!(found.original_url, "https://a.com");

        // Repeating the delete is still a match for the owner.
        assert!(
            storage
                .delete_by_user_id_and_short("u1", "abc1234")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_foreign_delete_is_rejected() {
        let storage = MemoryStorage::new();
        storage.store(record("victim", "abc1234", "https://a.com")).await.unwrap();

        let err = storage
            .delete_by_user_id_and_short("attacker", "abc1234")
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::DeleteRejected { .. }));
        assert!(!storage.get("abc1234").await.unwrap().is_deleted);
    }

    #[tokio::test]
    async fn test_delete_unknown_code_is_rejected() {
        let storage = MemoryStorage::new();

        let err = storage
            .delete_by_user_id_and_short("u1", "missing")
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::DeleteRejected { .. }));
    }

    #[tokio::test]
    async fn test_statistic_counts_deleted_and_distinct_users() {
        let storage = MemoryStorage::new();
        storage.store(record("u1", "aaaaaaa", "https://a.com")).await.unwrap();
        storage.store(record("u1", "bbbbbbb", "https://b.com")).await.unwrap();
        storage.store(record("u2", "ccccccc", "https://c.com")).await.unwrap();
        storage
            .delete_by_user_id_and_short("u2", "ccccccc")
            .await
            .unwrap();

        let stat = storage.get_statistic().await.unwrap();
        assert_eq!(stat, Statistic { urls: 3, users: 2 });
    }

    #[tokio::test]
    async fn test_concurrent_store_of_same_url_creates_one_record() {
        let storage = Arc::new(MemoryStorage::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .store(record(&format!("u{i}"), "abc1234", "https://race.com"))
                    .await
                    .unwrap()
            }));
        }

        let mut created = 0;
        for handle in handles {
            if !handle.await.unwrap().is_existing() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(storage.get_statistic().await.unwrap().urls, 1);
    }
}
