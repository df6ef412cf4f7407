//! File-backed storage: an in-memory index mirrored to a newline-delimited
//! JSON file.

use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::memory_storage::RecordIndex;
use crate::domain::entities::{ShortenedData, Statistic};
use crate::domain::repositories::{StorageError, StorageResult, StoreOutcome, UrlStorage};

/// Storage that keeps every record in memory and rewrites the whole file
/// after each mutation.
///
/// # File Format
///
/// One JSON-encoded [`ShortenedData`] per line, UTF-8, no array wrapper.
///
/// # Locking
///
/// `file` serializes writers, `index` guards the records readers see. A
/// writer holds the file lock for the whole operation, applies the change to
/// a copy of the index, and swaps the copy in only after the file was
/// rewritten. A failed write therefore leaves memory and disk in agreement.
/// Readers only contend on `index`, and never across file I/O.
///
/// Lock order is always `file` then `index`.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    index: Mutex<RecordIndex>,
    file: Mutex<()>,
}

impl FileStorage {
    /// Opens the storage file, creating an empty one if it does not exist,
    /// and replays every line into memory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] on the first line that is not a valid
    /// record and [`StorageError::Io`] if the file cannot be read or created.
    /// Nothing is partially loaded.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let index = load_index(&path).await?;

        info!(
            path = %path.display(),
            records = index.records().count(),
            "File storage loaded"
        );

        Ok(Self {
            path,
            index: Mutex::new(index),
            file: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the index, writes the copy to disk and
    /// only then publishes it. Nothing is written or published when `change`
    /// fails or asks to skip the write by returning `false` alongside its
    /// result.
    async fn commit<T>(
        &self,
        change: impl FnOnce(&mut RecordIndex) -> StorageResult<(T, bool)>,
    ) -> StorageResult<T> {
        let _file = self.file.lock().await;
        let mut next = self.index.lock().await.clone();

        let (result, dirty) = change(&mut next)?;
        if !dirty {
            return Ok(result);
        }

        let snapshot = encode_records(&next)?;
        write_atomically(&self.path, &snapshot).await?;
        debug!(path = %self.path.display(), bytes = snapshot.len(), "Storage file rewritten");

        *self.index.lock().await = next;
        Ok(result)
    }
}

#[async_trait]
impl UrlStorage for FileStorage {
    async fn store(&self, record: ShortenedData) -> StorageResult<StoreOutcome> {
        self.commit(|index| {
            let outcome = index.insert(record)?;
            let dirty = !outcome.is_existing();
            Ok((outcome, dirty))
        })
        .await
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
        self.commit(|index| Ok((index.mark_deleted(user_id, short_url)?, true)))
            .await
    }

    async fn get_statistic(&self) -> StorageResult<Statistic> {
        Ok(self.index.lock().await.statistic())
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        self.commit(|_| Ok(((), true))).await
    }
}

async fn load_index(path: &Path) -> StorageResult<RecordIndex> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tokio::fs::File::create(path).await?;
            String::new()
        }
        Err(e) => return Err(e.into()),
    };

    let mut index = RecordIndex::default();
    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let record: ShortenedData =
            serde_json::from_str(line).map_err(|source| StorageError::Corrupt {
                line: number + 1,
                source,
            })?;
        index.insert(record)?;
    }

    Ok(index)
}

fn encode_records(index: &RecordIndex) -> StorageResult<Vec<u8>> {
    let mut records: Vec<&ShortenedData> = index.records().collect();
    records.sort_by(|a, b| a.short_url.cmp(&b.short_url));

    let mut buffer = Vec::new();
    for record in records {
        serde_json::to_writer(&mut buffer, record)?;
        buffer.push(b'\n');
    }

    Ok(buffer)
}

/// Writes `bytes` to a sibling temp file and renames it over `path`, so a
/// crash mid-write leaves the previous content in place.
async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut file = tokio::fs::File::create(&tmp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, path).await
}
