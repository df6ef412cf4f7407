//! PostgreSQL storage backend.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::entities::{ShortenedData, Statistic};
use crate::domain::repositories::{StorageError, StorageResult, StoreOutcome, UrlStorage};

/// Connection pool settings for [`PgStorage::connect`].
#[derive(Debug, Clone)]
pub struct PgSettings {
    pub dsn: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

/// Row shape of the `shortener` table, minus the unused surrogate `id`.
#[derive(Debug, sqlx::FromRow)]
struct ShortenerRow {
    uuid: String,
    user_id: String,
    short_url: String,
    original_url: String,
    is_deleted: bool,
}

impl From<ShortenerRow> for ShortenedData {
    fn from(row: ShortenerRow) -> Self {
        Self {
            uuid: row.uuid,
            user_id: row.user_id,
            short_url: row.short_url,
            original_url: row.original_url,
            is_deleted: row.is_deleted,
        }
    }
}

/// Single-table PostgreSQL storage.
///
/// Every operation is one auto-committed statement. Duplicate URLs are
/// arbitrated by the unique index on `original_url`, not by application
/// locks: `INSERT .. ON CONFLICT (original_url) DO NOTHING` either inserts
/// or affects zero rows, and only then is the existing row read back.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Wraps an existing pool. The schema must already exist.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and applies the schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the database is unreachable and
    /// [`StorageError::Migrate`] if the schema cannot be created.
    pub async fn connect(settings: &PgSettings) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.connect_timeout)
            .connect(&settings.dsn)
            .await?;
        info!("Connected to database");

        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Creates the `shortener` table and its indexes if they are missing.
    pub async fn init_schema(&self) -> StorageResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("Database schema is up to date");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn find_by_original_url(&self, original_url: &str) -> StorageResult<ShortenedData> {
        let row = sqlx::query_as::<_, ShortenerRow>(
            r#"
            SELECT uuid, user_id, short_url, original_url, is_deleted
            FROM shortener
            WHERE original_url = $1
            "#,
        )
        .bind(original_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

#[async_trait]
impl UrlStorage for PgStorage {
    async fn store(&self, record: ShortenedData) -> StorageResult<StoreOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO shortener (uuid, user_id, short_url, original_url, is_deleted)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (original_url) DO NOTHING
            "#,
        )
        .bind(&record.uuid)
        .bind(&record.user_id)
        .bind(&record.short_url)
        .bind(&record.original_url)
        .bind(record.is_deleted)
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            // The only other unique constraint is on short_url.
            Err(e) if is_unique_violation(&e) => {
                return Err(StorageError::ShortCodeCollision {
                    short_url: record.short_url,
                });
            }
            Err(e) => return Err(e.into()),
        };

        if result.rows_affected() == 0 {
            let existing = self.find_by_original_url(&record.original_url).await?;
            return Ok(StoreOutcome::Existing(existing));
        }

        Ok(StoreOutcome::Created(record))
    }

    async fn get(&self, short_url: &str) -> StorageResult<ShortenedData> {
        let row = sqlx::query_as::<_, ShortenerRow>(
            r#"
            SELECT uuid, user_id, short_url, original_url, is_deleted
            FROM shortener
            WHERE short_url = $1
            "#,
        )
        .bind(short_url)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into)
            .ok_or_else(|| StorageError::NotFound(short_url.to_string()))
    }

    async fn get_batch_by_user_id(&self, user_id: &str) -> StorageResult<Vec<ShortenedData>> {
        let rows = sqlx::query_as::<_, ShortenerRow>(
            r#"
            SELECT uuid, user_id, short_url, original_url, is_deleted
            FROM shortener
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_by_user_id_and_short(
        &self,
        user_id: &str,
        short_url: &str,
    ) -> StorageResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE shortener
            SET is_deleted = TRUE
            WHERE user_id = $1 AND short_url = $2
            "#,
        )
        .bind(user_id)
        .bind(short_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::DeleteRejected {
                user_id: user_id.to_string(),
                short_url: short_url.to_string(),
            });
        }

        Ok(())
    }

    async fn get_statistic(&self) -> StorageResult<Statistic> {
        let (users, urls): (i64, i64) =
            sqlx::query_as("SELECT COUNT(DISTINCT user_id), COUNT(*) FROM shortener")
                .fetch_one(&self.pool)
                .await?;

        Ok(Statistic { urls, users })
    }

    async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        self.pool.close().await;
        Ok(())
    }
}
