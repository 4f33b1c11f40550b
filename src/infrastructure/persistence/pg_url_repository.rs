//! PostgreSQL implementation of the URL repository.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::error::StoreError;
use crate::domain::repositories::UrlRepository;
use crate::utils::db_error::is_unique_violation_on_code;

#[derive(Debug, FromRow)]
struct UrlRow {
    id: i64,
    url: String,
    short_url: String,
    expire_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord::new(row.id, row.url, row.expire_at, row.short_url)
    }
}

/// Live and expired record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordCounts {
    pub live: i64,
    pub expired: i64,
}

/// PostgreSQL repository backed by the `urls` table.
///
/// Short code uniqueness is enforced by the `urls_short_url_key` constraint,
/// so a concurrent insert of the same code fails atomically. Every query is
/// bounded by `query_timeout`.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
    query_timeout: Duration,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout),
        }
    }

    /// Counts records on either side of the current time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on database errors or timeout.
    pub async fn count_records(&self) -> Result<RecordCounts, StoreError> {
        let (live, expired) = self
            .bounded(
                sqlx::query_as::<_, (i64, i64)>(
                    r#"
                SELECT
                    COUNT(*) FILTER (WHERE expire_at > NOW()),
                    COUNT(*) FILTER (WHERE expire_at <= NOW())
                FROM urls
                "#,
                )
                .fetch_one(self.pool.as_ref()),
            )
            .await?;

        Ok(RecordCounts { live, expired })
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, UrlRow>(
                    r#"
                SELECT id, url, short_url, expire_at
                FROM urls
                WHERE short_url = $1
                "#,
                )
                .bind(code)
                .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let result = tokio::time::timeout(
            self.query_timeout,
            sqlx::query_scalar::<_, i64>(
                r#"
            INSERT INTO urls (url, short_url, expire_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
            )
            .bind(&new_record.original_url)
            .bind(&new_record.short_code)
            .bind(new_record.expire_at)
            .fetch_one(self.pool.as_ref()),
        )
        .await
        .map_err(|_| StoreError::Timeout)?;

        match result {
            Ok(id) => Ok(new_record.with_id(id)),
            Err(e) if is_unique_violation_on_code(&e) => Err(StoreError::DuplicateKey {
                code: new_record.short_code,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, record: &UrlRecord) -> Result<(), StoreError> {
        let result = self
            .bounded(
                sqlx::query(
                    r#"
                UPDATE urls
                SET url = $1, short_url = $2, expire_at = $3
                WHERE id = $4
                "#,
                )
                .bind(&record.original_url)
                .bind(&record.short_code)
                .bind(record.expire_at)
                .bind(record.id)
                .execute(self.pool.as_ref()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::MissingRecord { id: record.id });
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.bounded(sqlx::query("SELECT 1").execute(self.pool.as_ref()))
            .await
            .is_ok()
    }
}
