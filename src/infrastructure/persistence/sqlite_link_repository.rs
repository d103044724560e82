//! SQLite implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{CreateOutcome, LinkRepository};
use crate::error::AppError;
use crate::utils::db_error::{UniqueViolation, unique_violation};

/// Columns selected for every [`Link`] read.
const LINK_COLUMNS: &str = "id, short_code, original_url, click_count, created_at, updated_at";

/// Store-side timestamp with millisecond precision, identical in format to
/// the column defaults so that text ordering matches time ordering.
const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    short_code: String,
    original_url: String,
    click_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.short_code,
            r.original_url,
            r.click_count,
            r.created_at,
            r.updated_at,
        )
    }
}

/// SQLite repository for link storage and retrieval.
///
/// Every method is a single statement on a pooled connection; uniqueness and
/// counter atomicity are enforced by the store itself.
pub struct SqliteLinkRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<CreateOutcome, AppError> {
        let sql = format!(
            "INSERT INTO links (short_code, original_url) VALUES (?1, ?2) RETURNING {LINK_COLUMNS}"
        );

        let result = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.short_code)
            .bind(&new_link.original_url)
            .fetch_one(self.pool.as_ref())
            .await;

        match result {
            Ok(row) => Ok(CreateOutcome::Created(row.into())),
            Err(e) => match unique_violation(&e) {
                Some(UniqueViolation::ShortCode) => Ok(CreateOutcome::CodeTaken),
                Some(UniqueViolation::OriginalUrl) => Ok(CreateOutcome::UrlTaken),
                None => Err(e.into()),
            },
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE short_code = ?1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE original_url = ?1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(original_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links ORDER BY created_at DESC, id DESC");

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE short_code = ?1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_click(&self, code: &str) -> Result<Option<String>, AppError> {
        let sql = format!(
            "UPDATE links SET click_count = click_count + 1, updated_at = {NOW} \
             WHERE short_code = ?1 RETURNING original_url"
        );

        let destination = sqlx::query_scalar::<_, String>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(destination)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
