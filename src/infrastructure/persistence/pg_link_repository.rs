//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tracing::error;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection. Expiry is
/// evaluated against the application [`Clock`], bound into every query, so the
/// row and any cached copy of it are timed by the same clock that computed
/// `expires_at`. The database's `NOW()` is never consulted.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    clock: Arc<dyn Clock>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool on the system clock.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Creates a repository whose expiry checks use `clock`.
    pub fn with_clock(pool: Arc<PgPool>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Counts live and expired rows still physically present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database errors.
    pub async fn count_by_state(&self) -> Result<(i64, i64), StoreError> {
        let (live, expired): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE expires_at IS NULL OR expires_at > $1),
                COUNT(*) FILTER (WHERE expires_at <= $1)
            FROM links
            "#,
        )
        .bind(self.clock.now())
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok((live, expired))
    }
}

#[derive(FromRow)]
struct LinkRow {
    code: String,
    long_url: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(row.code, row.long_url, row.created_at, row.expires_at)
    }
}

/// Maps an SQLx error to the store taxonomy.
fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    error!(error = %e, "Database error");
    StoreError::Unavailable(e.to_string())
}

/// Like [`map_sqlx_error`], but a unique violation on `code` becomes
/// [`StoreError::DuplicateKey`].
fn map_insert_error(e: sqlx::Error, code: &str) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return StoreError::DuplicateKey(code.to_string());
    }

    map_sqlx_error(e)
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn save(&self, new_link: NewLink) -> Result<Link, StoreError> {
        // An expired row may be reclaimed in place; a live one blocks the insert,
        // in which case the conditional update matches nothing and no row returns.
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (code, long_url, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO UPDATE
                SET long_url = EXCLUDED.long_url,
                    created_at = EXCLUDED.created_at,
                    expires_at = EXCLUDED.expires_at
                WHERE links.expires_at IS NOT NULL AND links.expires_at <= $5
            RETURNING code, long_url, created_at, expires_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.long_url)
        .bind(new_link.created_at)
        .bind(new_link.expires_at)
        .bind(self.clock.now())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_insert_error(e, &new_link.code))?;

        row.map(Link::from)
            .ok_or(StoreError::DuplicateKey(new_link.code))
    }

    async fn load(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT code, long_url, created_at, expires_at
            FROM links
            WHERE code = $1 AND (expires_at IS NULL OR expires_at > $2)
            "#,
        )
        .bind(code)
        .bind(self.clock.now())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Link::from))
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM links WHERE expires_at <= $1")
            .bind(self.clock.now())
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
