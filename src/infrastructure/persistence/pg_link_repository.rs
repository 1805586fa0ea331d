//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for short link storage and retrieval.
///
/// All values are passed as bind parameters.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            "INSERT INTO short_links (key, target_url, expires_at)
             VALUES ($1, $2, $3)
             RETURNING id, key, target_url, active, click_count, created_at, expires_at",
        )
        .bind(&new_link.key)
        .bind(&new_link.target_url)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            "SELECT id, key, target_url, active, click_count, created_at, expires_at
             FROM short_links
             WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn key_exists(&self, key: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM short_links WHERE key = $1)",
        )
        .bind(key)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn set_active(&self, key: &str, active: bool) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE short_links SET active = $2 WHERE key = $1")
            .bind(key)
            .bind(active)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
