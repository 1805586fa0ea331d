//! PostgreSQL implementation of visit repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewVisit, Visit};
use crate::domain::repositories::VisitRepository;
use crate::error::AppError;

/// PostgreSQL repository for the visit log.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
}

impl PgVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn record_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let mut tx = self.pool.begin().await?;

        // The UPDATE takes the row lock first, so concurrent recordings for
        // the same link serialize here and each increment is applied in place.
        let updated =
            sqlx::query("UPDATE short_links SET click_count = click_count + 1 WHERE id = $1")
                .bind(new_visit.link_id)
                .execute(&mut *tx)
                .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "link_id": new_visit.link_id }),
            ));
        }

        let visit = sqlx::query_as::<_, Visit>(
            "INSERT INTO visits (link_id, browser, os, country)
             VALUES ($1, $2, $3, $4)
             RETURNING id, link_id, visited_at, browser, os, country",
        )
        .bind(new_visit.link_id)
        .bind(&new_visit.browser)
        .bind(&new_visit.os)
        .bind(&new_visit.country)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(visit)
    }

    async fn find_by_link(&self, link_id: i64) -> Result<Vec<Visit>, AppError> {
        let visits = sqlx::query_as::<_, Visit>(
            "SELECT id, link_id, visited_at, browser, os, country
             FROM visits
             WHERE link_id = $1
             ORDER BY visited_at, id",
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(visits)
    }
}
