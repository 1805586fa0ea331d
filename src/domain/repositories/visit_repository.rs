//! Repository trait for visit analytics.

use crate::domain::entities::{NewVisit, Visit};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the append-only visit log.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgVisitRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Appends a visit and increments the link's `click_count` by one.
    ///
    /// Both writes happen in a single transaction: either the visit exists and
    /// the counter moved, or neither happened. The increment is done in place
    /// by the store so concurrent recordings never lose updates.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the referenced link no longer exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError>;

    /// Returns every visit recorded for a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_link(&self, link_id: i64) -> Result<Vec<Visit>, AppError>;
}
