//! Cache store trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Failures inside a cache backend.
///
/// These never leave the backend: [`CacheStore`] methods log them and
/// degrade to a miss or a no-op.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),

    #[error("cache operation failed: {0}")]
    Operation(#[from] redis::RedisError),

    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Best-effort key → target store used to accelerate redirects.
///
/// The cache holds no authority: it can be emptied or unreachable at any time
/// and the redirect path must still be correct. For that reason every method
/// is infallible from the caller's point of view.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with availability tracking
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the cached target for `key`.
    ///
    /// `None` on a miss and also when the backend is unreachable.
    async fn get(&self, key: &str) -> Option<String>;

    /// Caches `target` for `key`, expiring after `ttl`.
    async fn put(&self, key: &str, target: &str, ttl: Duration);

    /// Increments the cache-side click counter for `key`.
    async fn increment_clicks(&self, key: &str);

    /// Drops any cached target for `key`.
    async fn invalidate(&self, key: &str);

    /// Returns true if the backend currently answers.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
