//! Redirect resolution: cache-first lookup with store fallback.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::{VisitEvent, VisitQueue};
use crate::error::AppError;
use crate::infrastructure::cache::CacheStore;
use crate::utils::key_generator::is_well_formed;

/// Default lifetime of a cached key → target mapping.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Client metadata attached to a redirect for analytics.
#[derive(Debug, Clone, Default)]
pub struct VisitContext {
    pub user_agent: Option<String>,
    pub ip: Option<IpAddr>,
}

/// Resolves short keys to their targets.
///
/// # Flow
///
/// 1. **Cache lookup** - a hit returns immediately; the visit and the cache
///    click counter are scheduled in the background and the store is not touched.
/// 2. **Store lookup** - missing or inactive keys are `NotFound` (the two are
///    indistinguishable); active links past `expires_at` are `Gone`.
/// 3. **Repopulate** - the target is cached with a TTL that never outlives
///    the link's expiry. Failures are absorbed by the cache.
/// 4. **Respond** - the visit is queued and the target returned without
///    waiting for recording.
///
/// Cache unavailability never fails a resolution; the store stays the source
/// of truth for existence, activity and expiration.
pub struct ResolutionService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheStore>,
    visits: VisitQueue,
    cache_ttl: Duration,
}

impl<L: LinkRepository + ?Sized> ResolutionService<L> {
    pub fn new(link_repository: Arc<L>, cache: Arc<dyn CacheStore>, visits: VisitQueue) -> Self {
        Self {
            link_repository,
            cache,
            visits,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Overrides the TTL used when repopulating the cache.
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// Visit queue used by this service, exposed for health reporting.
    pub fn visit_queue(&self) -> &VisitQueue {
        &self.visits
    }

    /// Resolves `key` to its target URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key is unknown or inactive.
    /// Returns [`AppError::Gone`] if the link has expired.
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    pub async fn resolve(&self, key: &str, context: VisitContext) -> Result<String, AppError> {
        // Malformed keys can never exist; skip both cache and store.
        if !is_well_formed(key) {
            metrics::counter!("redirects_total", "result" => "not_found").increment(1);
            return Err(not_found(key));
        }

        if let Some(target) = self.cache.get(key).await {
            metrics::counter!("cache_lookups_total", "result" => "hit").increment(1);
            debug!("Resolved {} from cache", key);

            self.schedule_visit(key, context);
            self.schedule_cache_click(key);

            metrics::counter!("redirects_total", "result" => "ok").increment(1);
            return Ok(target);
        }
        metrics::counter!("cache_lookups_total", "result" => "miss").increment(1);

        let link = match self.lookup_in_store(key).await {
            Ok(link) => link,
            Err(e) => {
                let result = match e {
                    AppError::Gone { .. } => "gone",
                    AppError::NotFound { .. } => "not_found",
                    _ => "error",
                };
                metrics::counter!("redirects_total", "result" => result).increment(1);
                return Err(e);
            }
        };

        if let Some(ttl) = self.cache_ttl_for(&link) {
            self.cache.put(key, &link.target_url, ttl).await;
        }

        self.schedule_visit(key, context);

        metrics::counter!("redirects_total", "result" => "ok").increment(1);
        Ok(link.target_url)
    }

    /// Loads `key` from the store and validates activity and expiry.
    async fn lookup_in_store(&self, key: &str) -> Result<ShortLink, AppError> {
        let link = self
            .link_repository
            .find_by_key(key)
            .await?
            .filter(|link| link.active)
            .ok_or_else(|| not_found(key))?;

        if link.is_expired_at(Utc::now()) {
            debug!("Short link {} expired at {:?}", key, link.expires_at);
            return Err(AppError::gone(
                "Short link has expired",
                json!({ "key": key }),
            ));
        }

        Ok(link)
    }

    /// TTL for the cached mapping, clamped so it expires no later than the link.
    ///
    /// Returns `None` when the link expires within the next second.
    fn cache_ttl_for(&self, link: &ShortLink) -> Option<Duration> {
        let ttl = match link.seconds_until_expiry(Utc::now()) {
            Some(remaining) => self.cache_ttl.min(Duration::from_secs(remaining)),
            None => self.cache_ttl,
        };

        (ttl.as_secs() > 0).then_some(ttl)
    }

    fn schedule_visit(&self, key: &str, context: VisitContext) {
        self.visits.dispatch(VisitEvent::new(
            key,
            context.user_agent.as_deref(),
            context.ip,
        ));
    }

    fn schedule_cache_click(&self, key: &str) {
        let cache = self.cache.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            cache.increment_clicks(&key).await;
        });
    }
}

/// Identical error for missing and inactive keys.
fn not_found(key: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "key": key }))
}
