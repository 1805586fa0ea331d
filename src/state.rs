//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{LinkService, ResolutionService, StatsService};
use crate::domain::repositories::{LinkRepository, VisitRepository};
use crate::domain::visit_event::VisitQueue;
use crate::infrastructure::cache::CacheStore;

/// Link-level tunables applied when the state is built.
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub base_url: String,
    pub behind_proxy: bool,
    pub cache_ttl: Duration,
    pub key_length: usize,
    pub key_max_attempts: usize,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            behind_proxy: false,
            cache_ttl: Duration::from_secs(3600),
            key_length: crate::utils::key_generator::DEFAULT_KEY_LENGTH,
            key_max_attempts: crate::application::services::link_service::DEFAULT_MAX_KEY_ATTEMPTS,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub resolution_service: Arc<ResolutionService<dyn LinkRepository>>,
    pub stats_service: Arc<StatsService<dyn LinkRepository, dyn VisitRepository>>,
    pub link_repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheStore>,
    pub visit_queue: VisitQueue,
    pub base_url: String,
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires services over the given store, cache and visit queue.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        visit_repository: Arc<dyn VisitRepository>,
        cache: Arc<dyn CacheStore>,
        visit_queue: VisitQueue,
        settings: StateSettings,
    ) -> Self {
        let link_service = LinkService::new(link_repository.clone(), cache.clone())
            .with_key_length(settings.key_length)
            .with_max_key_attempts(settings.key_max_attempts);

        let resolution_service =
            ResolutionService::new(link_repository.clone(), cache.clone(), visit_queue.clone())
                .with_cache_ttl(settings.cache_ttl);

        let stats_service = StatsService::new(link_repository.clone(), visit_repository);

        Self {
            link_service: Arc::new(link_service),
            resolution_service: Arc::new(resolution_service),
            stats_service: Arc::new(stats_service),
            link_repository,
            cache,
            visit_queue,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            behind_proxy: settings.behind_proxy,
        }
    }

    /// Public URL that redirects to the link with `key`.
    pub fn short_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Public URL of the statistics endpoint for `key`.
    pub fn admin_url(&self, key: &str) -> String {
        format!("{}/stats/{}", self.base_url, key)
    }
}
