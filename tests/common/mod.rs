#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

use link_resolver::AppError;
use link_resolver::application::services::VisitRecorder;
use link_resolver::domain::entities::{NewShortLink, NewVisit, ShortLink, Visit};
use link_resolver::domain::repositories::{LinkRepository, VisitRepository};
use link_resolver::domain::visit_event::{VisitEvent, VisitQueue};
use link_resolver::domain::visit_worker::run_visit_worker;
use link_resolver::infrastructure::cache::CacheStore;
use link_resolver::routes::router;
use link_resolver::state::{AppState, StateSettings};

pub const BASE_URL: &str = "http://sho.rt";

/// In-memory stand-in for PostgreSQL implementing both repositories.
///
/// Counts lookups so tests can prove a redirect was served from cache.
#[derive(Default)]
pub struct InMemoryStore {
    links: Mutex<HashMap<String, ShortLink>>,
    visits: Mutex<Vec<Visit>>,
    next_id: AtomicI64,
    pub find_calls: AtomicUsize,
    pub offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(
        &self,
        key: &str,
        target_url: &str,
        active: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> ShortLink {
        let link = ShortLink {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            key: key.to_string(),
            target_url: target_url.to_string(),
            active,
            click_count: 0,
            created_at: Utc::now(),
            expires_at,
        };
        self.links
            .lock()
            .unwrap()
            .insert(key.to_string(), link.clone());
        link
    }

    pub fn link(&self, key: &str) -> Option<ShortLink> {
        self.links.lock().unwrap().get(key).cloned()
    }

    pub fn visit_count(&self) -> usize {
        self.visits.lock().unwrap().len()
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AppError::internal("Database error", json!({})))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        self.check_online()?;
        if self.links.lock().unwrap().contains_key(&new_link.key) {
            return Err(AppError::conflict("Unique constraint violation", json!({})));
        }
        Ok(self.insert(
            &new_link.key,
            &new_link.target_url,
            true,
            new_link.expires_at,
        ))
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<ShortLink>, AppError> {
        self.check_online()?;
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.link(key))
    }

    async fn key_exists(&self, key: &str) -> Result<bool, AppError> {
        self.check_online()?;
        Ok(self.links.lock().unwrap().contains_key(key))
    }

    async fn set_active(&self, key: &str, active: bool) -> Result<bool, AppError> {
        self.check_online()?;
        match self.links.lock().unwrap().get_mut(key) {
            Some(link) => {
                link.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_online()
    }
}

#[async_trait]
impl VisitRepository for InMemoryStore {
    async fn record_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        self.check_online()?;

        let mut links = self.links.lock().unwrap();
        let link = links
            .values_mut()
            .find(|l| l.id == new_visit.link_id)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({})))?;
        link.click_count += 1;

        let mut visits = self.visits.lock().unwrap();
        let visit = Visit {
            id: visits.len() as i64 + 1,
            link_id: new_visit.link_id,
            visited_at: Utc::now(),
            browser: new_visit.browser,
            os: new_visit.os,
            country: new_visit.country,
        };
        visits.push(visit.clone());
        Ok(visit)
    }

    async fn find_by_link(&self, link_id: i64) -> Result<Vec<Visit>, AppError> {
        self.check_online()?;
        Ok(self
            .visits
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.link_id == link_id)
            .cloned()
            .collect())
    }
}

/// In-memory cache that can be switched off to simulate an outage.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
    clicks: Mutex<HashMap<String, i64>>,
    pub down: AtomicBool,
}

impl InMemoryCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn cached(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn clicks(&self, key: &str) -> i64 {
        self.clicks.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    fn is_down(&self) -> bool {
        self.down.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        if self.is_down() {
            return None;
        }
        self.cached(key)
    }

    async fn put(&self, key: &str, target: &str, _ttl: Duration) {
        if !self.is_down() {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), target.to_string());
        }
    }

    async fn increment_clicks(&self, key: &str) {
        if !self.is_down() {
            *self.clicks.lock().unwrap().entry(key.to_string()).or_default() += 1;
        }
    }

    async fn invalidate(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    async fn health_check(&self) -> bool {
        !self.is_down()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Injects a fixed peer address, as the real server does via `ConnectInfo`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn test_settings() -> StateSettings {
    StateSettings {
        base_url: BASE_URL.to_string(),
        ..StateSettings::default()
    }
}

pub fn create_test_state(
    store: Arc<InMemoryStore>,
    cache: Arc<InMemoryCache>,
) -> (AppState, mpsc::Receiver<VisitEvent>) {
    let (queue, rx) = VisitQueue::channel(100);
    let state = AppState::new(store.clone(), store, cache, queue, test_settings());
    (state, rx)
}

pub fn test_router(state: AppState) -> Router {
    router(state).layer(MockConnectInfoLayer)
}

/// Full stack: router, in-memory store and cache, and a running visit worker.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub cache: Arc<InMemoryCache>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let store = InMemoryStore::new();
        let cache = InMemoryCache::new();
        let (state, rx) = create_test_state(store.clone(), cache.clone());

        let recorder = Arc::new(VisitRecorder::new(store.clone(), store.clone()));
        tokio::spawn(run_visit_worker(rx, recorder, 2));

        let server = TestServer::new(test_router(state)).unwrap();

        Self {
            server,
            store,
            cache,
        }
    }

    /// Polls until `count` visits are stored or two seconds pass.
    pub async fn wait_for_visits(&self, count: usize) {
        for _ in 0..200 {
            if self.store.visit_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} visits, found {}",
            count,
            self.store.visit_count()
        );
    }
}
