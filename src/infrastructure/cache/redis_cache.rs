//! Redis-backed cache implementation.

use super::service::{CacheError, CacheStore};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Tuning knobs for [`RedisCache`].
#[derive(Debug, Clone, Copy)]
pub struct RedisCacheSettings {
    /// Upper bound for connecting and for every individual command.
    pub operation_timeout: Duration,
    /// Minimum delay between reconnect attempts while unavailable.
    pub reconnect_interval: Duration,
}

impl Default for RedisCacheSettings {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_secs(2),
            reconnect_interval: Duration::from_secs(30),
        }
    }
}

/// Redis cache with fail-open semantics and availability tracking.
///
/// Any failed or timed-out command flips the cache to *unavailable*. While
/// unavailable every call returns immediately (miss / no-op) instead of
/// paying the timeout again. At most once per `reconnect_interval` a caller
/// probes the server with a PING; success makes the cache available again.
pub struct RedisCache {
    client: Client,
    manager: RwLock<Option<ConnectionManager>>,
    available: AtomicBool,
    last_probe: Mutex<Option<Instant>>,
    settings: RedisCacheSettings,
    target_prefix: &'static str,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid or the
    /// server does not answer within the operation timeout.
    pub async fn connect(redis_url: &str, settings: RedisCacheSettings) -> Result<Self, CacheError> {
        info!("Connecting to Redis at {}", redis_url);

        let cache = Self::disconnected(redis_url, settings)?;
        let manager = cache.open_manager().await?;

        cache.store_manager(manager);
        cache.available.store(true, Ordering::Release);

        info!("✓ Connected to Redis");
        Ok(cache)
    }

    /// Builds a cache that starts out unavailable and connects lazily on the
    /// first probe after `reconnect_interval`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL cannot be parsed.
    pub fn disconnected(redis_url: &str, settings: RedisCacheSettings) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Invalid Redis URL: {}", e)))?;

        Ok(Self {
            client,
            manager: RwLock::new(None),
            available: AtomicBool::new(false),
            last_probe: Mutex::new(Some(Instant::now())),
            settings,
            target_prefix: "url:",
        })
    }

    /// Returns true while commands are being sent to Redis.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    fn target_key(&self, key: &str) -> String {
        format!("{}{}", self.target_prefix, key)
    }

    fn clicks_key(key: &str) -> String {
        format!("stats:{}:clicks", key)
    }

    async fn open_manager(&self) -> Result<ConnectionManager, CacheError> {
        let limit = self.settings.operation_timeout;

        let mut manager = timeout(limit, ConnectionManager::new(self.client.clone()))
            .await
            .map_err(|_| CacheError::Timeout(limit))?
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        timeout(limit, manager.ping::<()>())
            .await
            .map_err(|_| CacheError::Timeout(limit))?
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        Ok(manager)
    }

    fn current_manager(&self) -> Option<ConnectionManager> {
        match self.manager.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store_manager(&self, manager: ConnectionManager) {
        match self.manager.write() {
            Ok(mut guard) => *guard = Some(manager),
            Err(poisoned) => *poisoned.into_inner() = Some(manager),
        }
    }

    /// Claims the next reconnect probe if the interval has elapsed.
    fn probe_due(&self) -> bool {
        let mut last = match self.last_probe.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let due = last.is_none_or(|at| at.elapsed() >= self.settings.reconnect_interval);
        if due {
            *last = Some(Instant::now());
        }
        due
    }

    async fn try_reconnect(&self) -> Option<ConnectionManager> {
        match self.open_manager().await {
            Ok(manager) => {
                self.store_manager(manager.clone());
                self.available.store(true, Ordering::Release);
                info!("Redis reachable again, cache re-enabled");
                Some(manager)
            }
            Err(e) => {
                debug!("Redis still unavailable: {}", e);
                None
            }
        }
    }

    async fn connection(&self) -> Option<ConnectionManager> {
        if self.is_available() {
            return self.current_manager();
        }

        if !self.probe_due() {
            return None;
        }

        self.try_reconnect().await
    }

    fn mark_unavailable(&self, op: &str, key: &str, err: CacheError) {
        if let Ok(mut last) = self.last_probe.lock() {
            *last = Some(Instant::now());
        }

        if self.available.swap(false, Ordering::AcqRel) {
            warn!(
                "Redis {} failed for {}: {}. Bypassing cache until reconnect",
                op, key, err
            );
        } else {
            debug!("Redis {} failed for {}: {}", op, key, err);
        }
    }

    /// Runs one command against Redis with the operation timeout applied.
    async fn run<T, F, Fut>(&self, op: &'static str, key: &str, command: F) -> Option<T>
    where
        F: FnOnce(ConnectionManager) -> Fut + Send,
        Fut: Future<Output = RedisResult<T>> + Send,
        T: Send,
    {
        let conn = self.connection().await?;
        let limit = self.settings.operation_timeout;

        match timeout(limit, command(conn)).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                self.mark_unavailable(op, key, CacheError::Operation(e));
                None
            }
            Err(_) => {
                self.mark_unavailable(op, key, CacheError::Timeout(limit));
                None
            }
        }
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let redis_key = self.target_key(key);

        let found = self
            .run("GET", key, move |mut conn| async move {
                conn.get::<_, Option<String>>(redis_key).await
            })
            .await
            .flatten();

        match &found {
            Some(target) => debug!("Cache HIT: {} -> {}", key, target),
            None => debug!("Cache MISS: {}", key),
        }

        found
    }

    async fn put(&self, key: &str, target: &str, ttl: Duration) {
        let ttl_seconds = ttl.as_secs();
        if ttl_seconds == 0 {
            return;
        }

        let redis_key = self.target_key(key);
        let value = target.to_string();

        if self
            .run("SET", key, move |mut conn| async move {
                conn.set_ex::<_, _, ()>(redis_key, value, ttl_seconds).await
            })
            .await
            .is_some()
        {
            debug!("Cache SET: {} -> {} (TTL: {}s)", key, target, ttl_seconds);
        }
    }

    async fn increment_clicks(&self, key: &str) {
        let redis_key = Self::clicks_key(key);

        self.run("INCR", key, move |mut conn| async move {
            conn.incr::<_, _, i64>(redis_key, 1).await
        })
        .await;
    }

    async fn invalidate(&self, key: &str) {
        let redis_key = self.target_key(key);

        if let Some(deleted) = self
            .run("DEL", key, move |mut conn| async move {
                conn.del::<_, i64>(redis_key).await
            })
            .await
            && deleted > 0
        {
            debug!("Cache INVALIDATE: {}", key);
        }
    }

    async fn health_check(&self) -> bool {
        self.run("PING", "-", |mut conn| async move { conn.ping::<()>().await })
            .await
            .is_some()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
