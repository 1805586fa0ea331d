//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::application::services::VisitRecorder;
use crate::config::Config;
use crate::domain::repositories::{LinkRepository, VisitRepository};
use crate::domain::visit_event::VisitQueue;
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::cache::{CacheStore, NullCache, RedisCache};
use crate::infrastructure::geo::{GeoLookup, MaxMindGeoLookup};
use crate::infrastructure::persistence::{PgLinkRepository, PgVisitRepository};
use crate::routes::app_router;
use crate::state::{AppState, StateSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis cache (or NullCache fallback)
/// - Optional GeoIP database
/// - Background visit worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the visit queue is closed and the worker drains queued
/// visits before this function returns.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache = connect_cache(&config).await;

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
    let visit_repository: Arc<dyn VisitRepository> = Arc::new(PgVisitRepository::new(pool));

    let mut recorder = VisitRecorder::new(link_repository.clone(), visit_repository.clone());
    if let Some(geo) = open_geo(&config) {
        recorder = recorder.with_geo(geo);
    }

    let (visit_queue, visit_rx) = VisitQueue::channel(config.visit_queue_capacity);
    let worker = tokio::spawn(run_visit_worker(
        visit_rx,
        Arc::new(recorder),
        config.visit_worker_concurrency,
    ));
    tracing::info!(
        "Visit worker started (concurrency: {})",
        config.visit_worker_concurrency
    );

    let state = AppState::new(
        link_repository,
        visit_repository,
        cache,
        visit_queue,
        StateSettings {
            base_url: config.base_url.clone(),
            behind_proxy: config.behind_proxy,
            cache_ttl: config.cache_ttl(),
            key_length: config.key_length,
            key_max_attempts: config.key_max_attempts,
        },
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and every visit sender it held) is gone; wait for the backlog.
    tracing::info!("Draining visit queue");
    if let Err(e) = worker.await {
        tracing::error!("Visit worker terminated abnormally: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Picks the cache backend.
///
/// An unreachable Redis at startup does not prevent the service from
/// starting: the cache begins unavailable and reconnects on its own.
async fn connect_cache(config: &Config) -> Arc<dyn CacheStore> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    let settings = config.redis_settings();

    match RedisCache::connect(redis_url, settings).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => match RedisCache::disconnected(redis_url, settings) {
            Ok(redis) => {
                tracing::warn!(
                    "Redis unreachable at startup: {}. Serving from database, retrying every {}s",
                    e,
                    settings.reconnect_interval.as_secs()
                );
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Invalid Redis configuration: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        },
    }
}

fn open_geo(config: &Config) -> Option<Arc<dyn GeoLookup>> {
    let path = config.geoip_database_path.as_deref()?;

    match MaxMindGeoLookup::open(path) {
        Ok(geo) => {
            tracing::info!("GeoIP enabled ({}: {})", geo.name(), path);
            Some(Arc::new(geo))
        }
        Err(e) => {
            tracing::warn!("Failed to open GeoIP database {}: {}. Countries will be Unknown", path, e);
            None
        }
    }
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
