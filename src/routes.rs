//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{key}`        - Short link redirect
//! - `POST /shorten`      - Create a short link
//! - `GET  /stats/{key}`  - Visit statistics
//! - `GET  /health`       - Health check: database, visit queue, cache
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler, stats_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes with state applied, without path normalization.
///
/// `/health` and `/shorten` are static segments and take precedence over
/// the `/{key}` capture.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/shorten", post(shorten_handler))
        .route("/stats/{key}", get(stats_handler))
        .route("/{key}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
