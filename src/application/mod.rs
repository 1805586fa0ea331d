//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits and expose the operations
//! HTTP handlers and the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and activation
//! - [`services::resolution_service::ResolutionService`] - Cache-first redirect resolution
//! - [`services::visit_recorder::VisitRecorder`] - Visit persistence for the background worker
//! - [`services::stats_service::StatsService`] - Per-link visit aggregation

pub mod services;
