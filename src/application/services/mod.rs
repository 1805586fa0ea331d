//! Business logic services for the application layer.

pub mod link_service;
pub mod resolution_service;
pub mod stats_service;
pub mod visit_recorder;

pub use link_service::LinkService;
pub use resolution_service::{ResolutionService, VisitContext};
pub use stats_service::{LinkStats, StatsService};
pub use visit_recorder::VisitRecorder;
