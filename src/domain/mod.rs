//! Domain layer containing business entities and the visit pipeline.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`visit_event`] - Visit event model and the bounded queue that carries it
//! - [`visit_worker`] - Background worker draining the visit queue
//!
//! # Visit Processing Flow
//!
//! 1. The resolution engine serves a redirect
//! 2. A [`visit_event::VisitEvent`] is pushed to the queue without waiting
//! 3. [`visit_worker::run_visit_worker`] hands each event to the
//!    [`crate::application::services::VisitRecorder`]
//! 4. The visit and the click counter increment are persisted in one transaction

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
