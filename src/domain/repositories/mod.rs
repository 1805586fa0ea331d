//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the durable store. Concrete PostgreSQL
//! implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link creation, lookup and activation
//! - [`VisitRepository`] - Transactional visit recording and visit scans

pub mod link_repository;
pub mod visit_repository;

pub use link_repository::LinkRepository;
pub use visit_repository::VisitRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
