//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits on top of a
//! shared SQLx connection pool.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Short link storage and retrieval
//! - [`PgVisitRepository`] - Transactional visit recording and visit scans

pub mod pg_link_repository;
pub mod pg_visit_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_visit_repository::PgVisitRepository;
