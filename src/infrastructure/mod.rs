//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence, caching and geolocation.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`geo`] - Optional IP → country lookup
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod geo;
pub mod persistence;
