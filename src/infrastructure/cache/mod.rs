//! Caching layer for fast redirect lookups.
//!
//! Provides a [`CacheStore`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - No-op implementation when caching is disabled

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::{RedisCache, RedisCacheSettings};
pub use service::{CacheError, CacheStore};
