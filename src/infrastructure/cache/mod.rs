//! Caching layer for fast redirect lookups.
//!
//! Provides a [`CacheService`] trait with four implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`MemoryCache`] - In-process cache with clock-driven TTLs
//! - [`NullCache`] - No-op implementation for disabled caching
//! - [`FailingCache`] - Permanently failing backend for fault injection

mod failing_cache;
mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use failing_cache::FailingCache;
pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
