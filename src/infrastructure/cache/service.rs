//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// The link service treats every variant as "cache unavailable": reads fall
/// back to the durable store and writes are logged and dropped.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching short URL mappings.
///
/// The cache is a best-effort projection of `code -> long_url`. It is never the
/// source of truth and may be empty, evicted, or down without affecting
/// correctness. Implementations must be thread-safe and must not return an
/// entry after its TTL has elapsed.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache driven by a [`crate::domain::clock::Clock`]
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
/// - [`crate::infrastructure::cache::FailingCache`] - Always fails, for fault injection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the original URL for a short code from cache.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend is unreachable or the command fails.
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a URL mapping in cache with the given TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend is unreachable or the command fails.
    async fn set_url(&self, short_code: &str, original_url: &str, ttl: Duration)
    -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;

    /// Human-readable backend name for health reports and logs.
    fn backend(&self) -> &'static str;
}
