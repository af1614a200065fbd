//! Cache that fails every operation, for fault-injection tests and drills.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use std::time::Duration;

/// A cache whose backend is permanently down.
///
/// Every `get_url` and `set_url` returns [`CacheError::ConnectionError`] and the
/// health check reports unhealthy. Reads through the link service must still
/// succeed via the durable store.
pub struct FailingCache {
    reason: String,
}

impl FailingCache {
    /// Creates a failing cache that reports `reason` on every call.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for FailingCache {
    fn default() -> Self {
        Self::new("cache unavailable")
    }
}

#[async_trait]
impl CacheService for FailingCache {
    async fn get_url(&self, _short_code: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError(self.reason.clone()))
    }

    async fn set_url(
        &self,
        _short_code: &str,
        _original_url: &str,
        _ttl: Duration,
    ) -> CacheResult<()> {
        Err(CacheError::ConnectionError(self.reason.clone()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}
