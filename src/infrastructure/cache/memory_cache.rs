//! In-process cache with per-entry TTL.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::clock::{Clock, SystemClock};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

/// Minimum time between full sweeps of expired entries.
const SWEEP_INTERVAL_SECONDS: i64 = 60;

struct Entries {
    map: HashMap<String, CacheEntry>,
    next_sweep_at: DateTime<Utc>,
}

impl Entries {
    /// Drops every expired entry once per [`SWEEP_INTERVAL_SECONDS`].
    fn sweep_if_due(&mut self, now: DateTime<Utc>) {
        if now < self.next_sweep_at {
            return;
        }
        let before = self.map.len();
        self.map.retain(|_, entry| entry.expires_at > now);
        self.next_sweep_at = now + chrono::Duration::seconds(SWEEP_INTERVAL_SECONDS);

        let evicted = before - self.map.len();
        if evicted > 0 {
            debug!(evicted, "Swept expired cache entries");
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// A process-local cache that honors entry TTLs against a [`Clock`].
///
/// Expired entries are evicted on lookup, and writes sweep the whole map at
/// most once a minute so entries that are never read again are still freed.
/// Useful for single-instance
/// deployments without Redis and for tests that drive time with
/// [`crate::domain::clock::ManualClock`].
pub struct MemoryCache {
    entries: RwLock<Entries>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Creates an empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache whose TTLs are measured with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let next_sweep_at = clock.now() + chrono::Duration::seconds(SWEEP_INTERVAL_SECONDS);
        Self {
            entries: RwLock::new(Entries {
                map: HashMap::new(),
                next_sweep_at,
            }),
            clock,
        }
    }

    /// Number of entries still live at the current clock time.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .read()
            .map(|entries| entries.map.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }

    /// Number of entries held in memory, expired or not.
    pub fn physical_len(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.map.len())
            .unwrap_or(0)
    }

    /// Returns true if no live entries remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> CacheError {
    CacheError::OperationError("cache lock poisoned".to_string())
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let now = self.clock.now();

        {
            let entries = self.entries.read().map_err(poisoned)?;
            match entries.map.get(short_code) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().map_err(poisoned)?;
        if entries
            .map
            .get(short_code)
            .is_some_and(|entry| entry.expires_at <= now)
        {
            entries.map.remove(short_code);
            debug!(code = %short_code, "Evicted expired cache entry");
        }
        Ok(None)
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl: Duration,
    ) -> CacheResult<()> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CacheError::OperationError(format!("invalid TTL: {e}")))?;
        let now = self.clock.now();

        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.sweep_if_due(now);
        entries.map.insert(
            short_code.to_string(),
            CacheEntry {
                value: original_url.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.entries.read().is_ok()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;

    fn cache_with_clock() -> (MemoryCache, ManualClock) {
        let clock = ManualClock::default();
        (MemoryCache::with_clock(Arc::new(clock.clone())), clock)
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (cache, _clock) = cache_with_clock();
        cache
            .set_url("abc123", "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get_url("abc123").await.unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn test_miss_for_unknown_key() {
        let (cache, _clock) = cache_with_clock();
        assert_eq!(cache.get_url("nope00").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (cache, clock) = cache_with_clock();
        cache
            .set_url("abc123", "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(59));
        assert!(cache.get_url("abc123").await.unwrap().is_some());

        clock.advance(chrono::Duration::seconds(1));
        assert_eq!(cache.get_url("abc123").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_refreshes_value_and_ttl() {
        let (cache, clock) = cache_with_clock();
        cache
            .set_url("abc123", "https://old.example.com", Duration::from_secs(10))
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(5));
        cache
            .set_url("abc123", "https://new.example.com", Duration::from_secs(10))
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(8));

        assert_eq!(
            cache.get_url("abc123").await.unwrap().as_deref(),
            Some("https://new.example.com")
        );
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_unread_expired_entries_are_swept_on_write() {
        let (cache, clock) = cache_with_clock();
        for i in 0..1_000 {
            cache
                .set_url(&format!("c{i:05}"), "https://example.com", Duration::from_secs(1))
                .await
                .unwrap();
        }
        assert_eq!(cache.physical_len(), 1_000);

        clock.advance(chrono::Duration::hours(48));
        cache
            .set_url("fresh1", "https://example.com/fresh", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.physical_len(), 1);
    }

    #[tokio::test]
    async fn test_sweep_keeps_live_entries() {
        let (cache, clock) = cache_with_clock();
        cache
            .set_url("short1", "https://example.com/short", Duration::from_secs(30))
            .await
            .unwrap();
        cache
            .set_url("long01", "https://example.com/long", Duration::from_secs(600))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(SWEEP_INTERVAL_SECONDS));
        cache
            .set_url("new001", "https://example.com/new", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.physical_len(), 2);
        assert!(cache.get_url("long01").await.unwrap().is_some());
        assert!(cache.get_url("new001").await.unwrap().is_some());
    }
}
