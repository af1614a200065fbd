//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Redis cache implementation for fast URL lookups.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection reuse.
/// Errors are returned to the caller; the link service decides to degrade to
/// the durable store.
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "url:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, short_code: &str) -> String {
        format!("{}{}", self.key_prefix, short_code)
    }
}

/// Converts a TTL to whole milliseconds for `PSETEX`, rounding down so the
/// cached entry never outlives the durable row.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let cached = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| CacheError::OperationError(format!("Redis GET failed: {}", e)))?;

        match &cached {
            Some(_) => debug!(code = %short_code, "Redis HIT"),
            None => debug!(code = %short_code, "Redis MISS"),
        }
        Ok(cached)
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl: Duration,
    ) -> CacheResult<()> {
        let millis = ttl_millis(ttl);
        if millis == 0 {
            return Err(CacheError::OperationError(
                "refusing to cache entry with zero TTL".to_string(),
            ));
        }

        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        conn.pset_ex::<_, _, ()>(&key, original_url, millis)
            .await
            .map_err(|e| CacheError::OperationError(format!("Redis PSETEX failed: {}", e)))?;

        debug!(code = %short_code, ttl_ms = millis, "Redis SET");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_millis_rounds_down() {
        assert_eq!(ttl_millis(Duration::from_micros(1_999)), 1);
        assert_eq!(ttl_millis(Duration::from_micros(999)), 0);
        assert_eq!(ttl_millis(Duration::from_secs(86_400)), 86_400_000);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis (REDIS_URL)"]
    async fn test_redis_round_trip() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let cache = RedisCache::connect(&url).await.unwrap();

        cache
            .set_url("rt0001", "https://example.com", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(
            cache.get_url("rt0001").await.unwrap().as_deref(),
            Some("https://example.com")
        );
        assert!(cache.health_check().await);
    }
}
