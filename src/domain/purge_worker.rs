//! Background worker that physically deletes expired links.
//!
//! Reads never depend on this worker: the store already hides expired rows.
//! Purging only reclaims space and keeps the `expires_at` index small.

use std::sync::Arc;
use std::time::Duration;

use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::repositories::{LinkRepository, StoreError};

/// Maximum attempts per tick before the purge is skipped until the next tick.
const PURGE_ATTEMPTS: usize = 3;

/// Runs one purge pass, retrying transient store failures with backoff.
///
/// # Errors
///
/// Returns the last [`StoreError`] if every attempt failed.
pub async fn purge_once(repository: &dyn LinkRepository) -> Result<u64, StoreError> {
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(PURGE_ATTEMPTS - 1);

    Retry::spawn(strategy, move || async move {
        repository.purge_expired().await.inspect_err(|e| {
            debug!(error = %e, "Purge attempt failed");
        })
    })
    .await
}

/// Periodically purges expired links until the task is dropped.
///
/// The first pass runs one full `interval` after start.
pub async fn run_purge_worker(repository: Arc<dyn LinkRepository>, interval: Duration) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match purge_once(repository.as_ref()).await {
            Ok(0) => debug!("Purge found no expired links"),
            Ok(removed) => info!(removed, "Purged expired links"),
            Err(e) => error!(error = %e, "Purge failed, retrying on next tick"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;

    #[tokio::test]
    async fn test_purge_once_returns_removed_count() {
        let mut repo = MockLinkRepository::new();
        repo.expect_purge_expired().times(1).returning(|| Ok(7));

        let removed = purge_once(&repo).await.unwrap();
        assert_eq!(removed, 7);
    }

    #[tokio::test]
    async fn test_purge_once_retries_transient_failure() {
        let mut repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();

        repo.expect_purge_expired()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(StoreError::Unavailable("connection reset".to_string())));
        repo.expect_purge_expired()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(2));

        let removed = purge_once(&repo).await.unwrap();
        assert_eq!(removed, 2);
    }

    #[tokio::test]
    async fn test_purge_once_gives_up_after_bounded_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_purge_expired()
            .times(PURGE_ATTEMPTS)
            .returning(|| Err(StoreError::Unavailable("down".to_string())));

        let result = purge_once(&repo).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
