//! In-process link repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};

/// A [`LinkRepository`] kept in a process-local map.
///
/// Follows the same rules as the PostgreSQL store: codes are unique among live
/// links, expired rows are invisible to [`load`](LinkRepository::load) until
/// purged, and a code held by an expired row can be reclaimed. Expiry is
/// measured with the injected [`Clock`].
pub struct InMemoryLinkRepository {
    links: RwLock<HashMap<String, Link>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryLinkRepository {
    /// Creates an empty repository on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty repository whose expiry checks use `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of rows physically present, live or expired.
    pub fn len(&self) -> usize {
        self.links.read().map(|links| links.len()).unwrap_or(0)
    }

    /// Returns true if no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("link map lock poisoned".to_string())
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn save(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let now = self.clock.now();
        let mut links = self.links.write().map_err(poisoned)?;

        if links
            .get(&new_link.code)
            .is_some_and(|existing| !existing.is_expired_at(now))
        {
            return Err(StoreError::DuplicateKey(new_link.code));
        }

        let link = Link::from(new_link);
        links.insert(link.code.clone(), link.clone());
        Ok(link)
    }

    async fn load(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let now = self.clock.now();
        let links = self.links.read().map_err(poisoned)?;

        Ok(links
            .get(code)
            .filter(|link| !link.is_expired_at(now))
            .cloned())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let now = self.clock.now();
        let mut links = self.links.write().map_err(poisoned)?;

        let before = links.len();
        links.retain(|_, link| !link.is_expired_at(now));
        Ok((before - links.len()) as u64)
    }

    async fn health_check(&self) -> bool {
        self.links.read().is_ok()
    }
}
