//! Link repository that fails every operation, for fault-injection tests.

use async_trait::async_trait;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};

/// A durable store whose backend is permanently down.
///
/// Every call returns [`StoreError::Unavailable`]. The link service must
/// surface this as a storage error and never report success.
pub struct FailingLinkRepository {
    reason: String,
}

impl FailingLinkRepository {
    /// Creates a failing store that reports `reason` on every call.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Unavailable(self.reason.clone())
    }
}

impl Default for FailingLinkRepository {
    fn default() -> Self {
        Self::new("link store unavailable")
    }
}

#[async_trait]
impl LinkRepository for FailingLinkRepository {
    async fn save(&self, _new_link: NewLink) -> Result<Link, StoreError> {
        Err(self.error())
    }

    async fn load(&self, _code: &str) -> Result<Option<Link>, StoreError> {
        Err(self.error())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        Err(self.error())
    }

    async fn health_check(&self) -> bool {
        false
    }
}
