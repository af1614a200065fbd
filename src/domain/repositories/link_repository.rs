//! Repository trait for the durable link store.

use crate::domain::entities::{Link, NewLink};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`LinkRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A live (non-expired) link already uses this code.
    #[error("short code already exists: {0}")]
    DuplicateKey(String),

    /// The backend could not complete the operation.
    #[error("link store unavailable: {0}")]
    Unavailable(String),
}

/// Authoritative, persistent store for short links.
///
/// Implementations enforce code uniqueness among live links and treat expired
/// rows as absent on read, whether or not they were physically deleted yet.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - Clock-driven in-process store
/// - [`crate::infrastructure::persistence::FailingLinkRepository`] - Always fails, for fault injection
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link. This is the commit point of the write path.
    ///
    /// A code held by an expired row is reclaimed; the old mapping is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if a live link already uses the code.
    /// Existing mappings are never overwritten.
    ///
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn save(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Loads a live link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if a non-expired link exists
    /// - `Ok(None)` if the code is unknown or expired
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn load(&self, code: &str) -> Result<Option<Link>, StoreError>;

    /// Physically deletes expired links and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn purge_expired(&self) -> Result<u64, StoreError>;

    /// Checks if the store backend is reachable.
    async fn health_check(&self) -> bool;
}
