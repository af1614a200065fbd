//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the durable store following the Repository pattern.
//! Implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for unit tests.
//!
//! See integration tests in `tests/repository_link.rs` for usage examples.

pub mod link_repository;

pub use link_repository::{LinkRepository, StoreError};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
