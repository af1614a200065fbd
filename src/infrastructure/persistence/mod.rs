//! Durable link store implementations.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - PostgreSQL store, the production backend
//! - [`InMemoryLinkRepository`] - Process-local store with clock-driven expiry
//! - [`FailingLinkRepository`] - Permanently failing store for fault injection

pub mod failing_link_repository;
pub mod memory_link_repository;
pub mod pg_link_repository;

pub use failing_link_repository::FailingLinkRepository;
pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
