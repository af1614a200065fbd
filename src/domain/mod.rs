//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Durable store trait definitions
//! - [`clock`] - Time source used for expiry decisions
//! - [`purge_worker`] - Background deletion of expired links
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])

pub mod clock;
pub mod entities;
pub mod purge_worker;
pub mod repositories;
