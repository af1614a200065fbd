//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating the durable
//! store, the cache, and the code generator. Services consume trait objects
//! and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and resolution

pub mod services;
