//! Core domain entities representing the business data model.
//!
//! - [`Link`] - A shortened URL mapping with its lifetime
//! - [`NewLink`] - Input for persisting a new link

pub mod link;

pub use link::{Link, NewLink};
