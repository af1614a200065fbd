//! HTTP middleware for request processing.
//!
//! Provides request tracing and the per-request deadline.

pub mod deadline;
pub mod tracing;
