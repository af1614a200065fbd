//! Utility functions for code generation and URL validation.
//!
//! - [`code_generator`] - Short code generation and shape checks
//! - [`url_validator`] - Validation of URLs accepted for shortening

pub mod code_generator;
pub mod url_validator;
