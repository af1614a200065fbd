//! URL validation for links accepted by the write path.
//!
//! Validation only checks the input; the accepted string is stored exactly as
//! given so it can be returned byte-for-byte on resolution.

use url::Url;

/// Maximum accepted URL length in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,
}

/// Validates that `input` is a well-formed absolute HTTP(S) URL.
///
/// # Rules
///
/// 1. **Length**: at most [`MAX_URL_LENGTH`] bytes
/// 2. **Form**: parses as an absolute URL (relative references are rejected)
/// 3. **Protocol**: only `http` and `https`
/// 4. **Host**: must be present and non-empty
///
/// # Security
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`, etc.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com/path?q=1").is_ok());
/// assert!(validate_url("not-a-url").is_err());
/// assert!(validate_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
