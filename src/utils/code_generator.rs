//! Short code generation and validation utilities.
//!
//! Codes are drawn from the operating system CSPRNG on every call; there is no
//! shared generator state and no memory of previously issued codes. Uniqueness
//! is enforced by the durable store, not here.

use base64::Engine as _;
use thiserror::Error;

/// Length of a generated short code in characters.
pub const SHORT_CODE_LENGTH: usize = 6;

/// Number of random bytes drawn per code. 4 bytes encode to exactly 6
/// unpadded base64 characters, so no entropy is lost to truncation.
const CODE_LENGTH_BYTES: usize = 4;

/// Codes that would be shadowed by fixed routes and are never issued.
pub const RESERVED_CODES: &[&str] = &["health", "api"];

/// Errors that can occur while generating a short code.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("randomness source unavailable: {0}")]
    RandomnessUnavailable(String),
}

/// Produces candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Returns a fresh candidate code.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::RandomnessUnavailable`] if the entropy source fails.
    /// Implementations must not fall back to a weaker source.
    fn generate(&self) -> Result<String, GenerationError>;
}

/// Generator backed by the OS random number generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> Result<String, GenerationError> {
        generate_code()
    }
}

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 6-character code.
///
/// # Errors
///
/// Returns [`GenerationError::RandomnessUnavailable`] if the system random
/// number generator fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_code() -> Result<String, GenerationError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer)
        .map_err(|e| GenerationError::RandomnessUnavailable(e.to_string()))?;

    let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    code.truncate(SHORT_CODE_LENGTH);
    Ok(code)
}

/// Returns true if `code` is one of [`RESERVED_CODES`].
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Returns true if `code` has the shape of a generated short code and is not reserved.
///
/// Used by the HTTP layer to reject malformed codes before touching either store.
pub fn is_valid_short_code(code: &str) -> bool {
    code.len() == SHORT_CODE_LENGTH
        && !is_reserved_code(code)
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
