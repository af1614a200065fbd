//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL (absolute, HTTP or HTTPS). Stored exactly as sent.
    #[validate(length(min = 1, max = 2048, message = "URL length out of range"))]
    pub url: String,
}

/// A freshly created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortenResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            code: link.code,
            short_url,
            long_url: link.long_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::url_validator::MAX_URL_LENGTH;

    #[test]
    fn test_request_length_bounds() {
        let empty = ShortenRequest { url: String::new() };
        assert!(empty.validate().is_err());

        let long = ShortenRequest {
            url: format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH)),
        };
        assert!(long.validate().is_err());

        let ok = ShortenRequest {
            url: "https://example.com".to_string(),
        };
        assert!(ok.validate().is_ok());
    }
}
