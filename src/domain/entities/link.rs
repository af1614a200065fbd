//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with its lifetime.
///
/// `expires_at` is fixed at creation. `None` is allowed by the schema and means
/// the link never expires; the link service always sets a finite expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        code: String,
        long_url: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            code,
            long_url,
            created_at,
            expires_at,
        }
    }

    /// Returns true if the link has passed its expiry time at `now`.
    ///
    /// A link is expired at exactly `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }
}

/// Input data for persisting a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<NewLink> for Link {
    fn from(new_link: NewLink) -> Self {
        Link::new(
            new_link.code,
            new_link.long_url,
            new_link.created_at,
            new_link.expires_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            "abc123".to_string(),
            "https://example.com".to_string(),
            now,
            Some(now + Duration::hours(24)),
        );

        assert_eq!(link.code, "abc123");
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.created_at, now);
        assert!(!link.is_expired_at(now));
    }

    #[test]
    fn test_link_expires_at_boundary() {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(10);
        let link = Link::new(
            "code".to_string(),
            "https://example.com".to_string(),
            now,
            Some(expires_at),
        );

        assert!(!link.is_expired_at(expires_at - Duration::milliseconds(1)));
        assert!(link.is_expired_at(expires_at));
        assert!(link.is_expired_at(expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_link_without_expiry_never_expires() {
        let now = Utc::now();
        let link = Link::new(
            "forever".to_string(),
            "https://example.com".to_string(),
            now,
            None,
        );
        assert!(!link.is_expired_at(now + Duration::days(365 * 100)));
    }

    #[test]
    fn test_new_link_into_link() {
        let now = Utc::now();
        let new_link = NewLink {
            code: "xyz789".to_string(),
            long_url: "https://rust-lang.org".to_string(),
            created_at: now,
            expires_at: Some(now + Duration::hours(1)),
        };

        let link: Link = new_link.clone().into();
        assert_eq!(link.code, new_link.code);
        assert_eq!(link.long_url, new_link.long_url);
        assert_eq!(link.expires_at, new_link.expires_at);
    }
}
