//! Link creation and resolution with cache-aside over the durable store.
//!
//! # Write path
//!
//! 1. Validate the URL (no resource is touched on failure)
//! 2. Generate a candidate code
//! 3. Save to the durable store; this is the commit point. A duplicate or
//!    reserved code is retried with a fresh candidate up to
//!    [`LinkPolicy::max_attempts`]
//! 4. Populate the cache with the remaining lifetime; failures are logged only
//!
//! # Read path
//!
//! 1. Cache hit returns immediately
//! 2. Cache miss and cache error both fall back to the durable store
//! 3. A store hit backfills the cache with the remaining lifetime, unless the
//!    link has no lifetime left
//!
//! Cancelling either operation (dropping the future) is safe at any await
//! point: the store write either committed or did not, and the cache is
//! never written before the commit.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{
    CodeGenerator, GenerationError, RandomCodeGenerator, is_reserved_code,
};
use crate::utils::url_validator::{UrlValidationError, validate_url};

/// Default link lifetime.
pub const DEFAULT_LINK_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Default number of codes tried before giving up on collisions.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Errors surfaced to callers of [`LinkService`].
///
/// Cache failures never appear here; they are absorbed by the service.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The input is not a well-formed absolute HTTP(S) URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),

    /// No randomness was available to draw a code.
    #[error("short code generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),

    /// Every candidate code collided with a live link.
    #[error("no free short code after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The durable store failed; the operation did not succeed.
    #[error("link store error: {0}")]
    Storage(StoreError),

    /// No live link exists for the code.
    #[error("short link not found: {0}")]
    NotFound(String),
}

/// Lifetime and collision policy for new links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPolicy {
    /// Fixed lifetime assigned at creation.
    pub ttl: chrono::Duration,
    /// Codes tried per request before [`LinkError::Exhausted`].
    pub max_attempts: u32,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            ttl: chrono::Duration::seconds(DEFAULT_LINK_TTL_SECONDS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Remaining lifetime of a link at `now`, or `None` if nothing is left.
///
/// Used as the cache TTL so a cached copy never outlives its durable row.
pub fn remaining_ttl(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<Duration> {
    (expires_at - now).to_std().ok().filter(|ttl| !ttl.is_zero())
}

/// Service for creating and resolving shortened links.
///
/// Holds only immutable collaborator handles, so one instance is shared by all
/// requests without locking.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    policy: LinkPolicy,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        generator: Arc<dyn CodeGenerator>,
        clock: Arc<dyn Clock>,
        policy: LinkPolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            generator,
            clock,
            policy,
        }
    }

    /// Creates a service with the OS random generator, the system clock, and
    /// the given policy.
    pub fn with_policy(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        policy: LinkPolicy,
    ) -> Self {
        Self::new(
            repository,
            cache,
            Arc::new(RandomCodeGenerator),
            Arc::new(SystemClock),
            policy,
        )
    }

    /// Shortens `long_url` and returns the committed link.
    ///
    /// The returned link's `code` is the short code. The URL is stored exactly
    /// as given.
    ///
    /// # Errors
    ///
    /// - [`LinkError::InvalidUrl`] if the URL is malformed (checked first)
    /// - [`LinkError::GenerationFailed`] if no randomness is available
    /// - [`LinkError::Exhausted`] if every attempted code was taken
    /// - [`LinkError::Storage`] on any other store failure
    pub async fn create_short_url(&self, long_url: &str) -> Result<Link, LinkError> {
        validate_url(long_url)?;

        let attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            let code = self.generator.generate().inspect_err(|e| {
                error!(error = %e, "Short code generation failed");
            })?;

            if is_reserved_code(&code) {
                metrics::counter!("link_code_collisions_total").increment(1);
                warn!(code = %code, attempt, "Drew a reserved short code, retrying");
                continue;
            }

            let now = self.clock.now();
            let new_link = NewLink {
                code,
                long_url: long_url.to_string(),
                created_at: now,
                expires_at: Some(now + self.policy.ttl),
            };

            match self.repository.save(new_link).await {
                Ok(link) => {
                    self.populate_cache(&link).await;
                    metrics::counter!("links_created_total").increment(1);
                    info!(code = %link.code, attempt, "Short link created");
                    return Ok(link);
                }
                Err(StoreError::DuplicateKey(code)) => {
                    metrics::counter!("link_code_collisions_total").increment(1);
                    warn!(code = %code, attempt, "Short code collision, retrying");
                }
                Err(e) => {
                    error!(error = %e, "Failed to save short link");
                    return Err(LinkError::Storage(e));
                }
            }
        }

        Err(LinkError::Exhausted { attempts })
    }

    /// Resolves a short code to its original URL.
    ///
    /// A cache hit is returned without consulting the store.
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotFound`] if no live link exists for `code`
    /// - [`LinkError::Storage`] if the store fails after a cache miss
    pub async fn get_original_url(&self, code: &str) -> Result<String, LinkError> {
        match self.cache.get_url(code).await {
            Ok(Some(url)) => {
                metrics::counter!("link_cache_hits_total").increment(1);
                debug!(code = %code, "Cache HIT");
                return Ok(url);
            }
            Ok(None) => {
                metrics::counter!("link_cache_misses_total").increment(1);
                debug!(code = %code, "Cache MISS");
            }
            Err(e) => {
                metrics::counter!("link_cache_errors_total").increment(1);
                warn!(code = %code, error = %e, "Cache lookup failed, falling back to link store");
            }
        }

        let link = self
            .repository
            .load(code)
            .await
            .map_err(|e| {
                error!(code = %code, error = %e, "Failed to load short link");
                LinkError::Storage(e)
            })?
            .ok_or_else(|| LinkError::NotFound(code.to_string()))?;

        self.populate_cache(&link).await;

        Ok(link.long_url)
    }

    /// Best-effort cache write with the link's remaining lifetime.
    async fn populate_cache(&self, link: &Link) {
        let ttl = match link.expires_at {
            Some(expires_at) => remaining_ttl(expires_at, self.clock.now()),
            None => self.policy.ttl.to_std().ok(),
        };

        let Some(ttl) = ttl else {
            debug!(code = %link.code, "Link has no lifetime left, skipping cache write");
            return;
        };

        if let Err(e) = self.cache.set_url(&link.code, &link.long_url, ttl).await {
            metrics::counter!("link_cache_errors_total").increment(1);
            warn!(code = %link.code, error = %e, "Failed to cache short link");
        }
    }
}
