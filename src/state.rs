//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state cloned into each request.
///
/// All fields are cheap `Arc` handles; the service itself holds no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    /// Durable store handle, used directly by health checks.
    pub repository: Arc<dyn LinkRepository>,
    /// Cache handle, used directly by health checks.
    pub cache: Arc<dyn CacheService>,
    /// Public origin used to build short URLs, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates state around an already-built service.
    pub fn new(
        link_service: Arc<LinkService>,
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_service,
            repository,
            cache,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Overrides the per-request deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full public URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
