//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`              - Short link redirect
//! - `GET  /health`              - Health check: database, cache
//! - `POST /api/v1/urls`         - Create a short link
//! - `GET  /api/v1/urls/{code}`  - Resolve a short link
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Deadline** - Per-request timeout, `504` when exceeded
//! - **Path normalization** - Trailing slash handling
//! - **CORS** - On `/api/v1` only, see [`crate::api::routes::v1_routes`]

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{deadline, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes with tracing and deadline middleware, without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api::routes::v1_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            deadline::layer,
        ))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service served by [`crate::server::run`].
///
/// Trailing slashes are trimmed before routing, so `/api/v1/urls/` and
/// `/api/v1/urls` reach the same handler.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
