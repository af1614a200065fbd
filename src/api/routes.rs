//! Versioned API route configuration.

use crate::api::handlers::{resolve_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Routes mounted under `/api/v1`.
///
/// # Endpoints
///
/// - `POST /urls`        - Create a short link
/// - `GET  /urls/{code}` - Resolve a short link (JSON or redirect)
///
/// Browsers on any origin may call these routes; preflight `OPTIONS` requests
/// are answered by the CORS layer.
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(shorten_handler))
        .route("/urls/{code}", get(resolve_handler))
        .layer(cors())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
