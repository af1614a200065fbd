//! Per-request deadline middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use std::time::Duration;

use crate::{error::AppError, state::AppState};

/// Whole milliseconds in `timeout`, saturating at `u64::MAX`.
fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Bounds every request by [`AppState::request_timeout`].
///
/// When the deadline passes, the handler future is dropped and `504 Gateway
/// Timeout` is returned. Dropping is safe for link operations: a store write
/// has either committed or not, and the cache is only written after a commit.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/{code}", get(redirect_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), deadline::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let timeout = st.request_timeout;
    let timeout_ms = timeout_millis(timeout);
    let path = req.uri().path().to_owned();

    match tokio::time::timeout(timeout, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(path = %path, timeout_ms, "Request deadline exceeded");
            AppError::timeout(
                "Request timed out",
                json!({ "timeout_ms": timeout_ms }),
            )
            .into_response()
        }
    }
}
