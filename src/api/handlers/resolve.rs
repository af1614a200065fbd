//! Handler for resolving a short code through the versioned API.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};

use crate::api::dto::resolve::ResolveResponse;
use crate::application::services::LinkError;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_short_code;

/// Resolves a short code.
///
/// # Endpoint
///
/// `GET /api/v1/urls/{code}`
///
/// Responds with `200` and `{ "code", "long_url" }` when the `Accept` header
/// asks for `application/json`; otherwise behaves like the public redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or expired.
pub async fn resolve_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if !is_valid_short_code(&code) {
        return Err(LinkError::NotFound(code).into());
    }

    let long_url = state.link_service.get_original_url(&code).await?;

    if wants_json(&headers) {
        Ok(Json(ResolveResponse { code, long_url }).into_response())
    } else {
        Ok(Redirect::temporary(&long_url).into_response())
    }
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}
