//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::application::services::LinkError;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_short_code;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Always `307 Temporary Redirect`: links expire, so browsers must not cache
/// the mapping permanently. Codes that cannot have been generated are rejected
/// without touching the cache or the store.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    if !is_valid_short_code(&code) {
        return Err(LinkError::NotFound(code).into());
    }

    let long_url = state.link_service.get_original_url(&code).await?;

    Ok(Redirect::temporary(&long_url))
}
