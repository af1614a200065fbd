//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /api/v1/urls`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "code": "aB3_x9",
///   "short_url": "http://localhost:3000/aB3_x9",
///   "long_url": "https://example.com/some/long/path",
///   "created_at": "2025-01-01T00:00:00Z",
///   "expires_at": "2025-01-02T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the URL is missing, too long, or not an absolute HTTP(S) URL
/// - 503 if no free short code was found within the attempt budget
/// - 500 on store or randomness failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create_short_url(&payload.url).await?;
    let short_url = state.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::new(link, short_url)),
    ))
}
