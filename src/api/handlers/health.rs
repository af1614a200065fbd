//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: the durable store answers. A failed cache only marks the
///   service `degraded`, since reads fall back to the store
/// - **503 Service Unavailable**: the durable store is unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "cache": { "status": "ok", "message": "redis connected" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (db_check, cache_check) = tokio::join!(check_database(&state), check_cache(&state));

    let db_ok = db_check.is_ok();
    let status = match (db_ok, cache_check.is_ok()) {
        (true, true) => "healthy",
        (true, false) => "degraded",
        (false, _) => "unhealthy",
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            cache: cache_check,
        },
    };

    if db_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks that the durable store answers a trivial query.
async fn check_database(state: &AppState) -> CheckStatus {
    if state.repository.health_check().await {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Database connection failed")
    }
}

/// Checks the configured cache backend.
async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend();

    if state.cache.health_check().await {
        CheckStatus::ok(format!("{backend} connected"))
    } else {
        CheckStatus::error(format!("{backend} connection failed"))
    }
}
