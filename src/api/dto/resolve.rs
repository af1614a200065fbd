//! DTOs for the JSON form of link resolution.

use serde::Serialize;

/// Resolved link, returned when the client asks for JSON instead of a redirect.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub code: String,
    pub long_url: String,
}
