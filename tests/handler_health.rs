mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::Harness;
use link_app::infrastructure::cache::{FailingCache, MemoryCache};
use link_app::infrastructure::persistence::{FailingLinkRepository, InMemoryLinkRepository};
use link_app::routes::router;
use std::sync::Arc;

#[tokio::test]
async fn test_health_endpoint_success() {
    let h = Harness::new();
    let server = TestServer::new(router(h.state())).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_cache_down_is_degraded() {
    let state = common::state_with(
        Arc::new(InMemoryLinkRepository::new()),
        Arc::new(FailingCache::default()),
    );
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["cache"]["status"], "error");
}

#[tokio::test]
async fn test_health_database_down_is_unavailable() {
    let state = common::state_with(
        Arc::new(FailingLinkRepository::default()),
        Arc::new(MemoryCache::new()),
    );
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["checks"]["database"]["status"], "error");
}
