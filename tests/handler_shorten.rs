mod common;

use axum_test::TestServer;
use common::Harness;
use link_app::routes::router;
use serde_json::json;

#[tokio::test]
async fn test_shorten_success() {
    let h = Harness::new();
    let server = TestServer::new(router(h.state())).unwrap();

    let response = server
        .post("/api/v1/urls")
        .json(&json!({ "url": "https://example.com/a/long/path?x=1" }))
        .await;

    assert_eq!(response.status_code(), 201);

    let body = response.json::<serde_json::Value>();
    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(body["long_url"], "https://example.com/a/long/path?x=1");
    assert_eq!(body["short_url"], format!("{}/{}", common::BASE_URL, code));
    assert!(body["created_at"].is_string());
    assert!(body["expires_at"].is_string());
    assert_eq!(h.repository.len(), 1);
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let h = Harness::new();
    let server = TestServer::new(router(h.state())).unwrap();

    let response = server
        .post("/api/v1/urls")
        .json(&json!({ "url": "not-a-url" }))
        .await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(h.repository.is_empty());
}

#[tokio::test]
async fn test_shorten_empty_url_fails_validation() {
    let h = Harness::new();
    let server = TestServer::new(router(h.state())).unwrap();

    let response = server.post("/api/v1/urls").json(&json!({ "url": "" })).await;

    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["details"]["url"].is_array());
}

#[tokio::test]
async fn test_shorten_too_long_url() {
    let h = Harness::new();
    let server = TestServer::new(router(h.state())).unwrap();

    let url = format!("https://example.com/{}", "a".repeat(2048));
    let response = server.post("/api/v1/urls").json(&json!({ "url": url })).await;

    response.assert_status_bad_request();
    assert!(h.repository.is_empty());
}

#[tokio::test]
async fn test_shorten_store_down_hides_backend_error() {
    use link_app::infrastructure::cache::NullCache;
    use link_app::infrastructure::persistence::FailingLinkRepository;
    use std::sync::Arc;

    let state = common::state_with(
        Arc::new(FailingLinkRepository::new("connection refused by 10.0.0.5")),
        Arc::new(NullCache::new()),
    );
    let server = TestServer::new(router(state)).unwrap();

    let response = server
        .post("/api/v1/urls")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "internal_error");
    assert!(!body.to_string().contains("10.0.0.5"));
}

#[tokio::test]
async fn test_shorten_exhausted_is_service_unavailable() {
    use common::ScriptedGenerator;
    use link_app::application::services::LinkPolicy;
    use std::sync::Arc;

    let h = Harness::with_generator(
        Arc::new(ScriptedGenerator::new(["AAAAAA", "AAAAAA", "AAAAAA"])),
        LinkPolicy {
            max_attempts: 2,
            ..LinkPolicy::default()
        },
    );
    let server = TestServer::new(router(h.state())).unwrap();

    server
        .post("/api/v1/urls")
        .json(&json!({ "url": "https://example.com/one" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/api/v1/urls")
        .json(&json!({ "url": "https://example.com/two" }))
        .await;

    assert_eq!(response.status_code(), 503);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "unavailable");
    assert_eq!(body["error"]["details"]["attempts"], 2);
}

#[tokio::test]
async fn test_shorten_never_returns_route_shadowed_code() {
    use common::ScriptedGenerator;
    use link_app::application::services::LinkPolicy;
    use std::sync::Arc;

    let h = Harness::with_generator(
        Arc::new(ScriptedGenerator::new(["health", "AAAAAA"])),
        LinkPolicy::default(),
    );
    let server = TestServer::new(router(h.state())).unwrap();

    let response = server
        .post("/api/v1/urls")
        .json(&json!({ "url": "https://example.com/target" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], "AAAAAA");

    let redirect = server.get("/AAAAAA").await;
    assert_eq!(redirect.status_code(), 307);
    assert_eq!(redirect.header("location"), "https://example.com/target");

    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<serde_json::Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_shorten_preflight_allows_cross_origin() {
    use axum::http::Method;

    let h = Harness::new();
    let server = TestServer::new(router(h.state())).unwrap();

    let response = server
        .method(Method::OPTIONS, "/api/v1/urls")
        .add_header("Origin", "https://app.example")
        .add_header("Access-Control-Request-Method", "POST")
        .add_header("Access-Control-Request-Headers", "content-type")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), "*");
    let methods = response.header("access-control-allow-methods");
    assert!(methods.to_str().unwrap().contains("POST"));
    let headers = response.header("access-control-allow-headers");
    assert!(headers.to_str().unwrap().contains("content-type"));
    assert!(h.repository.is_empty());
}

#[tokio::test]
async fn test_shorten_response_carries_cors_header() {
    let h = Harness::new();
    let server = TestServer::new(router(h.state())).unwrap();

    let response = server
        .post("/api/v1/urls")
        .add_header("Origin", "https://app.example")
        .json(&json!({ "url": "https://example.com/cors" }))
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(response.header("access-control-allow-origin"), "*");
}
