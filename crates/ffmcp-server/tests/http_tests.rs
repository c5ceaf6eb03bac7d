//! Router tests for the hosted transport and its access gate.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{TestServer, API_KEY};
use ffmcp_server::create_router;

fn version_call() -> String {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": "ffmpeg_version", "arguments": {} }
    })
    .to_string()
}

fn post_mcp(body: String, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body)).unwrap()
}

fn router(server: &TestServer, api_key: Option<&str>) -> Router {
    create_router(server.state(api_key), None)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_key_rejected_before_any_tool_runs() {
    let server = TestServer::new();
    let response = router(&server, Some(API_KEY))
        .oneshot(post_mcp(version_call(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert!(server.runner.calls().is_empty());
}

#[tokio::test]
async fn test_wrong_key_rejected() {
    let server = TestServer::new();
    let response = router(&server, Some(API_KEY))
        .oneshot(post_mcp(version_call(), Some("not-the-key")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(server.runner.calls().is_empty());
}

#[tokio::test]
async fn test_valid_key_runs_tool_once() {
    let server = TestServer::new();
    let response = router(&server, Some(API_KEY))
        .oneshot(post_mcp(version_call(), Some(API_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["isError"], false);
    assert_eq!(body["result"]["structuredContent"]["success"], true);

    let calls = server.runner.calls();
    assert_eq!(calls, vec![vec!["ffmpeg".to_string(), "-version".to_string()]]);
}

#[tokio::test]
async fn test_health_is_gated() {
    let server = TestServer::new();
    let app = router(&server, Some(API_KEY));

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::get("/health")
                .header("x-api-key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["engine"]["ffmpeg"].is_boolean());
    assert!(body["engine"]["ffprobe"].is_boolean());
}

#[tokio::test]
async fn test_gate_disabled_without_secret() {
    let server = TestServer::new();
    let response = router(&server, None)
        .oneshot(post_mcp(version_call(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(server.runner.calls().len(), 1);
}

#[tokio::test]
async fn test_notification_is_accepted_without_body() {
    let server = TestServer::new();
    let notification = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    let response = router(&server, Some(API_KEY))
        .oneshot(post_mcp(notification.to_string(), Some(API_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_response_headers() {
    let server = TestServer::new();
    let response = router(&server, None)
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-request-id"], "req-123");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_rejected_request_still_gets_request_id() {
    let server = TestServer::new();
    let response = router(&server, Some(API_KEY))
        .oneshot(post_mcp(version_call(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-request-id"));
}
