//! Wire contract tests for the gateway client
//!
//! Pins down how envelope bodies and HTTP statuses translate into
//! `PlatformError` variants, with wiremock standing in for the proxy.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use libcrosscast::client::GatewayClient;
use libcrosscast::error::{CrosscastError, PlatformError};
use libcrosscast::types::Platform;

async fn client_for(server: &MockServer) -> GatewayClient {
    GatewayClient::new(server.uri(), Duration::from_secs(5)).unwrap()
}

fn platform_error(result: libcrosscast::error::Result<serde_json::Value>) -> PlatformError {
    match result {
        Err(CrosscastError::Platform(e)) => e,
        other => panic!("expected platform error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_success_envelope_yields_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/twitter"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "content": "Hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": "123", "text": "Hello" },
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let data = client.post(Platform::Twitter, "Hello").await.unwrap();

    assert_eq!(data, json!({ "id": "123", "text": "Hello" }));
}

#[tokio::test]
async fn test_success_without_data_yields_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let data = client.post(Platform::Threads, "Hello").await.unwrap();

    assert_eq!(data, serde_json::Value::Null);
}

#[tokio::test]
async fn test_status_classification() {
    let cases = [
        (401, "auth", true),
        (403, "auth", true),
        (400, "validation", false),
        (422, "validation", false),
    ];

    for (status, label, expect_auth) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bluesky"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "success": false,
                "error": label,
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let error = platform_error(client.post(Platform::Bluesky, "Hello").await);

        match error {
            PlatformError::Authentication(msg) => {
                assert!(expect_auth, "HTTP {} should not map to Authentication", status);
                assert!(msg.contains(label));
            }
            PlatformError::Validation(msg) => {
                assert!(!expect_auth, "HTTP {} should not map to Validation", status);
                assert!(msg.contains(label));
            }
            other => panic!("unexpected mapping for HTTP {}: {:?}", status, other),
        }
    }
}

#[tokio::test]
async fn test_rate_limit_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/twitter"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "success": false,
            "error": "Too many requests",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = platform_error(client.post(Platform::Twitter, "Hello").await);

    assert!(matches!(error, PlatformError::RateLimit(_)));
}

#[tokio::test]
async fn test_server_error_maps_to_posting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/twitter"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "poster exploded",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = platform_error(client.post(Platform::Twitter, "Hello").await);

    match error {
        PlatformError::Posting(msg) => assert!(msg.contains("poster exploded")),
        other => panic!("expected Posting, got {:?}", other),
    }
}

#[tokio::test]
async fn test_2xx_with_success_false_is_an_error() {
    // A gateway bug, but the client must not report it as success.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bluesky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "inconsistent envelope",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = platform_error(client.post(Platform::Bluesky, "Hello").await);

    match error {
        PlatformError::Posting(msg) => assert!(msg.contains("inconsistent envelope")),
        other => panic!("expected Posting, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreadable_2xx_body_is_posting_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/twitter"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = platform_error(client.post(Platform::Twitter, "Hello").await);

    match error {
        PlatformError::Posting(msg) => assert!(msg.contains("unreadable")),
        other => panic!("expected Posting, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreadable_error_body_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/twitter"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = platform_error(client.post(Platform::Twitter, "Hello").await);

    match error {
        PlatformError::Posting(msg) => assert!(msg.contains("503")),
        other => panic!("expected Posting, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_maps_to_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/twitter"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = GatewayClient::new(server.uri(), Duration::from_millis(200)).unwrap();
    let error = platform_error(client.post(Platform::Twitter, "Hello").await);

    assert!(matches!(error, PlatformError::Network(_)));
}

#[tokio::test]
async fn test_connection_refused_maps_to_network() {
    // Port 1 is never listening.
    let client = GatewayClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
    let error = platform_error(client.post(Platform::Bluesky, "Hello").await);

    assert!(matches!(error, PlatformError::Network(_)));
}
