//! Contract Test: routing, preflight and CORS headers

use crate::support::TestBridge;
use axum::http::{HeaderMap, Method, StatusCode};
use firesnow_bridge::api::ENDPOINTS;
use serde_json::json;

fn assert_cors(headers: &HeaderMap) {
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

#[tokio::test]
async fn test_preflight_returns_204_on_every_endpoint() {
    // OPTIONSはデータベースに触れない
    let bridge = TestBridge::without_database();

    for (path, _) in ENDPOINTS {
        let (status, headers, body) = bridge.send(Method::OPTIONS, path).await;
        assert_eq!(status, StatusCode::NO_CONTENT, "{path}");
        assert!(body.is_empty(), "{path}");
        assert_cors(&headers);
    }
    assert!(!bridge.state.connections.is_open().await);
}

#[tokio::test]
async fn test_other_methods_behave_like_get() {
    let bridge = TestBridge::seeded(&[]).await;

    for method in [Method::POST, Method::PUT, Method::DELETE] {
        let (status, headers, body) = bridge
            .send(method.clone(), "/api/rezerwacje/aktywne")
            .await;
        assert_eq!(status, StatusCode::OK, "{method}");
        assert_eq!(body, b"[]");
        assert_cors(&headers);
    }
}

#[tokio::test]
async fn test_success_and_error_responses_carry_cors() {
    let bridge = TestBridge::without_database();

    let (status, headers, _) = bridge.send(Method::GET, "/api/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_cors(&headers);

    let (status, headers, _) = bridge.send(Method::GET, "/api/wypozyczenia/aktualne").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&headers);
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let bridge = TestBridge::without_database();

    let (status, body) = bridge.get_json("/api/narty").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));

    let (_, headers, _) = bridge.send(Method::GET, "/").await;
    assert_cors(&headers);
}
