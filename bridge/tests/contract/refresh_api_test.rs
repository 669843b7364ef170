//! Contract Test: /api/refresh

use crate::support::TestBridge;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_refresh_closes_cached_connection() {
    let bridge = TestBridge::seeded(&[]).await;

    let (status, _) = bridge.get_json("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    let before = bridge.state.connections.acquire().await.unwrap();

    let (status, body) = bridge.get_json("/api/refresh").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "ok",
            "message": "Database connections refreshed. Next request will read fresh data from disk."
        })
    );
    assert!(!bridge.state.connections.is_open().await);
    assert!(before.is_closed());

    let after = bridge.state.connections.acquire().await.unwrap();
    assert!(after.generation() > before.generation());
}

#[tokio::test]
async fn test_refresh_without_connection_succeeds() {
    let bridge = TestBridge::without_database();

    let (status, body) = bridge.get_json("/api/refresh").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
