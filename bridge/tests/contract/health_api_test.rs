//! Contract Test: /api/health

use crate::support::{schema_statements, write_database, TestBridge};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_reports_connected_database() {
    let bridge = TestBridge::seeded(&[]).await;

    let (status, body) = bridge.get_json("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "ok",
            "database": "connected",
            "message": "FireSnow Bridge API is running"
        })
    );
    assert!(bridge.state.connections.is_open().await);
}

#[tokio::test]
async fn test_health_reports_disconnected_database() {
    let bridge = TestBridge::without_database();

    let (status, body) = bridge.get_json("/api/health").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(body["database"], "disconnected");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Database connection failed"));
    // 読み取り専用なのでファイルは作られない
    assert!(!bridge.db_path.exists());
}

#[tokio::test]
async fn test_health_recovers_once_database_appears() {
    let bridge = TestBridge::without_database();

    let (status, _) = bridge.get_json("/api/health").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    write_database(&bridge.db_path, &schema_statements()).await;

    let (status, body) = bridge.get_json("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
}
