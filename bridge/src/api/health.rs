//! ヘルスチェック・接続リフレッシュAPI

use super::json_response;
use crate::common::error::BridgeResult;
use crate::db::queries;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Response};
use serde_json::json;
use tracing::{error, info};

/// /api/health
///
/// キャッシュから接続を取得し、応答を確認する。
pub async fn health_check(State(state): State<AppState>) -> Response {
    info!("Health check requested");

    match probe(&state).await {
        Ok(()) => {
            info!("Health check OK");
            json_response(
                StatusCode::OK,
                &json!({
                    "status": "ok",
                    "database": "connected",
                    "message": "FireSnow Bridge API is running",
                }),
            )
        }
        Err(err) => {
            error!(error = %err, "Database connection failed");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({
                    "status": "error",
                    "database": "disconnected",
                    "error": err.to_string(),
                }),
            )
        }
    }
}

async fn probe(state: &AppState) -> BridgeResult<()> {
    let handle = state.connections.acquire().await?;
    queries::ping(&handle).await
}

/// /api/refresh
///
/// キャッシュ済み接続を破棄する。次のリクエストはディスク上の最新データを読む。
/// 接続のクローズ失敗は無視されるため、常に成功する。
pub async fn refresh(State(state): State<AppState>) -> Response {
    info!("Manual refresh requested - closing all connections");
    state.connections.invalidate().await;

    json_response(
        StatusCode::OK,
        &json!({
            "status": "ok",
            "message": "Database connections refreshed. Next request will read fresh data from disk.",
        }),
    )
}
