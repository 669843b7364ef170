//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング。すべてのエラーは500と
//! `{"error": <message>}` に変換される。

use super::json_response;
use crate::common::error::BridgeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub BridgeError);

impl From<BridgeError> for AppError {
    fn from(err: BridgeError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Request failed");
        json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &json!({ "error": self.0.to_string() }),
        )
    }
}
