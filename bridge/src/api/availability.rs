//! 期間指定の空き状況照会API
//!
//! `GET /api/dostepnosc/okres?from=<ms>&to=<ms>`

use super::{error::AppError, json_response};
use crate::db::queries;
use crate::period::{parse_timestamp_param, BufferWindow, DEFAULT_FROM_MS, DEFAULT_TO_MS};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use std::collections::HashMap;
use tracing::info;

/// /api/dostepnosc/okres
///
/// 期間の前後2日を含めた窓と重なる予約と貸出中セッションを返す。
/// 数値でない `from` / `to` はエラー（500）。
pub async fn period_availability(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let from = parse_timestamp_param(
        "from",
        params.get("from").map(String::as_str),
        DEFAULT_FROM_MS,
    )?;
    let to = parse_timestamp_param("to", params.get("to").map(String::as_str), DEFAULT_TO_MS)?;
    let window = BufferWindow::around(from, to);
    info!(from, to, window = %window, "Availability requested");

    let handle = state.connections.acquire().await?;
    let result = queries::availability(&handle, &window).await?;

    info!(
        reservations = result.reservations.len(),
        rentals = result.rentals.len(),
        "Returned availability"
    );
    Ok(json_response(StatusCode::OK, &result))
}
