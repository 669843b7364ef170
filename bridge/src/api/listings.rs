//! 予約・貸出一覧API

use super::{error::AppError, json_response};
use crate::db::{projection::JsonRow, queries};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Response};
use tracing::info;

fn rows_response(rows: &[JsonRow], what: &str) -> Response {
    info!(count = rows.len(), "Returned {}", what);
    json_response(StatusCode::OK, rows)
}

/// /api/rezerwacje/aktywne
pub async fn active_reservations(State(state): State<AppState>) -> Result<Response, AppError> {
    info!("Active reservations requested");
    let handle = state.connections.acquire().await?;
    let rows = queries::active_reservations(&handle).await?;
    Ok(rows_response(&rows, "active reservations"))
}

/// /api/wypozyczenia/aktualne
pub async fn current_rentals(State(state): State<AppState>) -> Result<Response, AppError> {
    info!("Active rentals requested");
    let handle = state.connections.acquire().await?;
    let rows = queries::current_rentals(&handle).await?;
    Ok(rows_response(&rows, "active rentals"))
}

/// /api/wypozyczenia/przeszle
pub async fn past_rentals(State(state): State<AppState>) -> Result<Response, AppError> {
    info!("Past rentals requested");
    let handle = state.connections.acquire().await?;
    let rows = queries::past_rentals(&handle).await?;
    Ok(rows_response(&rows, "past rentals"))
}

/// /api/narty/zarezerwowane
pub async fn reserved_skis(State(state): State<AppState>) -> Result<Response, AppError> {
    info!("Reserved skis requested");
    let handle = state.connections.acquire().await?;
    let rows = queries::reserved_skis(&handle).await?;
    Ok(rows_response(&rows, "reserved skis"))
}
