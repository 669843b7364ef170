//! REST APIハンドラー
//!
//! パスごとに固定のハンドラーへ振り分ける。どのエンドポイントも
//! OPTIONSには204を返し、それ以外のメソッドはGETとして扱う。
//! 全レスポンスにCORSヘッダーを付与する。

use crate::AppState;
use axum::{
    handler::Handler,
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
    Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, Level};

/// APIエラーレスポンス
pub mod error;
/// ヘルスチェック・接続リフレッシュ
pub mod health;
/// 予約・貸出の一覧
pub mod listings;
/// 期間指定の空き状況照会
pub mod availability;

/// Content type of every response body
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Exposed routes and a short description, in registration order.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("/api/health", "Check API status"),
    ("/api/refresh", "Refresh database cache"),
    ("/api/rezerwacje/aktywne", "Get active reservations"),
    ("/api/wypozyczenia/aktualne", "Get active rentals"),
    ("/api/wypozyczenia/przeszle", "Get past rentals (returned)"),
    ("/api/narty/zarezerwowane", "Get reserved skis"),
    ("/api/dostepnosc/okres", "Get availability for a period"),
];

/// アプリケーションのルーターを作成
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", endpoint(health::health_check))
        .route("/api/refresh", endpoint(health::refresh))
        .route(
            "/api/rezerwacje/aktywne",
            endpoint(listings::active_reservations),
        )
        .route(
            "/api/wypozyczenia/aktualne",
            endpoint(listings::current_rentals),
        )
        .route(
            "/api/wypozyczenia/przeszle",
            endpoint(listings::past_rentals),
        )
        .route(
            "/api/narty/zarezerwowane",
            endpoint(listings::reserved_skis),
        )
        .route(
            "/api/dostepnosc/okres",
            endpoint(availability::period_availability),
        )
        .fallback(not_found)
        .layer(middleware::map_response(apply_cors_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

// OPTIONS以外はメソッドを問わず同じハンドラー
fn endpoint<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    any(handler).options(preflight)
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found() -> Response {
    json_response(StatusCode::NOT_FOUND, &json!({ "error": "Not found" }))
}

async fn apply_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// Serialize `body` as the response with the JSON content type.
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response(),
        Err(err) => {
            error!(error = %err, "Failed to serialize response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
                r#"{"error":"Failed to serialize response"}"#,
            )
                .into_response()
        }
    }
}
