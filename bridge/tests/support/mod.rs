//! Contract test helpers
//!
//! 一時ディレクトリにFireSnowスキーマのSQLiteファイルを作成し、
//! 読み取り専用の接続キャッシュを持つルーターを構築する。

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use firesnow_bridge::{
    api,
    config::DbConfig,
    db::{ConnectionCache, SqliteConnector, DEFAULT_TTL},
    AppState,
};
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

/// FireSnowのテーブル定義（ブリッジが参照する列のみ）。ユニットテストと共有
const FIRESNOW_SCHEMA_SQL: &str = include_str!("../fixtures/firesnow_schema.sql");

/// スキーマを文単位に分割する
pub fn schema_statements() -> Vec<&'static str> {
    FIRESNOW_SCHEMA_SQL
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .collect()
}

/// テスト用ブリッジ
pub struct TestBridge {
    /// 一時ディレクトリ（drop時に削除）
    pub dir: TempDir,
    /// SQLiteファイルのパス
    pub db_path: PathBuf,
    /// 共有状態
    pub state: AppState,
    /// ルーター
    pub app: Router,
}

impl TestBridge {
    /// FireSnowスキーマに `rows` を投入した状態で起動する
    pub async fn seeded(rows: &[&str]) -> Self {
        let bridge = Self::without_database();
        let mut statements: Vec<&str> = schema_statements();
        statements.extend_from_slice(rows);
        write_database(&bridge.db_path, &statements).await;
        bridge
    }

    /// データベースファイルが存在しない状態で起動する（接続は遅延）
    pub fn without_database() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = dir.path().join("FireSport_database_4.db");
        let config = DbConfig {
            url: format!("sqlite:{}", db_path.display()),
            ..DbConfig::default()
        };
        let connector = SqliteConnector::new(&config).expect("sqlite driver");
        let state = AppState::new(ConnectionCache::new(connector, DEFAULT_TTL));
        let app = api::create_app(state.clone());
        Self {
            dir,
            db_path,
            state,
            app,
        }
    }

    /// 任意メソッドでリクエストを送る
    pub async fn send(&self, method: Method, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    /// GETしてJSONとして解釈する
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, headers, body) = self.send(Method::GET, uri).await;
        assert_eq!(
            headers
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json; charset=utf-8"),
            "unexpected content type for {uri}"
        );
        let value = serde_json::from_slice(&body)
            .unwrap_or_else(|e| panic!("invalid JSON from {uri}: {e}"));
        (status, value)
    }
}

/// 書き込み可能な接続で `statements` を実行する（テストデータ投入用）
pub async fn write_database(path: &Path, statements: &[&str]) {
    let pool = writer(path).await;
    for statement in statements {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .unwrap_or_else(|e| panic!("seed failed: {statement}: {e}"));
    }
    pool.close().await;
}

/// 書き込み可能なプール（ブリッジ外のFireSnow本体を模す）
pub async fn writer(path: &Path) -> SqlitePool {
    SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true),
    )
    .await
    .expect("failed to open writable sqlite file")
}
