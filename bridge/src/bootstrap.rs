//! 起動時の初期化
//!
//! ドライバの確認、接続キャッシュの構築、初回の接続テストを行う。
//! ここで失敗した場合、プロセスは終了コード1で終了する。

use crate::common::error::{BridgeError, BridgeResult};
use crate::config::DbConfig;
use crate::db::{check_driver, queries, ConnectionCache, SqliteConnector};
use crate::AppState;
use tracing::info;

/// 接続キャッシュを構築し、データベースに接続できることを確認する
pub async fn connect(config: &DbConfig) -> BridgeResult<AppState> {
    check_driver(&config.url)?;
    info!(url = %config.url, "Database driver loaded (sqlite, read-only)");

    let connector = SqliteConnector::new(config)?;
    let state = AppState::new(ConnectionCache::new(connector, config.ttl()));

    info!("Testing database connection...");
    let handle = state.connections.acquire().await?;
    // 接続テストの失敗はクエリ失敗ではなく接続失敗として扱う
    queries::ping(&handle)
        .await
        .map_err(|e| BridgeError::Connection(e.to_string()))?;
    info!(
        ttl_secs = state.connections.ttl().as_secs(),
        "Database connection OK!"
    );

    Ok(state)
}
