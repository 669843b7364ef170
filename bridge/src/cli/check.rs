//! check サブコマンド
//!
//! 起動時と同じ接続テストを実行して終了します。

use crate::bootstrap;
use crate::common::error::BridgeResult;
use crate::config::BridgeConfig;

/// check サブコマンドを実行
pub async fn execute(config: &BridgeConfig) -> BridgeResult<()> {
    let state = bootstrap::connect(&config.db).await?;
    state.connections.invalidate().await;
    println!("Database connection OK: {}", config.db.url);
    Ok(())
}
