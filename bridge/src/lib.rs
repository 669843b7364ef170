//! FireSnow Bridge
//!
//! FireSnowスキーレンタル管理データベースを読み取り専用で開き、
//! 固定のSQLクエリ結果をJSON HTTP APIとして公開するブリッジ

#![warn(missing_docs)]

/// 共通型定義
pub mod common;

/// REST APIハンドラー
pub mod api;

/// 起動時の接続確認
pub mod bootstrap;

/// CLIインターフェース
pub mod cli;

/// 設定管理
pub mod config;

/// データベースアクセス
pub mod db;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 空き状況照会の期間指定
pub mod period;

/// axumサーバー起動・シャットダウンハンドリング
pub mod server;

use db::{ConnectionCache, SqliteConnector};
use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// 共有の読み取り専用接続キャッシュ
    pub connections: Arc<ConnectionCache<SqliteConnector>>,
}

impl AppState {
    /// Wrap a connection cache for sharing across handlers.
    pub fn new(connections: ConnectionCache<SqliteConnector>) -> Self {
        Self {
            connections: Arc::new(connections),
        }
    }
}
