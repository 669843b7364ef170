//! 読み取り専用データベース接続の生成・破棄
//!
//! `ConnectionCache` は `Connector` traitを介して物理接続を開閉する。
//! 本番はSQLite、テストではフェイク実装を差し込める。

use crate::common::error::{BridgeError, BridgeResult};
use crate::config::DbConfig;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// URL schemes this build can open
pub const SUPPORTED_SCHEMES: &[&str] = &["sqlite:"];

/// 物理接続の生成・破棄を抽象化するtrait
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// 呼び出し側へ渡す接続ハンドル
    type Handle: Clone + Send + Sync + 'static;

    /// 新しい読み取り専用接続を開く
    async fn open(&self) -> BridgeResult<Self::Handle>;

    /// 接続を閉じる
    async fn close(&self, handle: Self::Handle) -> BridgeResult<()>;
}

/// Validate that `url` names a driver compiled into this build.
pub fn check_driver(url: &str) -> BridgeResult<()> {
    if SUPPORTED_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
    {
        return Ok(());
    }
    let scheme = url.split(':').next().unwrap_or(url);
    Err(BridgeError::DriverLoad(format!(
        "'{}' (supported: {})",
        scheme,
        SUPPORTED_SCHEMES.join(", ")
    )))
}

/// Read-only session on the FireSnow database.
///
/// Backed by a pool capped at one connection, so clones share the same
/// physical session and concurrent queries on it are serialized by sqlx.
#[derive(Clone, Debug)]
pub struct DbHandle {
    generation: u64,
    pool: SqlitePool,
}

impl DbHandle {
    /// Sequence number of the open that produced this handle (starts at 1).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Executor for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Whether the underlying session has been closed.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// SQLiteファイルを読み取り専用で開くConnector
#[derive(Debug)]
pub struct SqliteConnector {
    options: SqliteConnectOptions,
    generation: AtomicU64,
}

impl SqliteConnector {
    /// 設定からConnectorを作成する
    ///
    /// URLのスキームが未対応の場合は `DriverLoad` エラー。
    /// `db.user` / `db.password` はSQLiteでは使用しない。
    pub fn new(config: &DbConfig) -> BridgeResult<Self> {
        check_driver(&config.url)?;

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| BridgeError::Connection(e.to_string()))?
            .read_only(true)
            .create_if_missing(false);

        Ok(Self {
            options,
            generation: AtomicU64::new(0),
        })
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    type Handle = DbHandle;

    async fn open(&self) -> BridgeResult<DbHandle> {
        // キャッシュ側で寿命を管理するため、プール側の再接続は無効化する
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .test_before_acquire(false)
            .connect_with(self.options.clone())
            .await
            .map_err(|e| BridgeError::Connection(e.to_string()))?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "Opened read-only SQLite session");
        Ok(DbHandle { generation, pool })
    }

    async fn close(&self, handle: DbHandle) -> BridgeResult<()> {
        debug!(generation = handle.generation, "Closing SQLite session");
        handle.pool.close().await;
        Ok(())
    }
}
