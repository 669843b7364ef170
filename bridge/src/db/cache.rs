//! TTL付き単一接続キャッシュ
//!
//! プロセス全体で高々1つの読み取り専用接続を保持する。
//! 接続はTTL（デフォルト2分）を超えると次の `acquire()` で閉じて開き直し、
//! 外部で更新されたデータベースファイルを読み直す。`invalidate()` で即時に破棄できる。
//!
//! 状態遷移はすべて1つの非同期Mutexで直列化する。接続のオープン中も
//! ロックを保持するため、同時に `acquire()` しても物理オープンは1回だけ。

use super::connector::Connector;
use crate::common::error::BridgeResult;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Default maximum connection age
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

enum CacheState<H> {
    Closed,
    Open { handle: H, opened_at: Instant },
}

/// 単一接続キャッシュ
pub struct ConnectionCache<C: Connector> {
    connector: C,
    ttl: Duration,
    state: Mutex<CacheState<C::Handle>>,
}

impl<C: Connector> ConnectionCache<C> {
    /// 新しいキャッシュを作成（初期状態はClosed）
    pub fn new(connector: C, ttl: Duration) -> Self {
        Self {
            connector,
            ttl,
            state: Mutex::new(CacheState::Closed),
        }
    }

    /// Maximum age of a cached connection.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 有効な接続を返す
    ///
    /// キャッシュ済み接続の経過時間がTTL未満ならそれを返す。そうでなければ
    /// 既存接続を閉じ（失敗は無視）、新しい読み取り専用接続を開いて返す。
    /// オープン失敗はそのまま呼び出し側へ返す（リトライしない）。
    pub async fn acquire(&self) -> BridgeResult<C::Handle> {
        let mut state = self.state.lock().await;

        if let CacheState::Open { handle, opened_at } = &*state {
            let age = opened_at.elapsed();
            if age < self.ttl {
                return Ok(handle.clone());
            }
            info!(
                age_secs = age.as_secs(),
                ttl_secs = self.ttl.as_secs(),
                "Connection expired, closing..."
            );
        }

        if let CacheState::Open { handle, .. } = std::mem::replace(&mut *state, CacheState::Closed)
        {
            self.close_quietly(handle).await;
        }

        info!("Opening fresh connection...");
        let handle = self.connector.open().await?;
        *state = CacheState::Open {
            handle: handle.clone(),
            opened_at: Instant::now(),
        };
        info!(
            ttl_secs = self.ttl.as_secs(),
            "Fresh connection established"
        );

        Ok(handle)
    }

    /// 現在の接続を破棄し、次の `acquire()` で必ず開き直させる
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, CacheState::Closed) {
            CacheState::Open { handle, .. } => {
                self.close_quietly(handle).await;
                info!("Connection closed, next request will read fresh data");
            }
            CacheState::Closed => {
                debug!("No cached connection to invalidate");
            }
        }
    }

    /// Whether a connection is currently cached.
    pub async fn is_open(&self) -> bool {
        matches!(&*self.state.lock().await, CacheState::Open { .. })
    }

    /// Age of the cached connection, if any.
    pub async fn age(&self) -> Option<Duration> {
        match &*self.state.lock().await {
            CacheState::Open { opened_at, .. } => Some(opened_at.elapsed()),
            CacheState::Closed => None,
        }
    }

    async fn close_quietly(&self, handle: C::Handle) {
        if let Err(err) = self.connector.close(handle).await {
            warn!(error = %err, "Error closing connection (ignored)");
        }
    }
}
