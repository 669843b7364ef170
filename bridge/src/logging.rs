//! ロギング初期化ユーティリティ
//!
//! 標準出力へのログに加え、`FIRESNOW_LOG_DIR` が設定されている場合は
//! 日次ローテーションのログファイルにも出力する。

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level environment variable (takes precedence over `RUST_LOG`)
pub const LOG_LEVEL_ENV: &str = "FIRESNOW_LOG_LEVEL";

/// Log directory environment variable
pub const LOG_DIR_ENV: &str = "FIRESNOW_LOG_DIR";

const LOG_FILE_PREFIX: &str = "firesnow-bridge.log";

/// ログフィルタを構築する
///
/// `FIRESNOW_LOG_LEVEL` → `RUST_LOG` → `info` の順に評価する。
pub fn build_filter() -> EnvFilter {
    if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&level) {
            return filter;
        }
        eprintln!("Invalid {}={:?}, falling back to defaults", LOG_LEVEL_ENV, level);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// グローバルなtracing subscriberを初期化する
///
/// ファイル出力が有効な場合は `WorkerGuard` を返す。プロセス終了まで
/// 保持しないとバッファ済みのログが失われる。
pub fn init() -> Result<Option<WorkerGuard>, String> {
    let (file_layer, guard) = match std::env::var(LOG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir.trim(), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(build_filter())
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {}", e))?;

    Ok(guard)
}
