//! axumサーバー起動・シャットダウンハンドリング

use crate::common::error::{BridgeError, BridgeResult};
use crate::AppState;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Bind the HTTP listener.
pub async fn bind(bind_addr: &str) -> BridgeResult<TcpListener> {
    TcpListener::bind(bind_addr)
        .await
        .map_err(|e| BridgeError::Listen {
            addr: bind_addr.to_string(),
            reason: e.to_string(),
        })
}

/// 指定リスナーでリクエストを処理し、`shutdown` の完了で停止する
pub async fn serve<F>(state: AppState, listener: TcpListener, shutdown: F) -> BridgeResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    let app = crate::api::create_app(state);

    info!("FireSnow Bridge API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| BridgeError::Listen {
            addr,
            reason: e.to_string(),
        })?;

    info!("Server shutdown complete");
    Ok(())
}

/// Ctrl+C / SIGTERMを待機
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
