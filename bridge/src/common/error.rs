//! エラー型定義
//!
//! 統一エラー型（thiserror使用）。起動時のエラーはプロセスを終了させ、
//! リクエスト処理中のエラーはAPI層でJSONエラーレスポンスに変換される。

use thiserror::Error;

/// bridge error type
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration could not be read or an environment override is malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database URL names a driver this build does not support
    #[error("Unsupported database driver: {0}")]
    DriverLoad(String),

    /// Opening a database connection failed
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Query execution failed
    #[error("Database error: {0}")]
    Query(String),

    /// Closing a database connection failed
    #[error("Failed to close connection: {0}")]
    Close(String),

    /// Query string parameter could not be parsed
    #[error("Invalid value for parameter '{name}': {value:?}")]
    InvalidParameter {
        /// parameter name
        name: &'static str,
        /// raw value as received
        value: String,
    },

    /// HTTP listener could not be bound or failed while serving
    #[error("Cannot start HTTP server on {addr}: {reason}")]
    Listen {
        /// bind address
        addr: String,
        /// underlying I/O error message
        reason: String,
    },
}

impl From<sqlx::Error> for BridgeError {
    fn from(err: sqlx::Error) -> Self {
        BridgeError::Query(err.to_string())
    }
}

/// bridge result type
pub type BridgeResult<T> = Result<T, BridgeError>;
