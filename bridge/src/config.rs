//! Configuration management
//!
//! Settings are read once at startup from a configuration file (format
//! inferred from the extension, TOML by default) and environment variables
//! prefixed with `FIRESNOW_`. Nested keys use `__` in environment variable
//! names, e.g. `FIRESNOW_API__PORT=9090` overrides `api.port`.
//!
//! A missing or malformed file is not fatal: a warning is logged and the
//! literal defaults are used. A malformed environment override is an error.

use crate::common::error::{BridgeError, BridgeResult};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "FIRESNOW";

/// bridge全体の設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// データベース接続設定 (`db.*`)
    #[serde(default)]
    pub db: DbConfig,

    /// HTTP API設定 (`api.*`)
    #[serde(default)]
    pub api: ApiConfig,
}

/// データベース接続設定
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    /// データベースURL (デフォルト: "sqlite://FireSport_database_4.db")
    #[serde(default = "default_db_url")]
    pub url: String,

    /// ユーザー名 (デフォルト: "SA")
    #[serde(default = "default_db_user")]
    pub user: String,

    /// パスワード (デフォルト: 空)
    #[serde(default)]
    pub password: String,

    /// キャッシュした接続の最大寿命（秒）(デフォルト: 120)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

/// HTTP API設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// ホストアドレス (デフォルト: "0.0.0.0")
    #[serde(default = "default_api_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 8080)
    #[serde(default = "default_api_port")]
    pub port: u16,
}

fn default_db_url() -> String {
    "sqlite://FireSport_database_4.db".to_string()
}

fn default_db_user() -> String {
    "SA".to_string()
}

fn default_ttl_secs() -> u64 {
    120
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            user: default_db_user(),
            password: String::new(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

// パスワードはログに出さない
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"***")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl DbConfig {
    /// Maximum age of a cached connection.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl ApiConfig {
    /// `host:port` string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl BridgeConfig {
    /// Load configuration, falling back to defaults when the file cannot be used.
    ///
    /// Environment overrides apply on top of either the file or the defaults.
    /// A malformed override is a `Config` error, never a silent reset.
    pub fn load_or_default(path: &Path) -> BridgeResult<Self> {
        info!(path = %path.display(), "Loading configuration...");
        let file = match Self::check_file(path) {
            Ok(()) => Some(path),
            Err(err) => {
                warn!(error = %err, "Error loading configuration, using defaults");
                None
            }
        };

        let config = Self::build(file).map_err(|err| {
            BridgeError::Config(format!(
                "invalid {}_* environment override: {}",
                ENV_PREFIX, err
            ))
        })?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    // 環境変数を混ぜずにファイル単体を検証する
    fn check_file(path: &Path) -> BridgeResult<()> {
        if !path.exists() {
            return Err(BridgeError::Config(format!(
                "{} not found",
                path.display()
            )));
        }
        Config::builder()
            .add_source(File::from(path).required(true))
            .build()
            .and_then(|settings| settings.try_deserialize::<BridgeConfig>())
            .map(|_| ())
            .map_err(|e| BridgeError::Config(e.to_string()))
    }

    fn build(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        // 文字列値のまま渡す。数値項目はデシリアライズ時に変換される
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .and_then(|settings| settings.try_deserialize::<BridgeConfig>())
    }
}
