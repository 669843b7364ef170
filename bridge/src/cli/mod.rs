//! CLI module for firesnow-bridge
//!
//! Provides the command-line interface for running and checking the bridge.

/// check サブコマンド
pub mod check;
/// serve サブコマンド
pub mod serve;

use crate::common::error::BridgeError;
use crate::config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FireSnow Bridge - Read-only JSON API over the FireSnow ski-rental database
#[derive(Parser, Debug)]
#[command(name = "firesnow-bridge")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    FIRESNOW_CONFIG         Configuration file path (default: config.toml)
    FIRESNOW_DB__URL        Database URL (default: sqlite://FireSport_database_4.db)
    FIRESNOW_DB__TTL_SECS   Maximum age of the cached connection (default: 120)
    FIRESNOW_API__HOST      Bind address (default: 0.0.0.0)
    FIRESNOW_API__PORT      Listen port (default: 8080)
    FIRESNOW_LOG_LEVEL      Log level (default: info)
    FIRESNOW_LOG_DIR        Directory for daily-rotated log files
"#)]
pub struct Cli {
    /// Configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "FIRESNOW_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    /// Subcommand to execute (default: serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(serve::ServeArgs),
    /// Test the database connection and exit
    Check,
}

/// Operator hint printed alongside a fatal startup error.
pub fn startup_hint(err: &BridgeError) -> Option<&'static str> {
    match err {
        BridgeError::Config(_) => Some("Check FIRESNOW_* environment variables"),
        BridgeError::DriverLoad(_) => {
            Some("Only sqlite: database URLs are supported (check db.url)")
        }
        BridgeError::Connection(_) => Some("Check config.toml settings (db.url)"),
        BridgeError::Listen { .. } => Some("The port may be already in use (check api.port)"),
        _ => None,
    }
}
