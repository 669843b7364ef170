//! serve サブコマンド
//!
//! 接続を確認してからHTTP APIサーバーを起動します。

use crate::api::ENDPOINTS;
use crate::common::error::BridgeResult;
use crate::config::BridgeConfig;
use crate::{bootstrap, server};
use clap::Args;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen port (overrides api.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address (overrides api.host)
    #[arg(short = 'H', long)]
    pub host: Option<String>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, mut config: BridgeConfig) -> BridgeConfig {
        if let Some(host) = &self.host {
            config.api.host = host.clone();
        }
        if let Some(port) = self.port {
            config.api.port = port;
        }
        config
    }
}

/// serve サブコマンドを実行
pub async fn execute(config: BridgeConfig, args: &ServeArgs) -> BridgeResult<()> {
    let config = args.apply(config);
    print_header();

    let state = bootstrap::connect(&config.db).await?;
    let listener = server::bind(&config.api.bind_addr()).await?;
    print_endpoints(config.api.port);

    server::serve(state, listener, server::shutdown_signal()).await
}

fn print_header() {
    println!("===========================================");
    println!("   FireSnow Bridge API");
    println!("   READ-ONLY connection to FireSnow DB");
    println!("===========================================");
    println!();
}

fn print_endpoints(port: u16) {
    println!();
    println!("===========================================");
    println!("FireSnow Bridge API is running!");
    println!("===========================================");
    println!();
    println!("API URL: http://localhost:{}", port);
    println!();
    println!("Available endpoints:");
    for (path, description) in ENDPOINTS {
        println!("  GET {:<32} - {}", path, description);
    }
    println!();
    println!("Press Ctrl+C to stop the server");
    println!("===========================================");
}
