//! FireSnow Bridge Entry Point

use clap::Parser;
use firesnow_bridge::cli::{self, Cli, Commands};
use firesnow_bridge::common::error::BridgeResult;
use firesnow_bridge::config::BridgeConfig;
use firesnow_bridge::logging;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: {}", e);
            None
        }
    };

    if let Err(err) = run(cli).await {
        error!(error = %err, "FireSnow Bridge stopped");
        eprintln!("ERROR: {}", err);
        if let Some(hint) = cli::startup_hint(&err) {
            eprintln!("{}", hint);
        }
        // プロセス終了前にバッファ済みのログを書き出す
        drop(log_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> BridgeResult<()> {
    let config = BridgeConfig::load_or_default(&cli.config)?;

    match cli.command {
        Some(Commands::Check) => cli::check::execute(&config).await,
        Some(Commands::Serve(args)) => cli::serve::execute(config, &args).await,
        None => cli::serve::execute(config, &Default::default()).await,
    }
}
