//! fwz - 商户核销终端命令行
//!
//! # Usage
//!
//! ```bash
//! fwz login -u ydrzd02 -p ******
//! fwz home
//! fwz scan 1568758870_8780-0
//! fwz read-card --kind id --devices fixtures/devices.json
//! ```
//!
//! # Environment Variables
//!
//! - `FWZ_BASE_URL` - backend base URL
//! - `FWZ_DATA_DIR` - session file and logs
//! - `FWZ_DEVICES` - device fixture (JSON)
//! - `FWZ_LOG` - log filter

use std::sync::Arc;

use clap::Parser;
use fwz_terminal::{AppContext, Cli, commands, init_logging};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let _guard = match init_logging(&cli.settings.log_dir(), cli.settings.log.as_deref()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e:#}");
        eprintln!("错误: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %cli.settings.base_url,
        "fwz starting"
    );
    let ctx = Arc::new(AppContext::from_settings(cli.settings)?);
    commands::run(ctx, cli.command).await
}
