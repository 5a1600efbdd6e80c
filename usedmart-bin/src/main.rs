use clap::Parser;
use std::{env::current_dir, path::PathBuf};
use usedmart_common::{UMAppContext, UMPermChecker};
use usedmart_error::{UMError, UMResult};
use usedmart_models::constants::DEFAULT_CONFIG_FILE_NAME;
use usedmart_storage::{UMCacheProvider, UMDbManager};
use usedmart_web::UMWebServer;

/// UsedMart - second-hand marketplace backend
///
/// Serves the listing catalog, buyer/seller messaging, orders and the
/// moderation console over a JSON HTTP API.
#[derive(Parser)]
#[command(name = "usedmart")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "UsedMart marketplace backend", long_about = None)]
struct Cli {
    /// Sets a custom config file with full path
    ///
    /// If not specified, 'usedmart.toml' in the current working directory is
    /// used when present.
    #[arg(short, long, env = "UM_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> UMResult<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(p) => p,
        None => {
            let dir = current_dir()
                .map_err(|e| UMError::from(format!("Failed to get current directory: {e}")))?;
            dir.join(DEFAULT_CONFIG_FILE_NAME)
        }
    };

    UMAppContext::init::<UMDbManager, UMCacheProvider, UMPermChecker, UMWebServer>(
        config_path.to_string_lossy().to_string(),
    )
    .await?;

    // Blocks until SIGINT/SIGTERM, then shuts down gracefully
    UMAppContext::run().await
}
