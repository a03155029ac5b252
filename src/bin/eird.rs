//! eird: Eir daemon.
//!
//! Loads every prediction artifact once at startup and serves
//! [`PredictionService`](eir::PredictionService) over HTTP.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eir::config::{Config, LogFormat};

/// Eir daemon, serving symptom-to-disease predictions.
#[derive(Parser)]
#[command(name = "eird")]
#[command(version = eir::PKG_VERSION)]
#[command(about = "Eir symptom-to-disease prediction daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "EIR_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Override the bind address from the config file.
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }

    init_tracing(config.server.log_format);
    info!(version = eir::version_string(), "eird starting");

    // Model loading is blocking and may download from the hub
    let loaded = config.clone();
    let service = tokio::task::spawn_blocking(move || eir::loader::build_service(&loaded)).await??;

    eir::server::serve(service, &config.server).await?;

    Ok(())
}

/// Initialise tracing (default: info; override with RUST_LOG).
fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init(),
    }
}
