//! Credverify Node entry point.
//!
//! Serves credential verification over HTTP with configuration from a TOML
//! file or defaults.

mod api;
mod config;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use config::NodeConfig;
use credverify_verifiers::{VerificationService, VerifierFactory};

/// Credverify Node
#[derive(Parser, Debug)]
#[command(name = "credverify-node", version, about = "Credverify verification service")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "credverify.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the outbound backend timeout, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

fn init_tracing(config: &NodeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.json_logs() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Handle --init flag
    if args.init {
        let config = NodeConfig::default();
        config.save(&args.config)?;
        println!("wrote default config to {}", args.config.display());
        return Ok(());
    }

    // Load configuration
    let mut config = NodeConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.verification.timeout_secs = timeout_secs;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_tracing(&config);
    tracing::info!("Credverify Node v{}", env!("CARGO_PKG_VERSION"));

    // Backend names, endpoints, and timeouts are validated here, before serving.
    let factory = VerifierFactory::new(&config.verification)?;
    let backends: Vec<&str> = factory.registry().enabled().map(|b| b.name()).collect();
    tracing::info!(
        ?backends,
        timeout_secs = factory.timeout().as_secs(),
        "verifier factory ready"
    );
    let service = Arc::new(VerificationService::new(factory));

    let listen_addr = config.api_socket_addr()?;

    tokio::select! {
        result = api::start_api_server(listen_addr, service) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "API server error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received shutdown signal");
        }
    }

    tracing::info!("Credverify node exited cleanly");
    Ok(())
}
