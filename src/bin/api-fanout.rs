//! api-fanout - Concurrent multi-endpoint API check
//!
//! Probes every endpoint in the fixed list concurrently and prints one
//! report line per endpoint in completion order. Always exits 0.

use clap::Parser;
use meta_diag::config::{AppConfig, SharedConfig};
use meta_diag::fanout::ApiFanout;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Probe all governance API endpoints concurrently
#[derive(Parser)]
#[command(name = "api-fanout")]
#[command(about = "Probe the fixed endpoint list concurrently and report per endpoint")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// API base URL
    #[arg(long, env = "META_DIAG_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "META_DIAG_TIMEOUT_S")]
    timeout_s: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("meta_diag={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = AppConfig::load_or_default(&cli.config);

    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(timeout_s) = cli.timeout_s {
        config.api.timeout_s = timeout_s;
    }

    let shared_config = SharedConfig::new(config);

    match ApiFanout::new(shared_config) {
        Ok(fanout) => {
            fanout.run().await;
        }
        Err(e) => println!("Exception: {}", e),
    }
}
