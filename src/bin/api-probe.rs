//! api-probe - Single-endpoint API check
//!
//! Fetches the configured listing endpoint and prints status, total,
//! item count, and the first item. Always exits 0.

use clap::Parser;
use meta_diag::config::{AppConfig, SharedConfig};
use meta_diag::probe::{self, ApiProber};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Probe one governance API endpoint
#[derive(Parser)]
#[command(name = "api-probe")]
#[command(about = "Fetch one API endpoint and print a structured summary")]
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

    // All failures are diagnostic output, never a non-zero exit
    match ApiProber::new(shared_config) {
        Ok(prober) => match prober.fetch().await {
            Ok(outcome) => {
                for line in probe::render(&outcome) {
                    println!("{}", line);
                }
            }
            Err(e) => println!("Exception: {}", e),
        },
        Err(e) => println!("Exception: {}", e),
    }
}
