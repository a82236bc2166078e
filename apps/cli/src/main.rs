use clap::Parser;
use dotenv::dotenv;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::Cli;
use shared_config::AppConfig;

/// Used when RUST_LOG is unset: warnings everywhere, progress from the CLI
/// and from the cells that log their own state changes.
const DEFAULT_LOG_FILTER: &str = "warn,smart_health=info,alert_cell=info,patient_cell=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.api_url {
        Some(url) => AppConfig::new(url.as_str()),
        None => AppConfig::from_env(),
    };
    debug!("Using API at {}", config.api_base_url);

    commands::run(cli.command, &config).await
}
