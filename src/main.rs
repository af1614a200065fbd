use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use link_app::config;
use link_app::server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env().context("Invalid configuration")?;

    init_tracing(&config.log_level, &config.log_format)?;
    config.print_summary();

    server::run(config).await
}

/// Installs the global subscriber. `RUST_LOG` directives win over the
/// configured default level.
fn init_tracing(log_level: &str, log_format: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .context("Invalid RUST_LOG filter")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_format {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
