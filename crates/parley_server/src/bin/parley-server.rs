//! Parley chat completion server.

use clap::Parser;
use parley_core::init_tracing;
use parley_server::{ParleyConfig, build_state, serve};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

/// Serve chat completions from a single model.
#[derive(Debug, Parser)]
#[command(name = "parley-server", version, about)]
struct Cli {
    /// Configuration file (defaults to ./parley.toml, then the user config dir)
    #[arg(short, long, env = "PARLEY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = ParleyConfig::load(cli.config.as_deref())?;
    init_tracing(*config.logging().format(), config.logging().filter())?;
    config.validate()?;

    if cli.check {
        info!(
            model = %config.model().id(),
            parser = %config.model().parser(),
            backend = %config.backend().base_url(),
            "Configuration is valid"
        );
        return Ok(());
    }

    #[cfg(feature = "metrics")]
    let meter_provider = parley_core::init_metrics("parley", std::time::Duration::from_secs(60));

    let (state, sweeper) = build_state(&config)?;
    let addr = cli.bind.unwrap_or(*config.server().bind());
    serve(state, addr, shutdown_signal()).await?;

    sweeper.abort();
    #[cfg(feature = "metrics")]
    if let Err(e) = meter_provider.shutdown() {
        tracing::warn!(error = %e, "Failed to flush metrics");
    }
    info!("Parley stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
