//! pike-gatewayd: the Pike admission daemon.
//!
//! Single OS process running a Tokio async runtime. Clients submit RLN
//! spend shares over HTTP; the daemon verifies each proof through the
//! configured external verifier and adjudicates the share against the
//! in-memory nullifier ledger.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use pike_gateway::admission::AdmissionService;
use pike_gateway::config::GatewayConfig;
use pike_gateway::http;
use pike_gateway::verifier::CommandVerifier;

/// Command-line overrides for the TOML configuration.
#[derive(Parser, Debug)]
#[command(name = "pike-gatewayd", version)]
struct Cli {
    /// Config file path (defaults to PIKE_CONFIG, then ./pike.toml)
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    /// Listen address, host:port
    #[arg(long)]
    listen: Option<String>,
    /// Verifier executable (bare name resolved through PATH)
    #[arg(long = "verifier-command")]
    verifier_command: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GatewayConfig::load_from(path)?,
        None => GatewayConfig::load()?,
    };
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }
    if let Some(command) = cli.verifier_command {
        config.verifier.command = command;
    }

    // RUST_LOG wins over the configured filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "pike gateway starting");

    // Resolve the verifier up front so a missing executable stops the
    // daemon here instead of failing every submission.
    let verifier = CommandVerifier::resolve(&config.verifier)?;
    let service = Arc::new(AdmissionService::new(Arc::new(verifier)));

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    info!(addr = %config.server.listen_addr, "listening");

    axum::serve(listener, http::router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("pike gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        return;
    }
    info!("ctrl-c received, shutting down");
}
