//! crosscast-gateway - serve the platform proxy endpoints

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use crosscast_gateway::config::GatewayConfig;
use crosscast_gateway::server::{build_router, GatewayState};
use libcrosscast::logging::LoggingConfig;

#[derive(Parser, Debug)]
#[command(name = "crosscast-gateway")]
#[command(about = "HTTP proxy that posts to social platforms with server-held credentials", long_about = None)]
struct Cli {
    /// Bind address (host:port); falls back to CROSSCAST_GATEWAY_ADDR
    #[arg(short, long)]
    addr: Option<SocketAddr>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        LoggingConfig::interactive_debug().init();
    } else {
        LoggingConfig::from_env().init();
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = GatewayConfig::from_env(cli.addr).context("failed to load configuration")?;
    let state = Arc::new(GatewayState::from_config(&config).context("failed to build posters")?);

    let platforms = state.configured_platforms();
    if platforms.is_empty() {
        warn!("no platform credentials configured; every post will answer 500");
    } else {
        info!(
            platforms = ?platforms.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "platforms configured"
        );
    }

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!("gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
