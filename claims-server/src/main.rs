use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use error_common::{AppError, Result};
use tracing::info;

use claims_server::{create_app, ClaimsServer};

/// Claims simulator HTTP server
#[derive(Parser, Debug)]
#[command(name = "claims-server")]
#[command(about = "HTTP API for generating, filtering and exporting synthetic claims")]
struct Args {
    /// Server bind address (overrides server.host)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Settings file (YAML or TOML)
    #[arg(short, long, env = "CLAIMSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut settings = config_engine::load_settings(args.config.as_deref())
        .map_err(|e| AppError::ConfigError(e.to_string()))?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    logger_redacted::init(&settings.logging.clone().verbose(args.verbose))
        .map_err(|e| AppError::StartupError(e.to_string()))?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("🏥 {}", "Starting claims simulator HTTP server".bright_cyan());
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION").bright_white());
    info!(
        "🗂️  Session limit: {}, upload limit: {} bytes",
        settings.server.max_sessions, settings.server.max_upload_bytes
    );

    let app = create_app(ClaimsServer::new(settings));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("🚀 {}", format!("Server running on http://{addr}").bright_green());
    info!("📋 {}", format!("Health check available at: http://{addr}/health").bright_blue());
    info!("📋 {}", format!("API v1 available at: http://{addr}/api/v1").bright_blue());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("👋 {}", "Server stopped".bright_yellow());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
