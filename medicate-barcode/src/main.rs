//! medicate-barcode - Barcode resolution microservice
//!
//! Resolves a scanned product barcode to a product name by running a web
//! search for the code and ranking the result titles.
//!
//! Configuration priority: command line → environment → TOML → defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use medicate_common::config::{self, TomlConfig};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medicate_barcode::services::{BarcodeResolver, GoogleSearchClient};
use medicate_barcode::{build_router, AppState};

/// Command-line arguments for medicate-barcode
#[derive(Parser, Debug)]
#[command(name = "medicate-barcode")]
#[command(about = "Barcode to product name resolution service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides TOML)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Interface to bind (overrides TOML)
    #[arg(long, env = "MEDICATE_HOST")]
    host: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, env = "MEDICATE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| config::default_config_path("medicate-barcode"));
    let toml_config = config::load_toml_config(config_path.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(&toml_config);

    info!(
        "Starting medicate-barcode v{}",
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) if path.exists() => info!("Configuration: {}", path.display()),
        Some(path) => warn!(
            "Configuration file {} not found, using defaults",
            path.display()
        ),
        None => warn!("No configuration directory available, using defaults"),
    }

    let credentials = config::resolve_search_credentials(&toml_config);
    let client = GoogleSearchClient::new(&toml_config.search, credentials)
        .context("Failed to build search client")?;
    if !client.is_configured() {
        warn!("Search credentials missing: resolve requests will fail until GOOGLE_API_KEY and GOOGLE_CSE_ID are set");
    }

    let resolver = BarcodeResolver::new(Arc::new(client), toml_config.search.max_results);
    let app = build_router(AppState::new(resolver));

    let host = args.host.unwrap_or(toml_config.host);
    let port = args.port.unwrap_or(toml_config.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// RUST_LOG wins; otherwise the TOML log level applies to our crates and
/// request tracing.
fn init_tracing(toml_config: &TomlConfig) {
    let level = &toml_config.logging.level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "medicate_barcode={level},medicate_common={level},tower_http={level}"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
