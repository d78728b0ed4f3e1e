//! Directory API Gateway
//!
//! Serves directory, listing and search data to the directory sites and
//! triggers site rebuilds when the backend reports content changes.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use directory_api_gateway::{build_router, config::ObservabilityConfig, AppState, Config};

#[derive(Debug, Parser)]
#[command(name = "directory-gateway", version, about)]
struct Cli {
    /// Configuration file, without extension
    #[arg(long, env = "GATEWAY_CONFIG", default_value = "config/default")]
    config: String,

    /// Listen port, overrides the configured one
    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config))?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config.observability);

    info!(
        "Starting Directory API Gateway v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "Configuration loaded for environment: {}",
        config.environment
    );
    if config.backend.api_url.is_none() || config.backend.api_token.is_none() {
        warn!("NocoDB credentials are not configured; data endpoints will fail");
    }
    if config.hosting.api_token.is_none() || config.hosting.account_id.is_none() {
        warn!("Cloudflare credentials are not configured; the webhook will fail");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let state = AppState::new(config).context("failed to initialize application state")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("API Gateway listening on {}", addr);
    info!("Health check endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API Gateway shutdown complete");
    Ok(())
}

/// Initialize logging
fn init_tracing(observability: &ObservabilityConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "directory_api_gateway={level},directory_gateway={level},tower_http=info",
            level = observability.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    match observability.log_format.as_str() {
        "pretty" => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
        "compact" => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            warn!("Received SIGTERM, shutting down gracefully");
        },
    }
}
