//! OANDA Gateway Binary
//!
//! Starts the REST gateway.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin oanda-gateway
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `OANDA_API_KEY`: v20 personal access token
//! - `OANDA_ACCOUNT_ID`: v20 account id
//!
//! ## Optional
//! - `OANDA_ENVIRONMENT`: practice | live (default: practice)
//! - `HOST`: Bind address (default: 0.0.0.0)
//! - `PORT`: HTTP port (default: 8000)
//! - `OANDA_TIMEOUT_SECS`: Broker request timeout (default: 30)
//! - `OANDA_BASE_URL`: Override of the v20 REST base URL
//! - `OTEL_ENABLED`: Enable OpenTelemetry export (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4317>)
//! - `OTEL_SERVICE_NAME`: Service name (default: oanda-gateway)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::Context;
use oanda_gateway::infrastructure::telemetry;
use oanda_gateway::{
    AppState, GatewayConfig, OandaBrokerAdapter, ROUTES, TradingGateway, create_router,
};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let _telemetry_guard = telemetry::init();

    tracing::info!("Starting OANDA gateway");

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e).context("failed to load configuration");
        }
    };
    log_config(&config);

    let adapter = OandaBrokerAdapter::new(config.to_oanda_config())
        .context("failed to create OANDA client")?;
    let gateway = TradingGateway::new(
        Arc::new(adapter),
        config.credentials.account_id(),
        config.environment.as_str(),
    );
    let app = create_router(AppState::new(gateway));

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    log_routes();
    tracing::info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(await_shutdown())
        .await
        .context("HTTP server error")?;

    tracing::info!("OANDA gateway stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &GatewayConfig) {
    tracing::info!(
        environment = config.environment.as_str(),
        account_id = config.credentials.account_id(),
        host = %config.server.host,
        port = config.server.port,
        timeout_secs = config.timeout.as_secs(),
        "Configuration loaded"
    );

    if config.environment.is_live() {
        tracing::warn!("Running against the LIVE environment - orders execute real trades");
    }

    if let Some(base_url) = &config.base_url {
        tracing::info!(base_url = %base_url, "Using REST base URL override");
    }
}

/// Log the route table.
fn log_routes() {
    for (method, path) in ROUTES {
        tracing::info!(method, path, "Route registered");
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
async fn await_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
