//! Risk Server - burnout risk prediction over HTTP
//!
//! Serves the HTML form, the JSON prediction API, health probes and
//! Prometheus metrics.

use anyhow::{Context, Result};
use risk_lib::{
    health::{components, HealthRegistry},
    EngineConfig, PredictionEngine,
};
use risk_server::{api, config::ServerConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting risk-server");

    let config = ServerConfig::load().context("Failed to load configuration")?;
    info!(model_path = %config.model_path.display(), port = config.port, "Server configured");

    let engine = Arc::new(PredictionEngine::new(EngineConfig::with_model_path(
        config.model_path.clone(),
    )));

    let health_registry = HealthRegistry::new();
    health_registry.register(components::ENGINE).await;

    let app_state = Arc::new(api::AppState::new(engine, health_registry.clone()));

    let artifact_loaded = if config.preload {
        app_state.refresh_artifact().await.loaded
    } else {
        health_registry
            .set_degraded(components::ARTIFACT, "artifact not resolved yet, loads on first prediction")
            .await;
        false
    };
    app_state.logger.log_startup(
        SERVER_VERSION,
        &config.model_path.display().to_string(),
        artifact_loaded,
    );

    // Mark ready after initialization
    health_registry.set_ready(true).await;

    let logger = app_state.logger.clone();
    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        logger.log_shutdown("SIGINT received");
    };

    api::serve(&config.bind_addr(), app_state, shutdown)
        .await
        .context("HTTP server failed")?;

    info!("Shutting down");
    Ok(())
}
