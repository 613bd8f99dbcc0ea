use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use traffic_server::{app, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::load(&config.data_dir)
        .with_context(|| format!("loading data from {}", config.data_dir.display()))?;
    info!(
        model_loaded = state.model_loaded(),
        datasets = state.datasets.len(),
        "state loaded"
    );

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!("Traffic Flow Prediction server running at http://{}", addr);
    info!("  POST /predict       (Make predictions)");
    info!("  GET  /api/traffic   (Get traffic data)");
    info!("  GET  /api/cities    (Get city list)");

    axum::serve(listener, app(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
