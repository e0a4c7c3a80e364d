//! poll-gateway server entry point.
//!
//! Loads configuration, prepares the database, and starts the Axum HTTP
//! server. A database that is down at startup is not fatal.

use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use poll_gateway::api;
use poll_gateway::app_state::AppState;
use poll_gateway::config::ServerConfig;
use poll_gateway::persistence::PgPollGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::from_env()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(
        addr = %config.listen_addr,
        db_host = %config.db_host,
        db_name = %config.db_name,
        "starting poll-gateway"
    );

    // Build persistence and service layers
    let gateway = Arc::new(PgPollGateway::connect_lazy(&config));
    let app_state = AppState::new(gateway);

    if !app_state.poll_service.bootstrap().await {
        tracing::warn!("database unavailable at startup, serving from in-memory storage");
    }

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
