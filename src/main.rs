use anyhow::Context;

use iot_energy_api::config::config;
use iot_energy_api::database::Database;
use iot_energy_api::{app, init_tracing, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    init_tracing("info,tower_http=debug");

    // Initialize configuration (this loads the config singleton)
    let config = config().clone();
    tracing::info!("Starting IoT Energy API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; login and protected routes will fail until it is configured");
    }
    if config.security.cors_origins.is_empty() {
        tracing::warn!("SECURITY_CORS_ORIGINS is not set; cross-origin browser requests will be refused");
    }

    let db = Database::connect_lazy(&config.database).context("DATABASE_URL must be set to start the server")?;

    let bind_addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("IoT Energy API listening on http://{}", bind_addr);

    let state = AppState::new(db.clone(), config);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
