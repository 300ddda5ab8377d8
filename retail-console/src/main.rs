use console_core::access::{validate_menu, MENU};
use console_core::session::SessionStore;
use dotenvy::dotenv;
use retail_console::config::get_configuration;
use retail_console::observability::init_tracing;
use retail_console::services::{
    metrics::init_metrics, spawn_session_check, AuthClient, FileTokenStore,
};
use retail_console::startup::build_router;
use retail_console::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(&configuration.telemetry)?;
    init_metrics().map_err(|e| anyhow::anyhow!("Failed to register metrics: {}", e))?;
    validate_menu(MENU)?;

    let auth_client = Arc::new(AuthClient::new(configuration.auth_service.clone())?);
    let tokens = Arc::new(FileTokenStore::new(configuration.session.token_file.clone()));
    let session = Arc::new(SessionStore::new(auth_client, tokens));

    // Enter Loading before serving so no page renders as logged out mid-restore
    if let Some(pending) = session.begin_restore().await {
        let session = session.clone();
        tokio::spawn(async move {
            session.finish_restore(pending).await;
        });
    }

    if configuration.session.check_interval_secs > 0 {
        spawn_session_check(
            session.clone(),
            Duration::from_secs(configuration.session.check_interval_secs),
        );
    }

    let app = build_router(AppState::new(session));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting retail-console on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
