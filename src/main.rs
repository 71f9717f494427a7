//! mirror-playground server entry point.
//!
//! Boots the auto-server supervisor, then serves the playground HTTP API
//! until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use mirror_playground::api;
use mirror_playground::app_state::AppState;
use mirror_playground::config::PlaygroundConfig;
use mirror_playground::service::{AutoServerExecutor, MirrorActivation};
use mirror_playground::supervisor::AutoServerSupervisor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first: VERBOSE influences the log filter.
    let config = PlaygroundConfig::from_env()?;

    let default_filter = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!(addr = %config.listen_addr, "starting mirror-playground");
    if config.verbose {
        tracing::info!("verbose logging enabled");
    }

    // Boot the auto-server. Failure is logged and non-fatal: the monitor
    // keeps retrying and the UI sees the state via /status.
    let supervisor = Arc::new(AutoServerSupervisor::new(&config));
    if !supervisor.ensure_started().await {
        tracing::warn!(
            port = config.auto_server_port,
            "auto-server not available yet, monitor will keep retrying"
        );
    }
    let monitor = Arc::clone(&supervisor).spawn_monitor();

    // Build the execution pipeline.
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()?;
    let executor = Arc::new(MirrorActivation::new(
        AutoServerExecutor::new(client.clone(), config.auto_server_url()),
        client,
        config.auto_server_url(),
    ));

    let app_state = AppState {
        executor,
        supervisor: Arc::clone(&supervisor),
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server — bind failure is the only fatal path.
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Tear down: stop the health-check timer, then ask the child to
    // terminate. The child is not awaited.
    monitor.abort();
    supervisor.stop().await;
    tracing::info!("shutdown complete");

    Ok(())
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            tracing::error!("failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => {
                tracing::error!("failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}
