//! Synthetic service HTTP server
//!
//! Main entry point for the synthetic endpoint generator.

use std::{future::IntoFuture, sync::Arc, time::Duration};

use anyhow::Context;
use application::{BehaviorEngine, SimulationService};
use infrastructure::{
    AppConfig, SystemClock, init_telemetry,
    telemetry::{install_prometheus_recorder, metrics::DEFAULT_UPKEEP_INTERVAL, spawn_upkeep},
};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal, sync::Notify};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_telemetry(&config.telemetry)?;

    info!("🎭 Synthetic service v{} starting...", env!("CARGO_PKG_VERSION"));

    let settings = config.validate().context("Invalid configuration")?;
    let engine = BehaviorEngine::new(settings)?;

    info!(
        latency_incident = %engine.schedule().latency,
        error_incident = %engine.schedule().error,
        acceptable_failure_percent = engine.acceptable_failure_percent(),
        "Incident schedule fixed for this process"
    );

    let metrics = install_prometheus_recorder()?;
    spawn_upkeep(metrics.clone(), DEFAULT_UPKEEP_INTERVAL);

    let simulation = SimulationService::new(Arc::new(engine), Arc::new(SystemClock::new()));
    let state = AppState::new(Arc::new(simulation), metrics);

    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    // Bind failure is fatal, no retry
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🚀 Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));
    let signalled = Arc::new(Notify::new());

    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let signalled = Arc::clone(&signalled);
            async move {
                shutdown_signal().await;
                signalled.notify_one();
            }
        })
        .into_future();

    tokio::select! {
        result = server => result?,
        () = async {
            signalled.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!("⌛ Shutdown timeout of {:?} elapsed, dropping open connections", shutdown_timeout);
        }
    }

    info!("👋 Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("⏳ Waiting for in-flight simulated requests to finish...");
}
