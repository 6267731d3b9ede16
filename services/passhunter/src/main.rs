mod config;
mod routes_analytics;
mod routes_jobs;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use recovery::JobEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::routes_analytics::*;
use crate::routes_jobs::*;
use crate::state::{AppState, SharedState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    let app_state =
        Arc::new(AppState::new(cfg.engine.clone()).context("Failed to build job registry")?);
    let registry = app_state.registry.clone();

    tokio::spawn(log_events(registry.subscribe()));

    let app = router(app_state);

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, seed = ?cfg.engine.seed, "passhunter listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    registry.shutdown();
    info!("passhunter stopped");
    Ok(())
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/jobs", post(submit_job).get(list_jobs))
        .route("/jobs/:id", get(get_job))
        .route("/jobs/:id/pause", post(pause_job))
        .route("/jobs/:id/resume", post(resume_job))
        .route("/jobs/:id/stop", post(stop_job))
        .route("/jobs/:id/eta", get(get_eta))
        .route("/stats", get(get_stats))
        .route("/analytics/summary", get(get_summary))
        .route("/analytics/security", get(get_security_report))
        .route("/analyze", post(post_analyze))
        .route("/reports", post(post_report))
        .route("/methods", get(get_methods))
        .route("/config/attack", get(get_attack_config).put(put_attack_config))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn log_events(mut rx: broadcast::Receiver<JobEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) => debug!(job_id = %event.job_id(), event = %line, "job event"),
                Err(e) => warn!(error = %e, "job event: serialize failed"),
            },
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "job event log lagging"),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl-c handler failed");
    }
}
