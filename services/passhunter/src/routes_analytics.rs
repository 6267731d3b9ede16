use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use recovery::{
    analyze, build_report, security_report, summarize, Analysis, AttackConfig, AttackMethod,
    MethodProfile, Report, ReportOptions, SecurityReport, StatusCounts, Summary,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::routes_jobs::ApiError;
use crate::state::SharedState;

pub async fn get_stats(State(state): State<SharedState>) -> Json<StatusCounts> {
    Json(state.registry.counts().await)
}

pub async fn get_summary(State(state): State<SharedState>) -> Json<Summary> {
    Json(summarize(&state.registry.list().await))
}

pub async fn get_security_report(State(state): State<SharedState>) -> Json<SecurityReport> {
    Json(security_report(&state.registry.list().await))
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub password: String,
}

pub async fn post_analyze(Json(req): Json<AnalyzeRequest>) -> Json<Analysis> {
    Json(analyze(&req.password))
}

/// Only finished jobs are exported.
pub async fn post_report(
    State(state): State<SharedState>,
    Json(options): Json<ReportOptions>,
) -> Json<Report> {
    let finished: Vec<_> = state
        .registry
        .list()
        .await
        .into_iter()
        .filter(|j| j.is_terminal())
        .collect();
    info!(jobs = finished.len(), anonymize = options.anonymize, "report: generated");
    Json(build_report(&finished, &options, Utc::now()))
}

#[derive(Serialize)]
pub struct MethodInfo {
    pub id: AttackMethod,
    #[serde(flatten)]
    pub profile: MethodProfile,
}

pub async fn get_methods() -> Json<Vec<MethodInfo>> {
    Json(
        AttackMethod::ALL
            .into_iter()
            .map(|id| MethodInfo { id, profile: id.profile() })
            .collect(),
    )
}

pub async fn get_attack_config(State(state): State<SharedState>) -> Json<AttackConfig> {
    Json(state.registry.attack_config().await)
}

pub async fn put_attack_config(
    State(state): State<SharedState>,
    Json(cfg): Json<AttackConfig>,
) -> Result<Json<AttackConfig>, ApiError> {
    cfg.validate().map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    state.registry.set_attack_config(cfg.clone()).await;
    Ok(Json(cfg))
}
