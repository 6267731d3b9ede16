use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use recovery::{
    estimate_remaining, format_duration, AttackMethod, Eta, Job, JobStatus, RegistryError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::SharedState;

pub type ApiError = (StatusCode, String);

pub fn registry_error(e: RegistryError) -> ApiError {
    let status = match &e {
        RegistryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::InvalidTransition { .. } => StatusCode::CONFLICT,
        RegistryError::ShutDown => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, e.to_string())
}

/// Finished jobs have nothing left to estimate.
fn live_eta(job: &Job, now: DateTime<Utc>) -> Option<Eta> {
    (!job.is_terminal()).then(|| estimate_remaining(job, now))
}

#[derive(Deserialize)]
pub struct SubmitJobRequest {
    pub file_name: String,
    pub file_type: String,
    pub method: Option<String>,
}

#[derive(Serialize)]
pub struct JobCreatedResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub method: AttackMethod,
}

/// Job snapshot plus the numbers the progress view derives from it.
#[derive(Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub queue_position: usize,
    pub eta: Option<String>,
    pub elapsed: Option<String>,
    pub estimated_total_attempts: Option<u64>,
}

impl JobView {
    fn new(job: Job, queue_position: usize) -> Self {
        let now = Utc::now();
        Self {
            queue_position,
            eta: live_eta(&job, now).map(|eta| eta.to_string()),
            elapsed: job.elapsed(now).map(format_duration),
            estimated_total_attempts: job.estimated_total_attempts(),
            job,
        }
    }
}

pub async fn submit_job(
    State(state): State<SharedState>,
    Json(req): Json<SubmitJobRequest>,
) -> Result<(StatusCode, Json<JobCreatedResponse>), ApiError> {
    let method = req
        .method
        .as_deref()
        .map(str::parse::<AttackMethod>)
        .transpose()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let job_id = state
        .registry
        .submit(&req.file_name, &req.file_type, method)
        .await
        .map_err(registry_error)?;
    let job = state.registry.get(job_id).await.map_err(registry_error)?;

    Ok((
        StatusCode::CREATED,
        Json(JobCreatedResponse {
            job_id,
            status: job.status,
            method: job.method,
        }),
    ))
}

pub async fn list_jobs(State(state): State<SharedState>) -> Json<Vec<JobView>> {
    let views = state
        .registry
        .list()
        .await
        .into_iter()
        .enumerate()
        .map(|(i, job)| JobView::new(job, i + 1))
        .collect();
    Json(views)
}

pub async fn get_job(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobView>, ApiError> {
    let jobs = state.registry.list().await;
    let (position, job) = jobs
        .into_iter()
        .enumerate()
        .find(|(_, j)| j.id == id)
        .ok_or_else(|| registry_error(RegistryError::NotFound(id)))?;
    Ok(Json(JobView::new(job, position + 1)))
}

pub async fn pause_job(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    state.registry.pause(id).await.map_err(registry_error)?;
    state.registry.get(id).await.map(Json).map_err(registry_error)
}

pub async fn resume_job(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    state.registry.resume(id).await.map_err(registry_error)?;
    state.registry.get(id).await.map(Json).map_err(registry_error)
}

pub async fn stop_job(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    state.registry.stop(id).await.map_err(registry_error)?;
    state.registry.get(id).await.map(Json).map_err(registry_error)
}

#[derive(Serialize)]
pub struct EtaResponse {
    pub job_id: Uuid,
    pub eta: Option<String>,
    pub remaining_secs: Option<f64>,
}

pub async fn get_eta(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EtaResponse>, ApiError> {
    let job = state.registry.get(id).await.map_err(registry_error)?;
    let eta = live_eta(&job, Utc::now());
    Ok(Json(EtaResponse {
        job_id: id,
        eta: eta.map(|eta| eta.to_string()),
        remaining_secs: eta.and_then(|eta| eta.remaining()).map(|d| d.as_secs_f64()),
    }))
}
