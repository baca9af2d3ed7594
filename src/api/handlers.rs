/// HTTP handlers for the import API
use crate::api::dto::{CreateJobRequest, JobResponse, JobSummary, ListJobsQuery};
use crate::modules::jobs::application::service::{ImportJobService, ImportRequest};
use crate::shared::errors::{AppError, AppResult};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct ApiState {
    pub jobs: Arc<ImportJobService>,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn create_job(
    State(state): State<ApiState>,
    Json(request): Json<CreateJobRequest>,
) -> AppResult<(StatusCode, Json<JobResponse>)> {
    let import_request = match (&request.ids, request.auto_popular) {
        (Some(_), true) => {
            return Err(AppError::ValidationError(
                "Provide either ids or auto_popular, not both".to_string(),
            ))
        }
        (Some(ids), false) => ImportRequest::Explicit(ids.clone()),
        (None, true) => ImportRequest::AutoPopular {
            pages: request.pages.unwrap_or(1),
        },
        (None, false) => {
            return Err(AppError::ValidationError(
                "Provide ids or set auto_popular".to_string(),
            ))
        }
    };

    let job = state
        .jobs
        .start_import(&request.owner, request.kind, import_request)
        .await?;

    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

pub async fn get_job(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobResponse>> {
    let job = state
        .jobs
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} does not exist", id)))?;

    Ok(Json(JobResponse::from(job)))
}

pub async fn cancel_job(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    state.jobs.cancel_job(id).await?;
    Ok(Json(json!({ "job_id": id, "status": "failed" })))
}

pub async fn list_jobs(
    State(state): State<ApiState>,
    Query(query): Query<ListJobsQuery>,
) -> AppResult<Json<Vec<JobSummary>>> {
    let limit = query.limit.clamp(1, 100);
    let jobs = state
        .jobs
        .list_jobs(query.owner.as_deref(), query.page.max(1), limit)
        .await?;

    Ok(Json(jobs.into_iter().map(JobSummary::from).collect()))
}
