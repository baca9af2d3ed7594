/// Request and response bodies for the import API
use crate::modules::jobs::domain::entities::{ErrorEntry, ImportJob, JobKind, JobStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_owner() -> String {
    "api".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobRequest {
    pub kind: JobKind,
    /// Explicit provider IDs; mutually exclusive with `auto_popular`.
    #[serde(default)]
    pub ids: Option<Vec<i32>>,
    #[serde(default)]
    pub auto_popular: bool,
    /// Popularity pages to sweep when `auto_popular` is set.
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default = "default_owner")]
    pub owner: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobResponse {
    pub job_id: Uuid,
    pub owner: String,
    pub kind: JobKind,
    pub status: JobStatus,
    pub total_items: i32,
    pub processed_items: i32,
    pub failed_items: i32,
    pub progress_percent: u8,
    pub error_log: Vec<ErrorEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ImportJob> for JobResponse {
    fn from(job: ImportJob) -> Self {
        let progress_percent = job.progress_percent();
        Self {
            job_id: job.id,
            owner: job.owner,
            kind: job.kind,
            status: job.status,
            total_items: job.total_items,
            processed_items: job.processed_items,
            failed_items: job.failed_items,
            progress_percent,
            error_log: job.error_log,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Compact row for the listing endpoint; the error log stays behind the
/// per-job endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_id: Uuid,
    pub owner: String,
    pub kind: JobKind,
    pub status: JobStatus,
    pub total_items: i32,
    pub processed_items: i32,
    pub failed_items: i32,
    pub progress_percent: u8,
    pub created_at: DateTime<Utc>,
}

impl From<ImportJob> for JobSummary {
    fn from(job: ImportJob) -> Self {
        let progress_percent = job.progress_percent();
        Self {
            job_id: job.id,
            owner: job.owner,
            kind: job.kind,
            status: job.status,
            total_items: job.total_items,
            processed_items: job.processed_items,
            failed_items: job.failed_items,
            progress_percent,
            created_at: job.created_at,
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListJobsQuery {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}
