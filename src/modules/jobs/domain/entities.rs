/// Domain entities for the import job tracker
///
/// An ImportJob is the persisted record of one batch import: what was
/// requested, how far it got, and what went wrong per item. Progress counts
/// only ever move forward; terminal states are write-once.
use crate::modules::catalog::MediaType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job lifecycle status matching the Postgres `job_status` enum.
#[derive(
    diesel_derive_enum::DbEnum,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::JobStatus"]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

/// What kind of batch a job imports. One kind per job; the overlap guard
/// is per kind, so a movie batch never blocks a series batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    MovieBatch,
    SeriesBatch,
}

impl JobKind {
    pub fn media_type(&self) -> MediaType {
        match self {
            JobKind::MovieBatch => MediaType::Movie,
            JobKind::SeriesBatch => MediaType::Series,
        }
    }

    pub fn for_media_type(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Movie => JobKind::MovieBatch,
            MediaType::Series => JobKind::SeriesBatch,
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::MovieBatch => write!(f, "movie_batch"),
            JobKind::SeriesBatch => write!(f, "series_batch"),
        }
    }
}

impl std::str::FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie_batch" => Ok(JobKind::MovieBatch),
            "series_batch" => Ok(JobKind::SeriesBatch),
            _ => Err(format!("Invalid job kind: {}", s)),
        }
    }
}

/// Opaque creation parameters, stored as JSONB. Either an explicit ID list
/// or an auto-popular sweep over N pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobParameters {
    #[serde(default)]
    pub external_ids: Vec<i32>,
    #[serde(default)]
    pub auto_popular: bool,
    #[serde(default)]
    pub pages: Option<u32>,
}

impl JobParameters {
    pub fn explicit(external_ids: Vec<i32>) -> Self {
        Self {
            external_ids,
            auto_popular: false,
            pages: None,
        }
    }

    pub fn auto_popular(pages: u32) -> Self {
        Self {
            external_ids: Vec::new(),
            auto_popular: true,
            pages: Some(pages),
        }
    }
}

/// One entry of a job's error log: which item failed and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub external_id: Option<i32>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorEntry {
    pub fn for_item(external_id: i32, message: impl Into<String>) -> Self {
        Self {
            external_id: Some(external_id),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn systemic(message: impl Into<String>) -> Self {
        Self {
            external_id: None,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of importing one item of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// A new record was inserted.
    Success { external_id: i32 },
    /// The key was already in the catalog (pre-existing or lost race).
    AlreadyExists { external_id: i32 },
    /// The item could not be imported; the batch continues.
    Failure { external_id: i32, message: String },
}

impl ItemOutcome {
    pub fn external_id(&self) -> i32 {
        match self {
            ItemOutcome::Success { external_id }
            | ItemOutcome::AlreadyExists { external_id }
            | ItemOutcome::Failure { external_id, .. } => *external_id,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ItemOutcome::Failure { .. })
    }
}

/// Persisted import job record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    pub id: Uuid,
    /// Who triggered the job: an API caller's name or "scheduler".
    pub owner: String,
    pub kind: JobKind,
    pub status: JobStatus,
    pub total_items: i32,
    pub processed_items: i32,
    pub failed_items: i32,
    pub parameters: JobParameters,
    pub error_log: Vec<ErrorEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImportJob {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Progress in whole percent; a zero-item job reports 100 once terminal
    /// and 0 before.
    pub fn progress_percent(&self) -> u8 {
        if self.total_items <= 0 {
            return if self.is_terminal() { 100 } else { 0 };
        }
        let pct = (self.processed_items as f64 / self.total_items as f64) * 100.0;
        pct.clamp(0.0, 100.0) as u8
    }

    pub fn succeeded_items(&self) -> i32 {
        self.processed_items - self.failed_items
    }
}
