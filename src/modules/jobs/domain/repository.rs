/// Repository trait for import job persistence
///
/// Every state transition is expressed as a guarded operation so concurrent
/// writers (worker, cancel endpoint) can never corrupt a job: the database
/// row is the single source of truth and terminal states are write-once.
use crate::modules::jobs::domain::entities::{
    ImportJob, ItemOutcome, JobKind, JobParameters,
};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Persist a new job in `Pending` with a fixed item total.
    async fn create(
        &self,
        owner: &str,
        kind: JobKind,
        parameters: JobParameters,
        total_items: i32,
    ) -> AppResult<ImportJob>;

    /// Guarded `pending -> processing` transition. Any other current status
    /// yields `AlreadyClaimed`; a missing job yields `NotFound`.
    async fn claim(&self, job_id: Uuid) -> AppResult<ImportJob>;

    /// Record one item outcome: increments `processed_items`, and on a
    /// failure also `failed_items` plus an error-log entry, in one atomic
    /// write guarded by `status = 'processing'`. Returns whether the write
    /// applied; `false` means the job left `Processing` (cancelled or
    /// failed) and the outcome was dropped.
    async fn record_item_outcome(&self, job_id: Uuid, outcome: &ItemOutcome) -> AppResult<bool>;

    /// Guarded `processing -> completed`. Partial failure still completes.
    /// A job already in a terminal state is left untouched.
    async fn finalize(&self, job_id: Uuid, final_total: i32) -> AppResult<()>;

    /// Systemic abort: `processing -> failed` with an appended error entry.
    async fn fail(&self, job_id: Uuid, message: &str) -> AppResult<()>;

    /// Operator cancellation. Valid only while `Processing`; forces
    /// `Failed` with a synthetic error entry. Returns whether the job was
    /// actually cancelled.
    async fn cancel(&self, job_id: Uuid) -> AppResult<bool>;

    async fn get(&self, job_id: Uuid) -> AppResult<Option<ImportJob>>;

    /// Most-recent-first listing, optionally filtered by owner.
    async fn list(&self, owner: Option<&str>, page: u32, limit: u32)
        -> AppResult<Vec<ImportJob>>;

    /// Whether a job of this kind is currently Pending or Processing.
    async fn has_active_of_kind(&self, kind: JobKind) -> AppResult<bool>;

    /// Housekeeping: delete terminal jobs older than `days`.
    async fn delete_old_finished(&self, days: i32) -> AppResult<usize>;
}
