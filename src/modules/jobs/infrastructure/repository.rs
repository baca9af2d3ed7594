/// Diesel-based implementation of JobRepository
///
/// All state transitions are single guarded UPDATEs keyed on the current
/// status, so a cancel racing a worker can never produce a second terminal
/// transition: whichever write lands first wins, the loser matches zero
/// rows. Error-log appends use JSONB concatenation to stay atomic.
use crate::modules::jobs::domain::entities::{
    ErrorEntry, ImportJob, ItemOutcome, JobKind, JobParameters, JobStatus,
};
use crate::modules::jobs::domain::repository::JobRepository;
use crate::modules::jobs::infrastructure::models::{ImportJobModel, NewImportJobModel};
use crate::schema::import_jobs;
use crate::shared::database::DbPool;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

pub struct JobRepositoryImpl {
    pool: DbPool,
}

impl JobRepositoryImpl {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn get_conn(
        &self,
    ) -> AppResult<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<diesel::PgConnection>>,
    > {
        self.pool
            .get()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get connection: {}", e)))
    }

    fn entry_as_jsonb(entry: &ErrorEntry) -> AppResult<serde_json::Value> {
        // Concatenating an array appends its elements.
        Ok(serde_json::Value::Array(vec![serde_json::to_value(entry)?]))
    }
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn create(
        &self,
        owner: &str,
        kind: JobKind,
        parameters: JobParameters,
        total_items: i32,
    ) -> AppResult<ImportJob> {
        let new_job = NewImportJobModel {
            owner: owner.to_string(),
            job_kind: kind.to_string(),
            status: JobStatus::Pending,
            total_items,
            parameters: serde_json::to_value(&parameters)?,
            error_log: serde_json::Value::Array(Vec::new()),
        };

        let mut conn = self.get_conn()?;

        let inserted: ImportJobModel = diesel::insert_into(import_jobs::table)
            .values(&new_job)
            .returning(ImportJobModel::as_returning())
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to create job: {}", e)))?;

        inserted.to_job()
    }

    async fn claim(&self, job_id: Uuid) -> AppResult<ImportJob> {
        let mut conn = self.get_conn()?;

        let claimed: Option<ImportJobModel> = diesel::update(
            import_jobs::table
                .filter(import_jobs::id.eq(job_id))
                .filter(import_jobs::status.eq(JobStatus::Pending)),
        )
        .set((
            import_jobs::status.eq(JobStatus::Processing),
            import_jobs::updated_at.eq(diesel::dsl::now),
        ))
        .returning(ImportJobModel::as_returning())
        .get_result(&mut conn)
        .optional()
        .map_err(|e| AppError::DatabaseError(format!("Failed to claim job: {}", e)))?;

        match claimed {
            Some(model) => model.to_job(),
            None => {
                // Distinguish a missing job from one claimed elsewhere.
                let exists: i64 = import_jobs::table
                    .filter(import_jobs::id.eq(job_id))
                    .count()
                    .get_result(&mut conn)
                    .map_err(|e| AppError::DatabaseError(format!("Failed to check job: {}", e)))?;

                if exists > 0 {
                    Err(AppError::AlreadyClaimed(format!(
                        "Job {} is not pending",
                        job_id
                    )))
                } else {
                    Err(AppError::NotFound(format!("Job {} does not exist", job_id)))
                }
            }
        }
    }

    async fn record_item_outcome(&self, job_id: Uuid, outcome: &ItemOutcome) -> AppResult<bool> {
        let mut conn = self.get_conn()?;

        let affected = match outcome {
            ItemOutcome::Success { .. } | ItemOutcome::AlreadyExists { .. } => diesel::update(
                import_jobs::table
                    .filter(import_jobs::id.eq(job_id))
                    .filter(import_jobs::status.eq(JobStatus::Processing)),
            )
            .set((
                import_jobs::processed_items.eq(import_jobs::processed_items + 1),
                import_jobs::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to record outcome: {}", e)))?,

            ItemOutcome::Failure {
                external_id,
                message,
            } => {
                let entry =
                    Self::entry_as_jsonb(&ErrorEntry::for_item(*external_id, message.clone()))?;

                diesel::sql_query(
                    "UPDATE import_jobs
                     SET processed_items = processed_items + 1,
                         failed_items = failed_items + 1,
                         error_log = error_log || $2,
                         updated_at = NOW()
                     WHERE id = $1 AND status = 'processing'",
                )
                .bind::<diesel::sql_types::Uuid, _>(job_id)
                .bind::<diesel::sql_types::Jsonb, _>(entry)
                .execute(&mut conn)
                .map_err(|e| AppError::DatabaseError(format!("Failed to record failure: {}", e)))?
            }
        };

        Ok(affected > 0)
    }

    async fn finalize(&self, job_id: Uuid, final_total: i32) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::update(
            import_jobs::table
                .filter(import_jobs::id.eq(job_id))
                .filter(import_jobs::status.eq(JobStatus::Processing)),
        )
        .set((
            import_jobs::status.eq(JobStatus::Completed),
            import_jobs::total_items.eq(final_total),
            import_jobs::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to finalize job: {}", e)))?;

        Ok(())
    }

    async fn fail(&self, job_id: Uuid, message: &str) -> AppResult<()> {
        let entry = Self::entry_as_jsonb(&ErrorEntry::systemic(message))?;
        let mut conn = self.get_conn()?;

        diesel::sql_query(
            "UPDATE import_jobs
             SET status = 'failed',
                 error_log = error_log || $2,
                 updated_at = NOW()
             WHERE id = $1 AND status = 'processing'",
        )
        .bind::<diesel::sql_types::Uuid, _>(job_id)
        .bind::<diesel::sql_types::Jsonb, _>(entry)
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to mark job failed: {}", e)))?;

        Ok(())
    }

    async fn cancel(&self, job_id: Uuid) -> AppResult<bool> {
        let entry = Self::entry_as_jsonb(&ErrorEntry::systemic("cancelled by operator"))?;
        let mut conn = self.get_conn()?;

        let affected = diesel::sql_query(
            "UPDATE import_jobs
             SET status = 'failed',
                 error_log = error_log || $2,
                 updated_at = NOW()
             WHERE id = $1 AND status = 'processing'",
        )
        .bind::<diesel::sql_types::Uuid, _>(job_id)
        .bind::<diesel::sql_types::Jsonb, _>(entry)
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to cancel job: {}", e)))?;

        Ok(affected > 0)
    }

    async fn get(&self, job_id: Uuid) -> AppResult<Option<ImportJob>> {
        let mut conn = self.get_conn()?;

        let model: Option<ImportJobModel> = import_jobs::table
            .find(job_id)
            .select(ImportJobModel::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get job: {}", e)))?;

        model.map(|m| m.to_job()).transpose()
    }

    async fn list(
        &self,
        owner: Option<&str>,
        page: u32,
        limit: u32,
    ) -> AppResult<Vec<ImportJob>> {
        let mut conn = self.get_conn()?;
        let offset = page.saturating_sub(1) as i64 * limit as i64;

        let mut query = import_jobs::table
            .select(ImportJobModel::as_select())
            .order(import_jobs::created_at.desc())
            .offset(offset)
            .limit(limit as i64)
            .into_boxed();

        if let Some(owner) = owner {
            query = query.filter(import_jobs::owner.eq(owner.to_string()));
        }

        let models: Vec<ImportJobModel> = query
            .load(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to list jobs: {}", e)))?;

        models.into_iter().map(|m| m.to_job()).collect()
    }

    async fn has_active_of_kind(&self, kind: JobKind) -> AppResult<bool> {
        let mut conn = self.get_conn()?;

        let count: i64 = import_jobs::table
            .filter(import_jobs::job_kind.eq(kind.to_string()))
            .filter(import_jobs::status.eq_any([JobStatus::Pending, JobStatus::Processing]))
            .count()
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to count active jobs: {}", e)))?;

        Ok(count > 0)
    }

    async fn delete_old_finished(&self, days: i32) -> AppResult<usize> {
        let mut conn = self.get_conn()?;

        diesel::sql_query(
            "DELETE FROM import_jobs
             WHERE status IN ('completed', 'failed')
               AND updated_at < NOW() - INTERVAL '1 day' * $1",
        )
        .bind::<diesel::sql_types::Integer, _>(days)
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete old jobs: {}", e)))
    }
}
