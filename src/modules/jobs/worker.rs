/// Import worker: drives one claimed job to a terminal state
///
/// Items are processed strictly in input order with no fan-out. An error on
/// one item is recorded in the job's error log and the batch continues; only
/// a systemic store or tracker error aborts the whole job. Cancellation is
/// cooperative: the job row is re-read between items, so at most one extra
/// provider call can complete after a cancel lands.
use crate::modules::catalog::{CatalogRepository, MediaType};
use crate::modules::jobs::domain::entities::{ImportJob, ItemOutcome, JobStatus};
use crate::modules::jobs::domain::repository::JobRepository;
use crate::modules::provider::tmdb::mapper;
use crate::modules::provider::MetadataProvider;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_error, log_info, log_warn};
use std::sync::Arc;
use uuid::Uuid;

pub struct ImportWorker {
    job_repository: Arc<dyn JobRepository>,
    catalog: Arc<dyn CatalogRepository>,
    provider: Arc<dyn MetadataProvider>,
}

impl ImportWorker {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        catalog: Arc<dyn CatalogRepository>,
        provider: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            job_repository,
            catalog,
            provider,
        }
    }

    /// Claim the job and process its batch to completion. Returns the final
    /// job state as read back from the tracker.
    pub async fn run(&self, job_id: Uuid) -> AppResult<ImportJob> {
        let job = self.job_repository.claim(job_id).await?;
        let media_type = job.kind.media_type();
        let external_ids = job.parameters.external_ids.clone();

        log_info!(
            "Job {} started: {} {} items",
            job.id,
            external_ids.len(),
            media_type
        );

        for (index, external_id) in external_ids.iter().copied().enumerate() {
            // Cooperative cancellation check between items.
            match self.job_repository.get(job_id).await? {
                Some(current) if current.status == JobStatus::Processing => {}
                Some(current) => {
                    log_warn!(
                        "Job {} left processing (now {}), stopping after {} items",
                        job_id,
                        current.status,
                        index
                    );
                    return Ok(current);
                }
                None => {
                    return Err(AppError::NotFound(format!(
                        "Job {} disappeared mid-run",
                        job_id
                    )))
                }
            }

            let outcome = match self.import_one(job_id, external_id, media_type).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    // Systemic failure: abort the batch.
                    log_error!("Job {} aborted on item {}: {}", job_id, external_id, e);
                    self.job_repository
                        .fail(job_id, &format!("aborted on item {}: {}", external_id, e))
                        .await?;
                    return self.final_state(job_id).await;
                }
            };

            if let ItemOutcome::Failure { message, .. } = &outcome {
                log_warn!("Job {} item {} failed: {}", job_id, external_id, message);
            }

            let applied = self
                .job_repository
                .record_item_outcome(job_id, &outcome)
                .await?;
            if !applied {
                // The job was cancelled or failed under us; the outcome is
                // deliberately dropped.
                log_warn!("Job {} no longer accepts outcomes, stopping", job_id);
                return self.final_state(job_id).await;
            }
        }

        self.job_repository
            .finalize(job_id, external_ids.len() as i32)
            .await?;
        log_info!("Job {} finished", job_id);

        self.final_state(job_id).await
    }

    /// Import a single item. Item-scoped errors become a `Failure` outcome;
    /// only systemic errors (store, tracker) propagate as `Err`.
    async fn import_one(
        &self,
        job_id: Uuid,
        external_id: i32,
        media_type: MediaType,
    ) -> AppResult<ItemOutcome> {
        if self.catalog.exists(external_id, media_type).await? {
            log_debug!("{} {} already in catalog", media_type, external_id);
            return Ok(ItemOutcome::AlreadyExists { external_id });
        }

        let details = match self.provider.fetch_details(external_id, media_type).await {
            Ok(details) => details,
            Err(e) if e.is_item_scoped() => {
                return Ok(ItemOutcome::Failure {
                    external_id,
                    message: e.to_string(),
                })
            }
            Err(e) => return Err(e),
        };

        // Enrichment is best-effort: a missing trailer or summary never
        // fails the item.
        let trailer_url = match mapper::find_trailer(&details) {
            Some(url) => Some(url),
            None => self
                .provider
                .search_trailer(media_type, &details.title, details.release_year())
                .await
                .unwrap_or(None),
        };
        let summary = self.provider.fetch_summary(&details.title).await;

        let record = details.into_record(trailer_url, summary, Some(job_id));
        match self.catalog.insert(record).await {
            Ok(_) => Ok(ItemOutcome::Success { external_id }),
            // Lost the insert race; the record exists, which is fine.
            Err(AppError::DuplicateKey(_)) => Ok(ItemOutcome::AlreadyExists { external_id }),
            Err(e) => Err(e),
        }
    }

    async fn final_state(&self, job_id: Uuid) -> AppResult<ImportJob> {
        self.job_repository
            .get(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {} does not exist", job_id)))
    }
}
