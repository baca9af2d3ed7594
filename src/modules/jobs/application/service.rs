/// Orchestration facade for the import pipeline
///
/// The HTTP layer and the scheduler both go through this service: it
/// validates a request, resolves auto-popular ID lists, creates the job
/// row, and spawns a worker task to drive it. Status, cancel and list are
/// thin proxies over the tracker.
use crate::modules::catalog::CatalogRepository;
use crate::modules::jobs::domain::entities::{ImportJob, JobKind, JobParameters};
use crate::modules::jobs::domain::repository::JobRepository;
use crate::modules::jobs::worker::ImportWorker;
use crate::modules::provider::MetadataProvider;
use crate::shared::config::SchedulerConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_error, log_info};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// What a caller wants imported.
#[derive(Debug, Clone)]
pub enum ImportRequest {
    /// Explicit provider IDs, imported in the given order.
    Explicit(Vec<i32>),
    /// Enumerate the provider's popularity list over the first N pages.
    AutoPopular { pages: u32 },
}

pub struct ImportJobService {
    job_repository: Arc<dyn JobRepository>,
    catalog: Arc<dyn CatalogRepository>,
    provider: Arc<dyn MetadataProvider>,
    max_items_per_run: usize,
}

impl ImportJobService {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        catalog: Arc<dyn CatalogRepository>,
        provider: Arc<dyn MetadataProvider>,
        scheduler_config: &SchedulerConfig,
    ) -> Self {
        Self {
            job_repository,
            catalog,
            provider,
            max_items_per_run: scheduler_config.max_items_per_run,
        }
    }

    /// Create a job for the request and spawn a worker to run it. Refuses
    /// to overlap with an active job of the same kind.
    pub async fn start_import(
        &self,
        owner: &str,
        kind: JobKind,
        request: ImportRequest,
    ) -> AppResult<ImportJob> {
        if self.job_repository.has_active_of_kind(kind).await? {
            return Err(AppError::AlreadyClaimed(format!(
                "A {} job is already active",
                kind
            )));
        }

        let (external_ids, parameters) = match request {
            ImportRequest::Explicit(ids) => {
                if ids.is_empty() {
                    return Err(AppError::ValidationError(
                        "Explicit import requires at least one ID".to_string(),
                    ));
                }
                let ids = dedupe_preserving_order(ids);
                let parameters = JobParameters::explicit(ids.clone());
                (ids, parameters)
            }
            ImportRequest::AutoPopular { pages } => {
                if pages == 0 {
                    return Err(AppError::ValidationError(
                        "Auto-popular import requires at least one page".to_string(),
                    ));
                }
                let ids = self.resolve_popular_ids(kind, pages).await?;
                let mut parameters = JobParameters::auto_popular(pages);
                parameters.external_ids = ids.clone();
                (ids, parameters)
            }
        };

        let job = self
            .job_repository
            .create(owner, kind, parameters, external_ids.len() as i32)
            .await?;

        log_info!(
            "Created {} job {} for {} ({} items)",
            kind,
            job.id,
            owner,
            job.total_items
        );

        self.spawn_worker(job.id);
        Ok(job)
    }

    /// Enumerate popularity pages, dedupe, drop what the catalog already
    /// has, and cap the run. The resulting list is frozen into the job so
    /// progress is meaningful from the first item.
    async fn resolve_popular_ids(&self, kind: JobKind, pages: u32) -> AppResult<Vec<i32>> {
        let media_type = kind.media_type();
        let mut candidates = Vec::new();

        for page in 1..=pages {
            let items = self.provider.fetch_popular(media_type, page).await?;
            candidates.extend(items.into_iter().map(|item| item.external_id));
        }

        let candidates = dedupe_preserving_order(candidates);
        let mut missing = self.catalog.filter_missing(&candidates, media_type).await?;
        missing.truncate(self.max_items_per_run);
        Ok(missing)
    }

    fn spawn_worker(&self, job_id: Uuid) {
        let worker = ImportWorker::new(
            self.job_repository.clone(),
            self.catalog.clone(),
            self.provider.clone(),
        );

        tokio::spawn(async move {
            if let Err(e) = worker.run(job_id).await {
                log_error!("Worker for job {} failed: {}", job_id, e);
            }
        });
    }

    pub async fn get_job(&self, job_id: Uuid) -> AppResult<Option<ImportJob>> {
        self.job_repository.get(job_id).await
    }

    /// Cancel a processing job. A job that is missing or no longer
    /// cancellable yields `Cancelled`; the HTTP layer renders both as a
    /// 404 so terminal jobs cannot be told apart from unknown ones.
    pub async fn cancel_job(&self, job_id: Uuid) -> AppResult<()> {
        if self.job_repository.cancel(job_id).await? {
            log_info!("Job {} cancelled", job_id);
            Ok(())
        } else {
            Err(AppError::Cancelled(format!(
                "Job {} not found or not cancellable",
                job_id
            )))
        }
    }

    pub async fn list_jobs(
        &self,
        owner: Option<&str>,
        page: u32,
        limit: u32,
    ) -> AppResult<Vec<ImportJob>> {
        self.job_repository.list(owner, page, limit).await
    }

    pub async fn has_active_of_kind(&self, kind: JobKind) -> AppResult<bool> {
        self.job_repository.has_active_of_kind(kind).await
    }

    pub async fn delete_old_finished(&self, days: i32) -> AppResult<usize> {
        self.job_repository.delete_old_finished(days).await
    }
}

fn dedupe_preserving_order(ids: Vec<i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        assert_eq!(
            dedupe_preserving_order(vec![3, 1, 3, 2, 1]),
            vec![3, 1, 2]
        );
        assert_eq!(dedupe_preserving_order(Vec::new()), Vec::<i32>::new());
    }
}
