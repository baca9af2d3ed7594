/// In-memory test doubles for the pipeline seams
///
/// The fakes reproduce the contracts the real implementations provide:
/// guarded job transitions with write-once terminal states, atomic
/// insert-or-reject dedup, and a scriptable provider with call counters.
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use cinefeed::modules::catalog::{
    CatalogRepository, ContentRecord, MediaType, NewContentRecord,
};
use cinefeed::modules::jobs::domain::entities::{
    ErrorEntry, ImportJob, ItemOutcome, JobKind, JobParameters, JobStatus,
};
use cinefeed::modules::jobs::domain::repository::JobRepository;
use cinefeed::modules::provider::{MetadataProvider, PopularItem, TitleDetails};
use cinefeed::shared::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ------------------------------------------------------------------
// Job tracker fake
// ------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<HashMap<Uuid, ImportJob>>,
    order: Mutex<Vec<Uuid>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(
        &self,
        owner: &str,
        kind: JobKind,
        parameters: JobParameters,
        total_items: i32,
    ) -> AppResult<ImportJob> {
        let job = ImportJob {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            kind,
            status: JobStatus::Pending,
            total_items,
            processed_items: 0,
            failed_items: 0,
            parameters,
            error_log: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        self.jobs.lock().unwrap().insert(job.id, job.clone());
        self.order.lock().unwrap().push(job.id);
        Ok(job)
    }

    async fn claim(&self, job_id: Uuid) -> AppResult<ImportJob> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(&job_id)
            .ok_or_else(|| AppError::NotFound(format!("Job {} does not exist", job_id)))?;

        if job.status != JobStatus::Pending {
            return Err(AppError::AlreadyClaimed(format!(
                "Job {} is not pending",
                job_id
            )));
        }

        job.status = JobStatus::Processing;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn record_item_outcome(&self, job_id: Uuid, outcome: &ItemOutcome) -> AppResult<bool> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = match jobs.get_mut(&job_id) {
            Some(job) => job,
            None => return Ok(false),
        };

        if job.status != JobStatus::Processing {
            return Ok(false);
        }

        job.processed_items += 1;
        if let ItemOutcome::Failure {
            external_id,
            message,
        } = outcome
        {
            job.failed_items += 1;
            job.error_log
                .push(ErrorEntry::for_item(*external_id, message.clone()));
        }
        job.updated_at = Utc::now();
        Ok(true)
    }

    async fn finalize(&self, job_id: Uuid, final_total: i32) -> AppResult<()> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.get_mut(&job_id) {
            if job.status == JobStatus::Processing {
                job.status = JobStatus::Completed;
                job.total_items = final_total;
                job.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn fail(&self, job_id: Uuid, message: &str) -> AppResult<()> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.get_mut(&job_id) {
            if job.status == JobStatus::Processing {
                job.status = JobStatus::Failed;
                job.error_log.push(ErrorEntry::systemic(message));
                job.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn cancel(&self, job_id: Uuid) -> AppResult<bool> {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.get_mut(&job_id) {
            Some(job) if job.status == JobStatus::Processing => {
                job.status = JobStatus::Failed;
                job.error_log.push(ErrorEntry::systemic("cancelled by operator"));
                job.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get(&self, job_id: Uuid) -> AppResult<Option<ImportJob>> {
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }

    async fn list(
        &self,
        owner: Option<&str>,
        page: u32,
        limit: u32,
    ) -> AppResult<Vec<ImportJob>> {
        let jobs = self.jobs.lock().unwrap();
        let order = self.order.lock().unwrap();

        let offset = (page.saturating_sub(1) * limit) as usize;
        Ok(order
            .iter()
            .rev()
            .filter_map(|id| jobs.get(id))
            .filter(|job| owner.map(|o| job.owner == o).unwrap_or(true))
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn has_active_of_kind(&self, kind: JobKind) -> AppResult<bool> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .values()
            .any(|job| job.kind == kind && !job.is_terminal()))
    }

    async fn delete_old_finished(&self, days: i32) -> AppResult<usize> {
        let cutoff = Utc::now() - ChronoDuration::days(days as i64);
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|_, job| !(job.is_terminal() && job.updated_at < cutoff));
        Ok(before - jobs.len())
    }
}

// ------------------------------------------------------------------
// Catalog fake
// ------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryCatalog {
    records: Mutex<HashMap<(i32, MediaType), ContentRecord>>,
    fail_inserts: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert fail with a database error, to
    /// exercise the systemic-abort path.
    pub fn break_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn seed(&self, record: NewContentRecord) {
        let key = (record.external_id, record.media_type);
        self.records
            .lock()
            .unwrap()
            .insert(key, materialize(record));
    }

    pub fn record_for(&self, external_id: i32, media_type: MediaType) -> Option<ContentRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&(external_id, media_type))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

fn materialize(record: NewContentRecord) -> ContentRecord {
    ContentRecord {
        id: Uuid::new_v4(),
        external_id: record.external_id,
        media_type: record.media_type,
        title: record.title,
        release_date: record.release_date,
        overview: record.overview,
        poster_url: record.poster_url,
        backdrop_url: record.backdrop_url,
        rating: record.rating,
        genres: record.genres,
        runtime_minutes: record.runtime_minutes,
        season_count: record.season_count,
        episode_count: record.episode_count,
        trailer_url: record.trailer_url,
        summary: record.summary,
        created_by_job: record.created_by_job,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn exists(&self, external_id: i32, media_type: MediaType) -> AppResult<bool> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .contains_key(&(external_id, media_type)))
    }

    async fn insert(&self, record: NewContentRecord) -> AppResult<Uuid> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("insert failed".to_string()));
        }

        let key = (record.external_id, record.media_type);
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&key) {
            return Err(AppError::DuplicateKey(format!(
                "Record already exists for {} {}",
                record.media_type, record.external_id
            )));
        }

        let stored = materialize(record);
        let id = stored.id;
        records.insert(key, stored);
        Ok(id)
    }

    async fn get(&self, record_id: Uuid) -> AppResult<Option<ContentRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|r| r.id == record_id)
            .cloned())
    }

    async fn filter_missing(
        &self,
        external_ids: &[i32],
        media_type: MediaType,
    ) -> AppResult<Vec<i32>> {
        let records = self.records.lock().unwrap();
        Ok(external_ids
            .iter()
            .copied()
            .filter(|id| !records.contains_key(&(*id, media_type)))
            .collect())
    }

    async fn count(&self, media_type: MediaType) -> AppResult<i64> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .keys()
            .filter(|(_, mt)| *mt == media_type)
            .count() as i64)
    }
}

// ------------------------------------------------------------------
// Provider fake
// ------------------------------------------------------------------

struct CancelTrigger {
    after_detail_calls: usize,
    repository: Arc<dyn JobRepository>,
    job_id: Uuid,
}

/// Scripted provider: per-ID details or errors, per-page popularity lists,
/// optional summaries and trailers, plus call counters. `cancel_job_after`
/// lets a test cancel a job deterministically mid-batch, from inside the
/// Nth detail fetch.
#[derive(Default)]
pub struct FakeProvider {
    popular: Mutex<HashMap<(MediaType, u32), Vec<PopularItem>>>,
    details: Mutex<HashMap<i32, TitleDetails>>,
    detail_errors: Mutex<HashMap<i32, AppError>>,
    trailers: Mutex<HashMap<String, String>>,
    summaries: Mutex<HashMap<String, String>>,
    cancel_trigger: Mutex<Option<CancelTrigger>>,
    detail_calls: AtomicUsize,
    popular_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_popular(&self, media_type: MediaType, page: u32, items: Vec<PopularItem>) {
        self.popular
            .lock()
            .unwrap()
            .insert((media_type, page), items);
    }

    pub fn script_details(&self, details: TitleDetails) {
        self.details
            .lock()
            .unwrap()
            .insert(details.external_id, details);
    }

    pub fn script_detail_error(&self, external_id: i32, error: AppError) {
        self.detail_errors
            .lock()
            .unwrap()
            .insert(external_id, error);
    }

    pub fn script_trailer(&self, title: &str, url: &str) {
        self.trailers
            .lock()
            .unwrap()
            .insert(title.to_string(), url.to_string());
    }

    pub fn script_summary(&self, title: &str, summary: &str) {
        self.summaries
            .lock()
            .unwrap()
            .insert(title.to_string(), summary.to_string());
    }

    pub fn cancel_job_after(
        &self,
        detail_calls: usize,
        repository: Arc<dyn JobRepository>,
        job_id: Uuid,
    ) {
        *self.cancel_trigger.lock().unwrap() = Some(CancelTrigger {
            after_detail_calls: detail_calls,
            repository,
            job_id,
        });
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn popular_calls(&self) -> usize {
        self.popular_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for FakeProvider {
    async fn fetch_popular(
        &self,
        media_type: MediaType,
        page: u32,
    ) -> AppResult<Vec<PopularItem>> {
        self.popular_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .popular
            .lock()
            .unwrap()
            .get(&(media_type, page))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_details(
        &self,
        external_id: i32,
        media_type: MediaType,
    ) -> AppResult<TitleDetails> {
        let calls = self.detail_calls.fetch_add(1, Ordering::SeqCst) + 1;

        let trigger = {
            let mut guard = self.cancel_trigger.lock().unwrap();
            match guard.as_ref() {
                Some(t) if t.after_detail_calls == calls => guard.take(),
                _ => None,
            }
        };
        if let Some(trigger) = trigger {
            trigger
                .repository
                .cancel(trigger.job_id)
                .await
                .expect("cancel trigger failed");
        }

        if let Some(error) = self.detail_errors.lock().unwrap().get(&external_id) {
            return Err(error.clone());
        }

        self.details
            .lock()
            .unwrap()
            .get(&external_id)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!("{} {} not scripted", media_type, external_id))
            })
    }

    async fn search_trailer(
        &self,
        _media_type: MediaType,
        title: &str,
        _year: Option<i32>,
    ) -> AppResult<Option<String>> {
        Ok(self.trailers.lock().unwrap().get(title).cloned())
    }

    async fn fetch_summary(&self, title: &str) -> Option<String> {
        self.summaries.lock().unwrap().get(title).cloned()
    }
}
