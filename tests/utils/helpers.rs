/// Shared pipeline wiring for integration tests
use super::fakes::{FakeProvider, InMemoryCatalog, InMemoryJobRepository};
use cinefeed::modules::jobs::application::service::ImportJobService;
use cinefeed::modules::jobs::domain::entities::{ImportJob, JobKind, JobParameters};
use cinefeed::modules::jobs::domain::repository::JobRepository;
use cinefeed::modules::jobs::worker::ImportWorker;
use cinefeed::shared::config::SchedulerConfig;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct TestPipeline {
    pub jobs: Arc<InMemoryJobRepository>,
    pub catalog: Arc<InMemoryCatalog>,
    pub provider: Arc<FakeProvider>,
    pub service: Arc<ImportJobService>,
}

pub fn scheduler_config() -> SchedulerConfig {
    SchedulerConfig {
        enabled: true,
        interval: Duration::from_secs(3600),
        pages_per_sweep: 1,
        max_items_per_run: 40,
    }
}

pub fn build_pipeline() -> TestPipeline {
    build_pipeline_with_config(scheduler_config())
}

pub fn build_pipeline_with_config(config: SchedulerConfig) -> TestPipeline {
    let jobs = Arc::new(InMemoryJobRepository::new());
    let catalog = Arc::new(InMemoryCatalog::new());
    let provider = Arc::new(FakeProvider::new());

    let service = Arc::new(ImportJobService::new(
        jobs.clone(),
        catalog.clone(),
        provider.clone(),
        &config,
    ));

    TestPipeline {
        jobs,
        catalog,
        provider,
        service,
    }
}

pub fn worker(pipeline: &TestPipeline) -> ImportWorker {
    ImportWorker::new(
        pipeline.jobs.clone(),
        pipeline.catalog.clone(),
        pipeline.provider.clone(),
    )
}

/// Create a pending explicit-ID job directly on the tracker.
pub async fn create_explicit_job(
    pipeline: &TestPipeline,
    kind: JobKind,
    external_ids: Vec<i32>,
) -> ImportJob {
    let total = external_ids.len() as i32;
    pipeline
        .jobs
        .create(
            "tests",
            kind,
            JobParameters::explicit(external_ids),
            total,
        )
        .await
        .expect("job creation failed")
}

/// Poll the tracker until the job reaches a terminal state.
pub async fn wait_for_terminal(pipeline: &TestPipeline, job_id: Uuid) -> ImportJob {
    for _ in 0..200 {
        if let Some(job) = pipeline.jobs.get(job_id).await.expect("tracker read failed") {
            if job.is_terminal() {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never reached a terminal state", job_id);
}
