//! cinefeed: movie and TV metadata import service.
//!
//! Periodically (or on demand) pulls popularity lists and per-title details
//! from a TMDB-style provider, deduplicates against a Postgres-backed
//! catalog, and tracks every batch as a persisted import job with per-item
//! outcomes behind a small polling HTTP API.

pub mod api;
pub mod modules;
pub mod schema;
pub mod shared;

use crate::modules::catalog::CatalogRepositoryImpl;
use crate::modules::jobs::application::service::ImportJobService;
use crate::modules::jobs::infrastructure::JobRepositoryImpl;
use crate::modules::jobs::scheduler::Scheduler;
use crate::modules::provider::ProviderService;
use crate::shared::config::AppConfig;
use crate::shared::database::DbPool;
use crate::shared::errors::AppResult;
use std::sync::Arc;

/// Fully wired service graph, shared by the binary and integration tests.
pub struct AppServices {
    pub jobs: Arc<ImportJobService>,
    pub scheduler: Arc<Scheduler>,
}

impl AppServices {
    pub fn build(config: &AppConfig, pool: DbPool) -> AppResult<Self> {
        let job_repository = Arc::new(JobRepositoryImpl::new(pool.clone()));
        let catalog = Arc::new(CatalogRepositoryImpl::new(pool));
        let provider = Arc::new(ProviderService::new(
            &config.provider,
            config.cache.clone(),
        )?);

        let jobs = Arc::new(ImportJobService::new(
            job_repository,
            catalog,
            provider,
            &config.scheduler,
        ));
        let scheduler = Arc::new(Scheduler::new(jobs.clone(), config.scheduler.clone()));

        Ok(Self { jobs, scheduler })
    }
}
