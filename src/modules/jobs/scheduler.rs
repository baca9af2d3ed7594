/// Periodic import scheduler
///
/// On a fixed tokio interval, sweeps the provider's popularity lists for
/// each media kind and starts an auto-popular job per kind. A sweep for a
/// kind is skipped while a job of that kind is still active, so slow runs
/// never pile up. The same entry point also serves on-demand sweeps.
use crate::modules::jobs::application::service::{ImportJobService, ImportRequest};
use crate::modules::jobs::domain::entities::JobKind;
use crate::shared::config::SchedulerConfig;
use crate::shared::errors::AppError;
use crate::{log_debug, log_error, log_info, log_warn};
use std::sync::Arc;

const HOUSEKEEPING_RETENTION_DAYS: i32 = 30;

pub struct Scheduler {
    service: Arc<ImportJobService>,
    config: SchedulerConfig,
    is_running: Arc<tokio::sync::RwLock<bool>>,
    shutdown: tokio::sync::Notify,
}

impl Scheduler {
    pub fn new(service: Arc<ImportJobService>, config: SchedulerConfig) -> Self {
        Self {
            service,
            config,
            is_running: Arc::new(tokio::sync::RwLock::new(false)),
            shutdown: tokio::sync::Notify::new(),
        }
    }

    /// Run the periodic sweep loop. Call with tokio::spawn; returns when
    /// `stop` is called or the scheduler is disabled.
    pub async fn run(self: Arc<Self>) {
        if !self.config.enabled {
            log_info!("Scheduler disabled by configuration");
            return;
        }

        {
            let mut running = self.is_running.write().await;
            *running = true;
        }
        log_info!(
            "Scheduler started (interval {:?}, {} pages per sweep)",
            self.config.interval,
            self.config.pages_per_sweep
        );

        let mut interval = tokio::time::interval(self.config.interval);
        // The first tick fires immediately; that first sweep is wanted.
        loop {
            // A stop request must not wait out the rest of the interval.
            tokio::select! {
                _ = interval.tick() => {}
                _ = self.shutdown.notified() => {
                    log_info!("Scheduler stopped");
                    break;
                }
            }

            // Stop may also land while a sweep is in flight.
            {
                let running = self.is_running.read().await;
                if !*running {
                    log_info!("Scheduler stopped");
                    break;
                }
            }

            self.sweep().await;

            match self
                .service
                .delete_old_finished(HOUSEKEEPING_RETENTION_DAYS)
                .await
            {
                Ok(0) => {}
                Ok(deleted) => log_info!("Housekeeping removed {} old jobs", deleted),
                Err(e) => log_warn!("Housekeeping failed: {}", e),
            }
        }
    }

    pub async fn stop(&self) {
        {
            let mut running = self.is_running.write().await;
            *running = false;
        }
        // notify_one stores a permit, so a stop issued mid-sweep is not
        // lost before the loop gets back to waiting.
        self.shutdown.notify_one();
        log_info!("Scheduler stop requested");
    }

    /// One sweep: start an auto-popular job per kind, skipping kinds that
    /// still have an active job.
    pub async fn sweep(&self) {
        for kind in [JobKind::MovieBatch, JobKind::SeriesBatch] {
            self.sweep_kind(kind).await;
        }
    }

    async fn sweep_kind(&self, kind: JobKind) {
        match self.service.has_active_of_kind(kind).await {
            Ok(true) => {
                log_debug!("Skipping {} sweep, a job is still active", kind);
                return;
            }
            Ok(false) => {}
            Err(e) => {
                log_error!("Could not check active {} jobs: {}", kind, e);
                return;
            }
        }

        let request = ImportRequest::AutoPopular {
            pages: self.config.pages_per_sweep,
        };
        match self.service.start_import("scheduler", kind, request).await {
            Ok(job) => {
                log_info!(
                    "Scheduled {} job {} ({} items)",
                    kind,
                    job.id,
                    job.total_items
                );
            }
            // Lost a race with an on-demand trigger of the same kind.
            Err(AppError::AlreadyClaimed(_)) => {
                log_debug!("Skipping {} sweep, lost trigger race", kind);
            }
            Err(e) => log_error!("Failed to schedule {} sweep: {}", kind, e),
        }
    }
}
