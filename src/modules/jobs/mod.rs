/// Import job module
///
/// Persistent tracking of batch imports plus the worker that drives them
/// and the scheduler that triggers them periodically.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod scheduler;
pub mod worker;

pub use application::{ImportJobService, ImportRequest};
pub use domain::{ErrorEntry, ImportJob, ItemOutcome, JobKind, JobParameters, JobRepository, JobStatus};
pub use infrastructure::JobRepositoryImpl;
pub use scheduler::Scheduler;
pub use worker::ImportWorker;
