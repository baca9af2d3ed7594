pub mod entities;
pub mod repository;

pub use entities::{ErrorEntry, ImportJob, ItemOutcome, JobKind, JobParameters, JobStatus};
pub use repository::JobRepository;
