/// Postgres-backed repository tests
///
/// These run against a live database (DATABASE_URL) with migrations
/// applied, so they are ignored by default:
///
///   cargo test -- --ignored
mod utils;

use cinefeed::modules::catalog::{CatalogRepository, CatalogRepositoryImpl, MediaType};
use cinefeed::modules::jobs::domain::entities::{ItemOutcome, JobKind, JobParameters, JobStatus};
use cinefeed::modules::jobs::domain::repository::JobRepository;
use cinefeed::modules::jobs::infrastructure::JobRepositoryImpl;
use cinefeed::shared::database::Database;
use cinefeed::shared::errors::AppError;
use utils::factories::seed_record;

fn test_database() -> Database {
    dotenvy::dotenv().ok();
    let database = Database::new().expect("DATABASE_URL must point at a test database");
    database.run_migrations().expect("migrations failed");
    database
}

#[tokio::test]
#[ignore]
async fn job_round_trip_claim_record_finalize() {
    let database = test_database();
    let repo = JobRepositoryImpl::new(database.pool());

    let job = repo
        .create(
            "pg-tests",
            JobKind::MovieBatch,
            JobParameters::explicit(vec![550, 603]),
            2,
        )
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Pending);

    let claimed = repo.claim(job.id).await.unwrap();
    assert_eq!(claimed.status, JobStatus::Processing);
    assert!(matches!(
        repo.claim(job.id).await.unwrap_err(),
        AppError::AlreadyClaimed(_)
    ));

    assert!(repo
        .record_item_outcome(job.id, &ItemOutcome::Success { external_id: 550 })
        .await
        .unwrap());
    assert!(repo
        .record_item_outcome(
            job.id,
            &ItemOutcome::Failure {
                external_id: 603,
                message: "upstream down".to_string()
            }
        )
        .await
        .unwrap());

    repo.finalize(job.id, 2).await.unwrap();

    let finished = repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(finished.status, JobStatus::Completed);
    assert_eq!(finished.processed_items, 2);
    assert_eq!(finished.failed_items, 1);
    assert_eq!(finished.error_log.len(), 1);
    assert_eq!(finished.error_log[0].external_id, Some(603));
}

#[tokio::test]
#[ignore]
async fn cancel_freezes_counts_and_drops_later_outcomes() {
    let database = test_database();
    let repo = JobRepositoryImpl::new(database.pool());

    let job = repo
        .create(
            "pg-tests",
            JobKind::SeriesBatch,
            JobParameters::explicit(vec![1, 2]),
            2,
        )
        .await
        .unwrap();
    repo.claim(job.id).await.unwrap();
    assert!(repo.cancel(job.id).await.unwrap());

    assert!(!repo
        .record_item_outcome(job.id, &ItemOutcome::Success { external_id: 1 })
        .await
        .unwrap());

    let cancelled = repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, JobStatus::Failed);
    assert_eq!(cancelled.processed_items, 0);
    assert!(!repo.cancel(job.id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn catalog_insert_is_atomic_on_the_dedup_key() {
    let database = test_database();
    let catalog = CatalogRepositoryImpl::new(database.pool());

    // Random-ish key to keep reruns independent.
    let external_id = (uuid::Uuid::new_v4().as_u128() % 1_000_000) as i32 + 1_000_000;
    let record = seed_record(external_id, MediaType::Movie);

    let id = catalog.insert(record.clone()).await.unwrap();
    assert!(catalog.get(id).await.unwrap().is_some());

    assert!(matches!(
        catalog.insert(record).await.unwrap_err(),
        AppError::DuplicateKey(_)
    ));
    assert!(catalog.exists(external_id, MediaType::Movie).await.unwrap());
    assert_eq!(
        catalog
            .filter_missing(&[external_id], MediaType::Movie)
            .await
            .unwrap(),
        Vec::<i32>::new()
    );
}
