/// Repository trait for the content catalog
///
/// The unique (external_id, media_type) constraint in the store is the
/// single arbiter of dedup: `exists` is advisory, `insert` is atomic
/// insert-or-reject and a lost race surfaces as `DuplicateKey`.
use crate::modules::catalog::domain::entities::{ContentRecord, MediaType, NewContentRecord};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Advisory pre-check; never trusted at insert time.
    async fn exists(&self, external_id: i32, media_type: MediaType) -> AppResult<bool>;

    /// Atomic check-then-insert. Returns the new record id, or
    /// `AppError::DuplicateKey` when the key is already taken.
    async fn insert(&self, record: NewContentRecord) -> AppResult<Uuid>;

    async fn get(&self, record_id: Uuid) -> AppResult<Option<ContentRecord>>;

    /// Of the given external IDs, return those not yet in the catalog,
    /// preserving input order. Used by the scheduler pre-filter.
    async fn filter_missing(
        &self,
        external_ids: &[i32],
        media_type: MediaType,
    ) -> AppResult<Vec<i32>>;

    /// Number of stored records for one media type.
    async fn count(&self, media_type: MediaType) -> AppResult<i64>;
}
