/// Provider client trait
///
/// The seam between the import pipeline and the outside world. The worker
/// and scheduler only ever see this trait; tests script it with a fake.
use crate::modules::catalog::MediaType;
use crate::modules::provider::types::{PopularItem, TitleDetails};
use crate::shared::errors::AppResult;
use async_trait::async_trait;

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch one page of the popularity list for a media type.
    /// Cached with a short TTL; exhausted retries surface
    /// `ProviderUnavailable`.
    async fn fetch_popular(&self, media_type: MediaType, page: u32)
        -> AppResult<Vec<PopularItem>>;

    /// Fetch full details for one title, including its embedded video
    /// list. `NotFound` means the ID does not exist upstream.
    async fn fetch_details(
        &self,
        external_id: i32,
        media_type: MediaType,
    ) -> AppResult<TitleDetails>;

    /// Best-effort trailer lookup by title and year, used when the
    /// embedded video list has no trailer. Single attempt, long-TTL cache.
    async fn search_trailer(
        &self,
        media_type: MediaType,
        title: &str,
        year: Option<i32>,
    ) -> AppResult<Option<String>>;

    /// Optional plot summary from a secondary encyclopedic source.
    /// Failure is silent: any problem just yields `None`.
    async fn fetch_summary(&self, title: &str) -> Option<String>;
}
