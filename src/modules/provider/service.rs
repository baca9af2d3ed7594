//! Composite provider facade
//!
//! Binds the TMDB and Wikipedia clients behind the single `MetadataProvider`
//! seam the pipeline consumes.

use crate::modules::catalog::MediaType;
use crate::modules::provider::cache::ResponseCache;
use crate::modules::provider::tmdb::TmdbClient;
use crate::modules::provider::traits::MetadataProvider;
use crate::modules::provider::types::{PopularItem, TitleDetails};
use crate::modules::provider::wiki::WikiClient;
use crate::shared::config::{CacheConfig, ProviderConfig};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use std::sync::Arc;

pub struct ProviderService {
    tmdb: TmdbClient,
    wiki: WikiClient,
    cache: Arc<ResponseCache>,
}

impl ProviderService {
    pub fn new(provider: &ProviderConfig, cache_config: CacheConfig) -> AppResult<Self> {
        let cache = Arc::new(ResponseCache::new(cache_config));
        Ok(Self {
            tmdb: TmdbClient::new(provider, cache.clone())?,
            wiki: WikiClient::new(provider, cache.clone())?,
            cache,
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

#[async_trait]
impl MetadataProvider for ProviderService {
    async fn fetch_popular(
        &self,
        media_type: MediaType,
        page: u32,
    ) -> AppResult<Vec<PopularItem>> {
        self.tmdb.fetch_popular(media_type, page).await
    }

    async fn fetch_details(
        &self,
        external_id: i32,
        media_type: MediaType,
    ) -> AppResult<TitleDetails> {
        self.tmdb.fetch_details(external_id, media_type).await
    }

    async fn search_trailer(
        &self,
        media_type: MediaType,
        title: &str,
        year: Option<i32>,
    ) -> AppResult<Option<String>> {
        self.tmdb.search_trailer(media_type, title, year).await
    }

    async fn fetch_summary(&self, title: &str) -> Option<String> {
        self.wiki.fetch_summary(title).await
    }
}
