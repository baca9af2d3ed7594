//! TMDB API client
//!
//! Read-through cached, rate-limited access to the TMDB v3 API. Popularity
//! pages and details go through the full retry schedule; the trailer search
//! fallback is best-effort with a single attempt.

use crate::modules::catalog::MediaType;
use crate::modules::provider::cache::{RequestSignature, ResponseCache};
use crate::modules::provider::http_client::RateLimitClient;
use crate::modules::provider::tmdb::mapper;
use crate::modules::provider::tmdb::models::{DetailsResponse, ListResponse, VideosResponse};
use crate::modules::provider::types::{PopularItem, TitleDetails};
use crate::shared::config::ProviderConfig;
use crate::shared::errors::AppResult;
use crate::{log_debug, log_warn};
use std::sync::Arc;

pub struct TmdbClient {
    http: RateLimitClient,
    cache: Arc<ResponseCache>,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(config: &ProviderConfig, cache: Arc<ResponseCache>) -> AppResult<Self> {
        Ok(Self {
            http: RateLimitClient::for_tmdb(config.request_timeout)?,
            cache,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn media_path(media_type: MediaType) -> &'static str {
        match media_type {
            MediaType::Movie => "movie",
            MediaType::Series => "tv",
        }
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}?api_key={}", self.base_url, path, self.api_key);
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// One page of the popularity listing for a media type.
    pub async fn fetch_popular(
        &self,
        media_type: MediaType,
        page: u32,
    ) -> AppResult<Vec<PopularItem>> {
        let signature = RequestSignature::Popular { media_type, page };

        let response: ListResponse = match self.cache.get(&signature) {
            Some(cached) => cached,
            None => {
                let page_param = page.to_string();
                let url = self.build_url(
                    &format!("/{}/popular", Self::media_path(media_type)),
                    &[("page", page_param.as_str())],
                );
                let fetched: ListResponse = self.http.get(&url).await?;
                self.cache.put(signature, &fetched);
                fetched
            }
        };

        let items: Vec<PopularItem> = response
            .results
            .into_iter()
            .filter_map(|item| mapper::map_list_item(item, media_type))
            .collect();

        log_debug!(
            "Popular {} page {} yielded {} items",
            media_type,
            page,
            items.len()
        );
        Ok(items)
    }

    /// Full details for one title, with its video list appended so the
    /// common case needs a single request.
    pub async fn fetch_details(
        &self,
        external_id: i32,
        media_type: MediaType,
    ) -> AppResult<TitleDetails> {
        let signature = RequestSignature::Details {
            media_type,
            external_id,
        };

        let response: DetailsResponse = match self.cache.get(&signature) {
            Some(cached) => cached,
            None => {
                let url = self.build_url(
                    &format!("/{}/{}", Self::media_path(media_type), external_id),
                    &[("append_to_response", "videos")],
                );
                let fetched: DetailsResponse = self.http.get(&url).await?;
                self.cache.put(signature, &fetched);
                fetched
            }
        };

        Ok(mapper::map_details(response, media_type))
    }

    /// Best-effort trailer search for titles whose embedded video list had
    /// no trailer: search by title (and year when known), then read the
    /// first hit's videos. Any failure yields `Ok(None)`.
    pub async fn search_trailer(
        &self,
        media_type: MediaType,
        title: &str,
        year: Option<i32>,
    ) -> AppResult<Option<String>> {
        let signature = RequestSignature::TrailerSearch {
            media_type,
            title: title.to_string(),
            year,
        };
        if let Some(cached) = self.cache.get::<Option<String>>(&signature) {
            return Ok(cached);
        }

        let result = self.search_trailer_uncached(media_type, title, year).await;
        match result {
            Ok(trailer) => {
                self.cache.put(signature, &trailer);
                Ok(trailer)
            }
            Err(e) => {
                log_warn!("Trailer search for '{}' failed: {}", title, e);
                Ok(None)
            }
        }
    }

    async fn search_trailer_uncached(
        &self,
        media_type: MediaType,
        title: &str,
        year: Option<i32>,
    ) -> AppResult<Option<String>> {
        let year_param = year.map(|y| y.to_string());
        let mut params: Vec<(&str, &str)> = vec![("query", title)];
        if let Some(ref y) = year_param {
            let key = match media_type {
                MediaType::Movie => "year",
                MediaType::Series => "first_air_date_year",
            };
            params.push((key, y.as_str()));
        }

        let search_url =
            self.build_url(&format!("/search/{}", Self::media_path(media_type)), &params);
        let search: ListResponse = self.http.get_once(&search_url).await?;

        let hit = match search.results.first() {
            Some(hit) => hit.id,
            None => return Ok(None),
        };

        let videos_url = self.build_url(
            &format!("/{}/{}/videos", Self::media_path(media_type), hit),
            &[],
        );
        let videos: VideosResponse = self.http.get_once(&videos_url).await?;

        Ok(videos
            .results
            .into_iter()
            .find(|v| {
                v.r#type.as_deref() == Some("Trailer") && v.site.as_deref() == Some("YouTube")
            })
            .and_then(|v| v.key)
            .map(|key| mapper::youtube_url(&key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::CacheConfig;
    use std::time::Duration;

    fn test_client() -> TmdbClient {
        let config = ProviderConfig {
            api_key: "test-key".to_string(),
            base_url: "https://api.themoviedb.org/3/".to_string(),
            wiki_base_url: "https://en.wikipedia.org/api/rest_v1".to_string(),
            request_timeout: Duration::from_secs(30),
        };
        TmdbClient::new(&config, Arc::new(ResponseCache::new(CacheConfig::default()))).unwrap()
    }

    #[test]
    fn urls_carry_key_and_encoded_params() {
        let client = test_client();
        let url = client.build_url("/search/movie", &[("query", "Blade Runner 2049")]);

        // Trailing slash on the base URL must not double up.
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/search/movie?api_key=test-key&query=Blade%20Runner%202049"
        );
    }

    #[test]
    fn media_paths_match_tmdb_routes() {
        assert_eq!(TmdbClient::media_path(MediaType::Movie), "movie");
        assert_eq!(TmdbClient::media_path(MediaType::Series), "tv");
    }
}
