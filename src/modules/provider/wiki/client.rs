//! Wikipedia summary client
//!
//! Optional enrichment source. Everything here is best-effort: a missing
//! page, a timeout, or a parse failure just means no summary on the record.

use crate::modules::provider::cache::{RequestSignature, ResponseCache};
use crate::modules::provider::http_client::RateLimitClient;
use crate::shared::config::ProviderConfig;
use crate::shared::errors::AppResult;
use crate::log_debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WikiSummary {
    #[serde(default)]
    extract: Option<String>,
}

pub struct WikiClient {
    http: RateLimitClient,
    cache: Arc<ResponseCache>,
    base_url: String,
}

impl WikiClient {
    pub fn new(config: &ProviderConfig, cache: Arc<ResponseCache>) -> AppResult<Self> {
        Ok(Self {
            http: RateLimitClient::for_wiki(config.request_timeout)?,
            cache,
            base_url: config.wiki_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the lead-section summary for a title. Negative results are
    /// cached too, so repeated imports do not re-ask for missing pages.
    pub async fn fetch_summary(&self, title: &str) -> Option<String> {
        let signature = RequestSignature::Summary {
            title: title.to_string(),
        };
        if let Some(cached) = self.cache.get::<Option<String>>(&signature) {
            return cached;
        }

        let url = format!(
            "{}/page/summary/{}",
            self.base_url,
            urlencoding::encode(&title.replace(' ', "_"))
        );

        let summary = match self.http.get_once::<WikiSummary>(&url).await {
            Ok(response) => response.extract.filter(|s| !s.is_empty()),
            Err(e) => {
                log_debug!("No summary for '{}': {}", title, e);
                None
            }
        };

        self.cache.put(signature, &summary);
        summary
    }
}
