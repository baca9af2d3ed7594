//! Rate-limited HTTP client for metadata providers
//!
//! A governor quota gates every request ahead of the retry loop, so bounded
//! retry is the backstop rather than the primary throttle. One client is
//! shared per provider.

use super::retry_policy::{is_retryable_error, RateLimitInfo, RetryPolicy};
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_warn};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::{Client, StatusCode};
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::sleep;

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

pub struct RateLimitClient {
    client: Client,
    rate_limiter: DirectRateLimiter,
    retry_policy: RetryPolicy,
    user_agent: String,
    provider_name: String,
}

impl RateLimitClient {
    /// Client for the TMDB API (~40 req/10s documented limit).
    pub fn for_tmdb(timeout: Duration) -> AppResult<Self> {
        Self::new(
            "TMDB",
            RetryPolicy::standard(),
            Self::create_rate_limiter(4.0, 8),
            "cinefeed/0.1".to_string(),
            timeout,
        )
    }

    /// Client for the Wikipedia REST API; polite single-attempt usage.
    pub fn for_wiki(timeout: Duration) -> AppResult<Self> {
        Self::new(
            "Wikipedia",
            RetryPolicy::best_effort(),
            Self::create_rate_limiter(2.0, 4),
            "cinefeed/0.1".to_string(),
            timeout,
        )
    }

    /// Create a rate limiter with specified requests per second and burst capacity
    fn create_rate_limiter(requests_per_second: f64, burst_size: u32) -> DirectRateLimiter {
        let duration = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::MAX
        };

        let burst = NonZeroU32::new(burst_size.max(1)).unwrap();
        let quota = Quota::with_period(duration).unwrap().allow_burst(burst);

        GovernorRateLimiter::direct(quota)
    }

    pub fn new(
        provider_name: &str,
        retry_policy: RetryPolicy,
        rate_limiter: DirectRateLimiter,
        user_agent: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rate_limiter,
            retry_policy,
            user_agent,
            provider_name: provider_name.to_string(),
        })
    }

    /// GET with rate limiting and the full retry schedule.
    pub async fn get<T>(&self, url: &str) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.request_with_retries(url, &self.retry_policy).await
    }

    /// GET with rate limiting but a single attempt, for best-effort
    /// lookups (trailer fallback search, summaries).
    pub async fn get_once<T>(&self, url: &str) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.request_with_retries(url, &RetryPolicy::best_effort())
            .await
    }

    async fn request_with_retries<T>(&self, url: &str, policy: &RetryPolicy) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut last_error = AppError::ProviderUnavailable("No attempts made".to_string());

        for attempt in 0..policy.max_attempts {
            // Wait for rate limiter before attempting request
            self.rate_limiter.until_ready().await;

            let response = match self
                .client
                .get(url)
                .header("User-Agent", &self.user_agent)
                .header("Accept", "application/json")
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error =
                        AppError::ProviderUnavailable(format!("{} request failed: {}", self.provider_name, e));

                    if is_retryable_error(&e) && attempt + 1 < policy.max_attempts {
                        let delay = policy.calculate_delay(attempt, None);
                        log_warn!(
                            "{} request failed (attempt {}/{}): {}. Retrying in {:?}",
                            self.provider_name,
                            attempt + 1,
                            policy.max_attempts,
                            e,
                            delay
                        );
                        sleep(delay).await;
                        continue;
                    }
                    return Err(last_error);
                }
            };

            let status = response.status();

            // Explicit 404 is a definitive answer, never retried.
            if status == StatusCode::NOT_FOUND {
                return Err(AppError::NotFound(format!(
                    "{} resource not found: {}",
                    self.provider_name, url
                )));
            }

            // 429 gets a longer, Retry-After-aware delay.
            if status == StatusCode::TOO_MANY_REQUESTS {
                let info = RateLimitInfo::from_headers(response.headers());
                last_error = AppError::RateLimited(format!(
                    "{} rate limit exceeded after {} attempts",
                    self.provider_name, policy.max_attempts
                ));

                if attempt + 1 < policy.max_attempts {
                    let delay = policy.calculate_rate_limit_delay(attempt, info.retry_after);
                    log_warn!(
                        "{} rate limited (attempt {}/{}). Waiting {:?} before retry",
                        self.provider_name,
                        attempt + 1,
                        policy.max_attempts,
                        delay
                    );
                    sleep(delay).await;
                    continue;
                }
                return Err(last_error);
            }

            if !status.is_success() {
                last_error = AppError::ProviderUnavailable(format!(
                    "{} returned HTTP {}",
                    self.provider_name, status
                ));

                if attempt + 1 < policy.max_attempts {
                    let delay = policy.calculate_delay(attempt, None);
                    log_warn!(
                        "{} returned HTTP {} (attempt {}/{}). Retrying in {:?}",
                        self.provider_name,
                        status,
                        attempt + 1,
                        policy.max_attempts,
                        delay
                    );
                    sleep(delay).await;
                    continue;
                }
                return Err(last_error);
            }

            // Malformed JSON is treated as transient: a retry may hit a
            // healthy backend.
            match response.text().await {
                Ok(body) => match serde_json::from_str(&body) {
                    Ok(parsed) => return Ok(parsed),
                    Err(e) => {
                        log_debug!(
                            "{} returned unparseable body ({} bytes): {}",
                            self.provider_name,
                            body.len(),
                            e
                        );
                        last_error = AppError::ProviderUnavailable(format!(
                            "{} returned malformed response: {}",
                            self.provider_name, e
                        ));
                    }
                },
                Err(e) => {
                    last_error = AppError::ProviderUnavailable(format!(
                        "Failed to read {} response: {}",
                        self.provider_name, e
                    ));
                }
            }

            if attempt + 1 < policy.max_attempts {
                let delay = policy.calculate_delay(attempt, None);
                sleep(delay).await;
            }
        }

        Err(last_error)
    }

    /// Check if a request can be made now (for testing/debugging)
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RateLimitClient::for_tmdb(Duration::from_secs(30)).unwrap();
        assert_eq!(client.provider_name(), "TMDB");

        let wiki = RateLimitClient::for_wiki(Duration::from_secs(30)).unwrap();
        assert_eq!(wiki.provider_name(), "Wikipedia");
    }

    #[test]
    fn test_can_make_request() {
        let client = RateLimitClient::for_tmdb(Duration::from_secs(30)).unwrap();
        assert!(client.can_make_request_now());
    }

    // The retry loop itself (attempt counts, 404 short-circuit, 429
    // exhaustion) is exercised against a local server in
    // tests/provider_retry_test.rs.
}
