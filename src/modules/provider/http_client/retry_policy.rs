//! Retry policy for metadata provider calls
//!
//! Transient failures (non-200 status, network error, malformed JSON) are
//! retried with exponential backoff; an explicit 429 is retried on a longer,
//! Retry-After-aware delay. Backoff waits are async so a slow provider never
//! stalls other jobs sharing the runtime.

use std::time::Duration;

/// Configuration for HTTP retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts (first try included).
    pub max_attempts: u32,
    /// Base delay between attempts.
    pub base_delay: Duration,
    /// Maximum delay to wait (prevents excessive waits)
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Standard policy: 3 attempts with 1s/2s/4s backoff.
    pub fn standard() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
        }
    }

    /// Single attempt, for best-effort lookups that must not retry.
    pub fn best_effort() -> Self {
        Self {
            max_attempts: 1,
            ..Self::standard()
        }
    }

    /// Delay before the attempt following `attempt` (0-based).
    /// If the server provided a Retry-After, respect it.
    pub fn calculate_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(server_delay) = retry_after {
            return server_delay.min(self.max_delay);
        }

        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis((self.base_delay.as_millis() as f64 * multiplier) as u64);

        delay.min(self.max_delay)
    }

    /// Delay after a 429: longer than the normal schedule when the server
    /// does not say how long to wait.
    pub fn calculate_rate_limit_delay(
        &self,
        attempt: u32,
        retry_after: Option<Duration>,
    ) -> Duration {
        if let Some(server_delay) = retry_after {
            return server_delay.min(self.max_delay);
        }

        (self.calculate_delay(attempt, None) * 2).min(self.max_delay)
    }
}

/// Information extracted from HTTP 429 responses
#[derive(Debug, Clone, Default)]
pub struct RateLimitInfo {
    /// How long to wait before next request (from Retry-After header)
    pub retry_after: Option<Duration>,
}

impl RateLimitInfo {
    /// Parse rate limit information from HTTP response headers
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let retry_after = headers
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);

        Self { retry_after }
    }
}

/// Whether a reqwest error is worth retrying (network-level problems).
pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request() || error.is_body()
}
