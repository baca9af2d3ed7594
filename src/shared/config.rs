//! Startup configuration.
//!
//! All configuration is read from the environment exactly once and injected
//! into the components that need it. Nothing mutates it at runtime; changing
//! a value means restarting the service.

use crate::shared::errors::{AppError, AppResult};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub scheduler: SchedulerConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub wiki_base_url: String,
    /// Per-call timeout, independent of the overall job.
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub interval: Duration,
    /// Popularity-list pages fetched per sweep, per media kind.
    pub pages_per_sweep: u32,
    /// Upper bound on items in a single scheduled job.
    pub max_items_per_run: usize,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for popularity list responses (short: lists churn).
    pub list_ttl: Duration,
    /// TTL for per-title detail responses.
    pub details_ttl: Duration,
    /// TTL for trailer-search and summary lookups (rarely change).
    pub lookup_ttl: Duration,
    pub max_entries: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl AppConfig {
    /// Load configuration from the environment. `TMDB_API_KEY` is the only
    /// required variable; everything else has a default.
    pub fn from_env() -> AppResult<Self> {
        let api_key = env::var("TMDB_API_KEY")
            .map_err(|_| AppError::ConfigError("TMDB_API_KEY is not set".to_string()))?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError("TMDB_API_KEY is empty".to_string()));
        }

        Ok(Self {
            provider: ProviderConfig {
                api_key,
                base_url: env_or("TMDB_BASE_URL", "https://api.themoviedb.org/3"),
                wiki_base_url: env_or(
                    "WIKI_BASE_URL",
                    "https://en.wikipedia.org/api/rest_v1",
                ),
                request_timeout: Duration::from_secs(env_parsed("PROVIDER_TIMEOUT_SECS", 30)?),
            },
            scheduler: SchedulerConfig {
                enabled: env_or("SCHEDULER_ENABLED", "true") == "true",
                interval: Duration::from_secs(env_parsed("SCHEDULER_INTERVAL_SECS", 3600)?),
                pages_per_sweep: env_parsed("SCHEDULER_PAGES_PER_SWEEP", 1)? as u32,
                max_items_per_run: env_parsed("SCHEDULER_MAX_ITEMS_PER_RUN", 40)? as usize,
            },
            cache: CacheConfig {
                list_ttl: Duration::from_secs(env_parsed("CACHE_LIST_TTL_SECS", 3 * 3600)?),
                details_ttl: Duration::from_secs(env_parsed("CACHE_DETAILS_TTL_SECS", 24 * 3600)?),
                lookup_ttl: Duration::from_secs(env_parsed("CACHE_LOOKUP_TTL_SECS", 7 * 24 * 3600)?),
                max_entries: env_parsed("CACHE_MAX_ENTRIES", 2000)? as usize,
            },
            server: ServerConfig {
                bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            },
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(3 * 3600),
            details_ttl: Duration::from_secs(24 * 3600),
            lookup_ttl: Duration::from_secs(7 * 24 * 3600),
            max_entries: 2000,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed(key: &str, default: u64) -> AppResult<u64> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::ConfigError(format!("{} is not a valid integer: {}", key, raw))),
        Err(_) => Ok(default),
    }
}
