/// Provider response cache with typed request signatures
///
/// Cache keys are a structured enum rather than formatted strings, so
/// lookups for different endpoint kinds can never collide (a summary for
/// one title cannot shadow a popularity page, and movie/series pages are
/// distinct by construction). The cache is advisory only: a miss or an
/// expired entry just means one more provider call.
use crate::modules::catalog::MediaType;
use crate::shared::config::CacheConfig;
use crate::{log_debug, log_info};
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Structured key identifying one provider request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestSignature {
    Popular {
        media_type: MediaType,
        page: u32,
    },
    Details {
        media_type: MediaType,
        external_id: i32,
    },
    TrailerSearch {
        media_type: MediaType,
        title: String,
        year: Option<i32>,
    },
    Summary {
        title: String,
    },
}

impl RequestSignature {
    /// Kind-specific TTL: short for churning lists, a day for details,
    /// very long for trailer/summary lookups.
    pub fn ttl(&self, config: &CacheConfig) -> Duration {
        match self {
            RequestSignature::Popular { .. } => config.list_ttl,
            RequestSignature::Details { .. } => config.details_ttl,
            RequestSignature::TrailerSearch { .. } | RequestSignature::Summary { .. } => {
                config.lookup_ttl
            }
        }
    }
}

/// Cached entry with TTL support
#[derive(Debug, Clone)]
struct CacheEntry {
    body: serde_json::Value,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(body: serde_json::Value, ttl: Duration) -> Self {
        Self {
            body,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_count: usize,
    pub expired_cleanups: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Read-through TTL cache for provider responses.
#[derive(Debug)]
pub struct ResponseCache {
    cache: Arc<DashMap<RequestSignature, CacheEntry>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    cleanups: Arc<AtomicU64>,
    cleanup_task_started: Arc<AtomicBool>,
    config: CacheConfig,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            cleanups: Arc::new(AtomicU64::new(0)),
            cleanup_task_started: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Get a cached response if present and not expired.
    pub fn get<T>(&self, signature: &RequestSignature) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.ensure_cleanup_task_started();

        if let Some(entry) = self.cache.get(signature) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log_debug!("Cache hit for {:?}", signature);
                return serde_json::from_value(entry.body.clone()).ok();
            }
        }
        // Drop the read guard before removing an expired entry.
        if self
            .cache
            .get(signature)
            .map(|e| e.is_expired())
            .unwrap_or(false)
        {
            self.cache.remove(signature);
            log_debug!("Removed expired cache entry for {:?}", signature);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Cache a response with the signature's kind-specific TTL.
    /// Last writer wins; races here have no correctness impact.
    pub fn put<T>(&self, signature: RequestSignature, value: &T)
    where
        T: Serialize,
    {
        self.ensure_cleanup_task_started();

        if self.cache.len() >= self.config.max_entries {
            self.evict_oldest_entries();
        }

        let ttl = signature.ttl(&self.config);
        if let Ok(body) = serde_json::to_value(value) {
            self.cache.insert(signature, CacheEntry::new(body, ttl));
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries_count: self.cache.len(),
            expired_cleanups: self.cleanups.load(Ordering::Relaxed),
        }
    }

    pub fn clear(&self) {
        self.cache.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.cleanups.store(0, Ordering::Relaxed);
        log_info!("Provider cache cleared");
    }

    /// Ensure cleanup task is started (idempotent)
    fn ensure_cleanup_task_started(&self) {
        if self
            .cleanup_task_started
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return;
        }

        if tokio::runtime::Handle::try_current().is_err() {
            // Not inside a runtime yet; try again on the next operation.
            self.cleanup_task_started.store(false, Ordering::Release);
            return;
        }

        let cache = self.cache.clone();
        let cleanups = self.cleanups.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));

            loop {
                interval.tick().await;

                let expired_keys: Vec<RequestSignature> = cache
                    .iter()
                    .filter(|entry| entry.value().is_expired())
                    .map(|entry| entry.key().clone())
                    .collect();

                let expired_count = expired_keys.len();
                for key in expired_keys {
                    cache.remove(&key);
                }

                if expired_count > 0 {
                    cleanups.fetch_add(expired_count as u64, Ordering::Relaxed);
                    log_debug!("Cleaned up {} expired cache entries", expired_count);
                }
            }
        });
    }

    /// Evict oldest entries back to 90% of capacity when the cache is full.
    fn evict_oldest_entries(&self) {
        let current_size = self.cache.len();
        if current_size < self.config.max_entries {
            return;
        }

        let mut entries: Vec<(RequestSignature, Instant)> = self
            .cache
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().created_at))
            .collect();

        entries.sort_by_key(|(_, created_at)| *created_at);

        let target_size = (self.config.max_entries * 9) / 10;
        let entries_to_evict = current_size.saturating_sub(target_size).max(1);

        for (key, _) in entries.into_iter().take(entries_to_evict) {
            self.cache.remove(&key);
        }

        log_debug!(
            "Evicted {} old cache entries (was {}, now {})",
            entries_to_evict,
            current_size,
            self.cache.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CacheConfig {
        CacheConfig {
            list_ttl: Duration::from_secs(60),
            details_ttl: Duration::from_secs(120),
            lookup_ttl: Duration::from_secs(180),
            max_entries: 10,
        }
    }

    #[tokio::test]
    async fn hit_returns_cached_value_without_second_store() {
        let cache = ResponseCache::new(test_config());
        let sig = RequestSignature::Details {
            media_type: MediaType::Movie,
            external_id: 550,
        };

        assert_eq!(cache.get::<serde_json::Value>(&sig), None);
        cache.put(sig.clone(), &serde_json::json!({"title": "Fight Club"}));

        let first: serde_json::Value = cache.get(&sig).unwrap();
        let second: serde_json::Value = cache.get(&sig).unwrap();
        assert_eq!(first, second);

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn signatures_do_not_collide_across_kinds() {
        let cache = ResponseCache::new(test_config());

        // Same page number for both media types, plus a summary sharing a
        // title string; all three must stay distinct.
        cache.put(
            RequestSignature::Popular {
                media_type: MediaType::Movie,
                page: 1,
            },
            &serde_json::json!(["movie-page"]),
        );
        cache.put(
            RequestSignature::Popular {
                media_type: MediaType::Series,
                page: 1,
            },
            &serde_json::json!(["series-page"]),
        );
        cache.put(
            RequestSignature::Summary {
                title: "1".to_string(),
            },
            &serde_json::json!("a summary"),
        );

        let movie: serde_json::Value = cache
            .get(&RequestSignature::Popular {
                media_type: MediaType::Movie,
                page: 1,
            })
            .unwrap();
        let series: serde_json::Value = cache
            .get(&RequestSignature::Popular {
                media_type: MediaType::Series,
                page: 1,
            })
            .unwrap();
        assert_ne!(movie, series);
        assert_eq!(cache.stats().entries_count, 3);
    }

    #[tokio::test]
    async fn expired_entries_are_misses() {
        let config = CacheConfig {
            list_ttl: Duration::from_millis(10),
            ..test_config()
        };
        let cache = ResponseCache::new(config);
        let sig = RequestSignature::Popular {
            media_type: MediaType::Movie,
            page: 1,
        };

        cache.put(sig.clone(), &serde_json::json!(["stale"]));
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.get::<serde_json::Value>(&sig), None);
    }

    #[tokio::test]
    async fn eviction_keeps_cache_bounded() {
        let cache = ResponseCache::new(test_config());

        for page in 0..25 {
            cache.put(
                RequestSignature::Popular {
                    media_type: MediaType::Movie,
                    page,
                },
                &serde_json::json!([page]),
            );
        }

        assert!(cache.stats().entries_count <= 10);
    }

    #[test]
    fn ttls_follow_signature_kind() {
        let config = test_config();
        let list = RequestSignature::Popular {
            media_type: MediaType::Movie,
            page: 1,
        };
        let details = RequestSignature::Details {
            media_type: MediaType::Movie,
            external_id: 1,
        };
        let summary = RequestSignature::Summary {
            title: "Heat".to_string(),
        };

        assert_eq!(list.ttl(&config), config.list_ttl);
        assert_eq!(details.ttl(&config), config.details_ttl);
        assert_eq!(summary.ttl(&config), config.lookup_ttl);
    }
}
