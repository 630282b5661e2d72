//! Memoized fetch results keyed by term and date window

use moka::future::Cache;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use termfreq_common::{FetchKey, PostCollection, Result};
use termfreq_config::CacheConfig;
use tracing::{debug, instrument};

/// Cache performance metrics
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Lookups answered from the cache
    pub hits: AtomicU64,
    /// Lookups that had to fetch
    pub misses: AtomicU64,
}

impl CacheMetrics {
    /// Count a cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Hits so far
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Misses so far
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Share of lookups that hit, 0.0 before the first lookup
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

/// Bounded, expiring memo of fetched post collections.
///
/// Granularity is not part of the key, so changing only the bucket size
/// reuses the cached posts.
#[derive(Debug, Clone)]
pub struct FetchCache {
    cache: Cache<FetchKey, Arc<PostCollection>>,
    metrics: Arc<CacheMetrics>,
}

impl FetchCache {
    /// Create a new cache with the given configuration
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl())
            .build();

        Self {
            cache,
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    /// Cached posts for `key`, if any
    pub async fn get(&self, key: &FetchKey) -> Option<Arc<PostCollection>> {
        self.cache.get(key).await
    }

    /// Return the cached posts for `key`, or run `fetch` and remember its result.
    ///
    /// Failed fetches are not cached.
    #[instrument(skip(self, key, fetch), fields(key = %key))]
    pub async fn get_or_fetch<F, Fut>(&self, key: &FetchKey, fetch: F) -> Result<Arc<PostCollection>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PostCollection>>,
    {
        if let Some(posts) = self.cache.get(key).await {
            debug!("Cache hit for key: {}", key);
            self.metrics.record_hit();
            return Ok(posts);
        }

        debug!("Cache miss for key: {}", key);
        self.metrics.record_miss();

        let posts = Arc::new(fetch().await?);
        self.cache.insert(key.clone(), Arc::clone(&posts)).await;
        Ok(posts)
    }

    /// Drop every cached result
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Get cache metrics
    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termfreq_common::test_utils::date;
    use termfreq_common::test_utils::post_fixtures::sample_posts;
    use termfreq_common::TermFreqError;

    fn key(term: &str) -> FetchKey {
        FetchKey {
            term: term.to_string(),
            date_since: date(2021, 1, 1),
            date_until: date(2021, 12, 31),
        }
    }

    #[tokio::test]
    async fn test_second_lookup_hits() {
        let cache = FetchCache::new(&CacheConfig::default());

        let first = cache.get_or_fetch(&key("a"), || async { Ok(sample_posts()) }).await.unwrap();
        let second = cache
            .get_or_fetch(&key("a"), || async { Err(TermFreqError::new("refetched")) })
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.metrics().hits(), 1);
        assert_eq!(cache.metrics().misses(), 1);
        assert!((cache.metrics().hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_different_terms_do_not_share() {
        let cache = FetchCache::new(&CacheConfig::default());

        cache.get_or_fetch(&key("a"), || async { Ok(sample_posts()) }).await.unwrap();
        let other = cache.get_or_fetch(&key("b"), || async { Ok(Vec::new()) }).await.unwrap();

        assert!(other.is_empty());
        assert_eq!(cache.metrics().misses(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = FetchCache::new(&CacheConfig::default());

        let failed = cache
            .get_or_fetch(&key("a"), || async { Err(TermFreqError::network("down")) })
            .await;
        assert!(failed.is_err());
        assert!(cache.get(&key("a")).await.is_none());

        let posts = cache.get_or_fetch(&key("a"), || async { Ok(sample_posts()) }).await.unwrap();
        assert_eq!(posts.len(), sample_posts().len());
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = FetchCache::new(&CacheConfig::default());
        cache.get_or_fetch(&key("a"), || async { Ok(sample_posts()) }).await.unwrap();

        cache.invalidate_all();

        assert!(cache.get(&key("a")).await.is_none());
    }
}
