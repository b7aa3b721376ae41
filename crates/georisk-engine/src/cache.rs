//! TTL caches for the latest derived profiles
//!
//! Entries expire whole: once a profile outlives its TTL it is dropped and
//! recomputed, never merged with fresher fields.

use cached::{Cached, TimedCache};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::EngineConfig;
use crate::model::{Region, RegionRiskProfile, Sector, SectorImpactProfile};

/// Thread-safe cache whose entries expire after a fixed lifespan
pub struct TtlCache<K, V> {
    cache: Arc<RwLock<TimedCache<K, V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: K, value: V) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// If the value exists in cache, it's returned immediately.
    /// Otherwise, the fetcher function is called and the result is cached.
    /// Errors are returned as-is and nothing is cached for them.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &K) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

/// Latest profiles, one cache per data class
#[derive(Clone)]
pub struct ProfileCache {
    /// News-derived region profiles
    pub regions: TtlCache<Region, RegionRiskProfile>,
    /// Market-derived sector profiles, keyed by the requested sector set
    /// since impact is ranked within that set
    pub sectors: TtlCache<Vec<Sector>, Vec<SectorImpactProfile>>,
}

impl ProfileCache {
    /// Create a new profile cache with specified TTLs
    pub fn new(news_ttl: Duration, market_ttl: Duration) -> Self {
        Self {
            regions: TtlCache::new(news_ttl),
            sectors: TtlCache::new(market_ttl),
        }
    }

    /// TTLs taken from the configured refresh intervals
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.news_ttl(), config.market_ttl())
    }

    /// Clear all caches
    pub async fn clear_all(&self) {
        self.regions.clear().await;
        self.sectors.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Recommendation, RiskLevel, Trend};

    fn region_profile(region: Region, score: f64) -> RegionRiskProfile {
        RegionRiskProfile {
            region,
            score,
            level: RiskLevel::from_score(score),
            factors: region.baseline_factors(),
            trend: Trend::Stable,
        }
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let profile = region_profile(Region::Europe, 0.55);

        cache.insert(Region::Europe, profile.clone()).await;

        assert_eq!(cache.get(&Region::Europe).await, Some(profile));
        assert_eq!(cache.get(&Region::Africa).await, None);
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let profile = region_profile(Region::MiddleEast, 0.72);

        let mut call_count = 0;
        let fetcher = || {
            call_count += 1;
            async { Ok::<_, String>(profile.clone()) }
        };

        // First call should execute fetcher
        let result = cache.get_or_fetch(Region::MiddleEast, fetcher).await.unwrap();
        assert_eq!(result, profile);
        assert_eq!(call_count, 1);

        // Second call should use cache
        let result = cache
            .get_or_fetch(Region::MiddleEast, || {
                call_count += 1;
                async { Ok::<_, String>(profile.clone()) }
            })
            .await
            .unwrap();
        assert_eq!(result, profile);
        assert_eq!(call_count, 1); // Should not have incremented
    }

    #[tokio::test]
    async fn test_fetch_error_not_cached() {
        let cache: TtlCache<Region, RegionRiskProfile> = TtlCache::new(Duration::from_secs(60));

        let result = cache
            .get_or_fetch(Region::Africa, || async { Err::<RegionRiskProfile, _>("offline") })
            .await;
        assert_eq!(result, Err("offline"));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_entries_expire_whole() {
        let cache = TtlCache::new(Duration::from_secs(1));
        cache.insert(Region::Europe, region_profile(Region::Europe, 0.5)).await;
        assert!(cache.get(&Region::Europe).await.is_some());

        tokio::time::sleep(Duration::from_millis(1_200)).await;
        assert!(cache.get(&Region::Europe).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_invalidation() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(Region::Europe, region_profile(Region::Europe, 0.5)).await;

        cache.invalidate(&Region::Europe).await;
        assert!(cache.get(&Region::Europe).await.is_none());
    }

    #[tokio::test]
    async fn test_profile_cache_clear_all() {
        let cache = ProfileCache::from_config(&EngineConfig::default());

        cache.regions.insert(Region::Africa, region_profile(Region::Africa, 0.6)).await;
        cache
            .sectors
            .insert(
                vec![Sector::Energy],
                vec![SectorImpactProfile {
                    sector: Sector::Energy,
                    impact: 0.3,
                    volatility: 0.2,
                    sentiment: 0.5,
                    volume: 10.0,
                    recommendation: Recommendation::Stable,
                }],
            )
            .await;

        assert_eq!(cache.regions.len().await, 1);
        assert_eq!(cache.sectors.len().await, 1);

        cache.clear_all().await;

        assert!(cache.regions.is_empty().await);
        assert!(cache.sectors.is_empty().await);
    }
}
