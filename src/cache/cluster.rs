//! Bounded, time-expiring cache for cluster search results.
//!
//! Uses moka's async-friendly cache: entries expire a fixed time after
//! insertion and the store is capped at `max_entries`. The cache uses
//! moka's LRU policy: a new entry is always admitted and, once the cap is
//! exceeded, the least recently used entry is evicted.
//!
//! Values are stored as `Arc<Vec<Cluster>>`; a hit hands back the very same
//! allocation that was inserted.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use moka::policy::EvictionPolicy;

use crate::telemetry;
use crate::types::Cluster;

/// Configuration for the cluster cache.
///
/// ```rust
/// # use membit::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(64)
///     .ttl(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached searches. Default: 256.
    pub max_entries: u64,
    /// Time-to-live measured from insertion. Default: 10 seconds.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            ttl: Duration::from_secs(10),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Composite cache key. The keyword is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterKey {
    pub keyword: String,
    pub limit: usize,
}

impl ClusterKey {
    pub fn new(keyword: impl Into<String>, limit: usize) -> Self {
        Self {
            keyword: keyword.into(),
            limit,
        }
    }
}

/// In-memory cache of de-duplicated cluster lists.
#[derive(Clone)]
pub struct ClusterCache {
    cache: Cache<ClusterKey, Arc<Vec<Cluster>>>,
}

impl ClusterCache {
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .eviction_policy(EvictionPolicy::lru())
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// Look up an unexpired entry. Emits cache hit/miss metrics.
    pub async fn get(&self, key: &ClusterKey) -> Option<Arc<Vec<Cluster>>> {
        match self.cache.get(key).await {
            Some(clusters) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(clusters)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    pub async fn insert(&self, key: ClusterKey, clusters: Arc<Vec<Cluster>>) {
        self.cache.insert(key, clusters).await;
    }
}

impl Default for ClusterCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
