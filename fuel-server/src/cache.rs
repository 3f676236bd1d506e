//! Caching layer for planning-request geocodes.
//!
//! Users tend to plan many trips from the same few places. Successful lookups
//! are cached by normalised address; failures are never cached so a transient
//! outage does not stick.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::Coordinate;
use crate::geocode::{GeocodeError, Geocoder};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Cache key: trimmed, lowercased query.
fn cache_key(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Geocoder with caching.
///
/// Wraps any [`Geocoder`] and caches its successful answers.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: MokaCache<String, Coordinate>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Create a new cached geocoder.
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Number of cached addresses. Eventually consistent with recent inserts.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl<G: Geocoder + Sync> Geocoder for CachedGeocoder<G> {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let key = cache_key(query);

        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let coordinate = self.inner.geocode(query).await?;
        self.cache.insert(key, coordinate).await;

        Ok(coordinate)
    }
}
