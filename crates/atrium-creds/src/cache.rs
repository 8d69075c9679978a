//! Expiring key-value store for resolved credentials.

use std::time::{Duration, Instant};

use dashmap::DashMap;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe map with a per-entry absolute expiration instant.
///
/// A logically expired entry behaves as absent and is evicted when
/// observed; there is no background sweeper, so the map is bounded by the
/// number of distinct keys ever inserted (for the broker: distinct
/// buckets, small and operator-controlled). The map is sharded, so
/// readers of distinct keys do not serialize on a single lock, and a
/// reader never observes a partially written entry.
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the value for `key` if present and not yet expired
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entry = self.entries.get(key)?;
            if now < entry.expires_at {
                return Some(entry.value.clone());
            }
        }
        // Expired: evict unless a writer replaced the entry meanwhile.
        self.entries.remove_if(key, |_, entry| now >= entry.expires_at);
        None
    }

    /// Inserts or overwrites `key`, expiring `ttl` from now
    pub fn insert(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Drops `key` immediately, if present
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of entries physically present (expired entries linger until
    /// observed)
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
