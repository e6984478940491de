//! TTL memoization for read-only reference endpoints.
//!
//! Reference tables such as `firewall/internet-service` are large, vendor
//! maintained and change only with signature updates, so their GET responses
//! are cached for a fixed TTL.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{Error, Result};

/// Cache statistics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of lookups served from the cache
    pub hits: u64,
    /// Number of lookups that missed or found an expired entry
    pub misses: u64,
    /// Entries currently stored, including expired ones not yet replaced
    pub entries: usize,
}

impl CacheStats {
    /// Calculate cache hit ratio (0.0 to 1.0).
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// String-keyed cache whose entries expire after a fixed TTL.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> TtlCache<V>
where
    V: Clone,
{
    /// Create an empty cache.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return a fresh cached value, counting the hit or miss.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let fresh = self.entries.read().ok().and_then(|entries| {
            entries
                .get(key)
                .filter(|entry| entry.stored_at.elapsed() < self.ttl)
                .map(|entry| entry.value.clone())
        });

        if fresh.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        fresh
    }

    /// Store a value, replacing any previous entry.
    ///
    /// Expired entries are dropped first, so keys that are never read again
    /// do not accumulate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CacheError`] if the lock is poisoned.
    pub fn insert(&self, key: impl Into<String>, value: V) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::CacheError("cache lock poisoned".to_string()))?;
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Return the cached value or run `fetch` and cache its result.
    ///
    /// No lock is held while `fetch` runs, so two concurrent misses may both
    /// fetch; the later result wins. Errors are returned and not cached.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `fetch`.
    pub async fn get_or_try_insert_with<F, Fut>(&self, key: &str, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(key) {
            debug!(key, "reference cache hit");
            return Ok(value);
        }

        debug!(key, "reference cache miss");
        let value = fetch().await?;
        self.insert(key, value.clone())?;
        Ok(value)
    }

    /// Remove one entry.
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    /// Remove every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|key, _| !key.starts_with(prefix));
        }
    }

    /// Remove every entry and reset the counters.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Current statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().map(|e| e.len()).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_get_insert() {
        let cache = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("a"), None);
        cache.insert("a", 1).unwrap();
        assert_eq!(cache.get("a"), Some(1));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.insert("a", "value".to_string()).unwrap();
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_insert_purges_expired_entries() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.insert("cmdb/firewall/address?format=name", 1).unwrap();
        cache.insert("cmdb/firewall/address?format=name|type", 2).unwrap();
        std::thread::sleep(Duration::from_millis(25));
        cache.insert("cmdb/firewall/address?format=name|subnet", 3).unwrap();

        assert_eq!(cache.stats().entries, 1);
        assert_eq!(cache.get("cmdb/firewall/address?format=name|subnet"), Some(3));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1).unwrap();
        cache.insert("b", 2).unwrap();
        cache.invalidate("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));

        cache.insert("cmdb/x/1", 3).unwrap();
        cache.insert("cmdb/y/1", 4).unwrap();
        cache.invalidate_prefix("cmdb/x/");
        assert_eq!(cache.stats().entries, 2);

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_hit_ratio_empty() {
        assert_eq!(CacheStats::default().hit_ratio(), 0.0);
    }

    #[tokio::test]
    async fn test_get_or_try_insert_with_fetches_once() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            let value = cache
                .get_or_try_insert_with("countries", || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["BE", "NL"])
                })
                .await
                .unwrap();
            assert_eq!(value.len(), 2);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().hits, 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let err = cache
            .get_or_try_insert_with("k", || async {
                Err(Error::ServiceUnavailable("down".to_string()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));

        let value = cache
            .get_or_try_insert_with("k", || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }
}
