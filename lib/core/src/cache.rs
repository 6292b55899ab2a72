// Bounded memo for normalized strings
use moka::sync::Cache;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hit/miss counters for a [`NormalizeCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: u64,
    pub capacity: u64,
}

/// Thread-safe bounded memo of normalizer results.
///
/// A capacity of zero disables caching entirely.
#[derive(Debug)]
pub struct NormalizeCache {
    inner: Option<Cache<String, String>>,
    capacity: u64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl NormalizeCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity as u64;
        Self {
            inner: (capacity > 0).then(|| Cache::builder().max_capacity(capacity).build()),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let inner = self.inner.as_ref()?;
        let found = inner.get(key);
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn insert(&self, key: &str, value: &str) {
        if let Some(inner) = &self.inner {
            inner.insert(key.to_string(), value.to_string());
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn stats(&self) -> CacheStats {
        let len = self.inner.as_ref().map(|cache| {
            cache.run_pending_tasks();
            cache.entry_count()
        });
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: len.unwrap_or(0),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss() {
        let cache = NormalizeCache::new(4);
        assert_eq!(cache.get("Cables"), None);
        cache.insert("Cables", "cable");
        assert_eq!(cache.get("Cables").as_deref(), Some("cable"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.len, 1);
        assert_eq!(stats.capacity, 4);
    }

    #[test]
    fn test_bounded() {
        let cache = NormalizeCache::new(8);
        for i in 0..100 {
            cache.insert(&format!("input {i}"), "out");
        }
        assert!(cache.stats().len <= 8);
    }

    #[test]
    fn test_reinsert_does_not_grow() {
        let cache = NormalizeCache::new(2);
        cache.insert("a", "1");
        cache.insert("a", "2");
        assert_eq!(cache.stats().len, 1);
        assert_eq!(cache.get("a").as_deref(), Some("2"));
    }

    #[test]
    fn test_zero_capacity_disables() {
        let cache = NormalizeCache::new(0);
        assert!(!cache.is_enabled());
        cache.insert("a", "1");
        assert!(cache.get("a").is_none());
        assert_eq!(cache.stats().misses, 0);
    }
}
