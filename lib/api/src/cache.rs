// Per-key response memo with a TTL, scoped to one index snapshot
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const MAX_ENTRIES: u64 = 10_000;

/// Memoizes responses by key for a fixed time.
///
/// Entries are keyed by the build id of the snapshot they were computed
/// from as well as the request key, so lookups against a newer build miss
/// and a reload never serves a stale answer.
pub struct ResponseCache<V> {
    ttl: Duration,
    entries: Cache<(Uuid, String), Arc<V>>,
}

impl<V: Send + Sync + 'static> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build(),
        }
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str, build_id: Uuid) -> Option<Arc<V>> {
        self.entries.get(&(build_id, key.to_string()))
    }

    pub fn insert(&self, key: &str, build_id: Uuid, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.insert((build_id, key.to_string()), value.clone());
        value
    }

    /// Drop every entry, e.g. after the snapshot they belong to is replaced.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
