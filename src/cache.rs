//! Optional snapshot caching for computed reports. The analytics code never
//! reads or writes a cache itself; callers that rebuild the same view
//! repeatedly can sit an implementation of [`SnapshotCache`] in front of
//! [`crate::ReportEngine::build`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A store for computed snapshots keyed by the view parameters that
/// produced them. Staleness policy belongs to the implementation.
pub trait SnapshotCache<V> {
    fn get(&self, key: &str) -> Option<&V>;
    fn put(&mut self, key: String, value: V);
}

/// In-memory cache where entries expire a fixed duration after insertion.
/// Expired entries are dropped lazily on the next `put`.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, (Instant, V)>,
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, inserted: Instant) -> bool {
        inserted.elapsed() <= self.ttl
    }
}

impl<V> SnapshotCache<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|(inserted, _)| self.is_fresh(*inserted))
            .map(|(_, value)| value)
    }

    fn put(&mut self, key: String, value: V) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, (inserted, _)| inserted.elapsed() <= ttl);
        self.entries.insert(key, (Instant::now(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_is_returned() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.put("month:2024-03".to_string(), 42u32);
        assert_eq!(cache.get("month:2024-03"), Some(&42));
    }

    #[test]
    fn test_missing_key_is_none() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_expired_entry_is_hidden() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.put("k".to_string(), 1u32);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_put_evicts_expired_entries() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.put("old".to_string(), 1u32);
        std::thread::sleep(Duration::from_millis(5));
        cache.put("new".to_string(), 2u32);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_refreshes_value() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.put("k".to_string(), 1u32);
        cache.put("k".to_string(), 2u32);
        assert_eq!(cache.get("k"), Some(&2));
        assert_eq!(cache.len(), 1);
    }
}
