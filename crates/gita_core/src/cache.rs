//! crates/gita_core/src/cache.rs
//!
//! A time-bounded, in-memory key/value store. Entries expire a fixed duration
//! after they were written and are evicted lazily on read. Nothing survives a
//! process restart.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{Content, ContentRequestKey};
use crate::ports::{Clock, SystemClock};

/// How long a cached entry stays valid: one hour.
pub const DEFAULT_TTL_SECS: i64 = 60 * 60;

/// The store used by the content retrieval service.
pub type ContentCache = TtlCache<ContentRequestKey, Content>;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    created_at: DateTime<Utc>,
}

pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates a cache with the default one-hour TTL on the wall clock.
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_TTL_SECS), Arc::new(SystemClock))
    }

    pub fn with_ttl(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Returns the value for `key` if it was written no more than one TTL ago.
    /// An expired entry is removed.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            None => return None,
            Some(entry) => now - entry.created_at > self.ttl,
        };
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.data.clone())
    }

    /// Inserts or overwrites the entry for `key`, stamped with the current time.
    pub fn set(&self, key: K, data: V) {
        let created_at = self.clock.now();
        self.lock().insert(key, CacheEntry { data, created_at });
    }

    /// `true` if `key` holds an unexpired entry.
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes every entry whose key matches `predicate`. Returns how many went.
    pub fn remove_where(&self, predicate: impl Fn(&K) -> bool) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| !predicate(key));
        before - entries.len()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave a half-written entry behind.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
