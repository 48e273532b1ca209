//! Bounded, expiring in-memory range cache with first-in-first-out eviction.
//!
//! The map and the insertion-order queue live in one aggregate behind a single
//! mutex, so a reader never sees the map and the queue disagree.
//!
//! Eviction follows insertion order only. Reads and overwrites leave a key's
//! position alone, which is what separates this from an LRU.
//!
//! Expired entries are dropped lazily when read. Rather than searching the queue
//! for the dropped key, each queued key carries the generation of the entry that
//! pushed it; a queue slot whose generation no longer matches a live entry is a
//! tombstone and is skipped on eviction. Tombstones are compacted away once they
//! outnumber live slots.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

use super::{CacheStats, RangeCache};

/// Default bound on stored prefixes.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// TTL applied when `set` is given a zero TTL.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

// Tombstones tolerated before compaction kicks in on small caches.
const COMPACT_SLACK: usize = 64;

/// Configuration for [`MemoryCache`].
#[derive(Debug, Clone)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries; `0` means unbounded.
    pub max_entries: usize,
    pub default_ttl: Duration,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self { max_entries: DEFAULT_MAX_ENTRIES, default_ttl: DEFAULT_TTL }
    }
}

#[derive(Debug)]
struct Entry {
    value: String,
    /// `None` when the TTL overflows `Instant`, i.e. never expires.
    expires_at: Option<Instant>,
    generation: u64,
}

impl Entry {
    #[inline]
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    order: VecDeque<(String, u64)>,
    next_generation: u64,
    stats: CacheStats,
}

impl Inner {
    fn get(&mut self, key: &str, now: Instant) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.stats.hits += 1;
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.expirations += 1;
                self.stats.misses += 1;
                trace!(prefix = key, "range cache entry expired");
                self.compact();
                None
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: String, expires_at: Option<Instant>, max_entries: usize) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.value = value;
            entry.expires_at = expires_at;
            return;
        }

        if max_entries > 0 {
            while self.entries.len() >= max_entries {
                match self.evict_oldest() {
                    Some(evicted) => {
                        self.stats.evictions += 1;
                        trace!(prefix = %evicted, "range cache entry evicted");
                    }
                    None => break,
                }
            }
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.order.push_back((key.to_owned(), generation));
        self.entries.insert(key.to_owned(), Entry { value, expires_at, generation });
    }

    #[inline]
    fn is_live(&self, key: &str, generation: u64) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.generation == generation)
    }

    /// Removes and returns the earliest-inserted live key, discarding tombstones on the way.
    fn evict_oldest(&mut self) -> Option<String> {
        while let Some((key, generation)) = self.order.pop_front() {
            if self.is_live(&key, generation) {
                self.entries.remove(&key);
                return Some(key);
            }
        }
        None
    }

    fn compact(&mut self) {
        if self.order.len() <= 2 * self.entries.len() + COMPACT_SLACK {
            return;
        }
        let entries = &self.entries;
        self.order.retain(|(key, generation)| {
            entries.get(key).is_some_and(|e| e.generation == *generation)
        });
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// The bundled [`RangeCache`]: bounded by entry count, per-entry TTL, FIFO eviction.
///
/// ```
/// use std::time::Duration;
/// use hibp_range::{MemoryCache, MemoryCacheConfig, RangeCache};
///
/// let cache = MemoryCache::new(MemoryCacheConfig { max_entries: 2, ..Default::default() });
/// cache.set("aaaaa", "body a".into(), Duration::ZERO);
/// cache.set("bbbbb", "body b".into(), Duration::ZERO);
/// cache.set("ccccc", "body c".into(), Duration::ZERO);
///
/// assert_eq!(cache.get("aaaaa"), None);
/// assert_eq!(cache.get("ccccc").as_deref(), Some("body c"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryCache {
    inner: Mutex<Inner>,
    config: MemoryCacheConfig,
}

impl MemoryCache {
    /// A zero `default_ttl` is replaced by [`DEFAULT_TTL`].
    pub fn new(mut config: MemoryCacheConfig) -> Self {
        if config.default_ttl.is_zero() {
            config.default_ttl = DEFAULT_TTL;
        }
        Self { inner: Mutex::new(Inner::default()), config }
    }

    pub fn config(&self) -> &MemoryCacheConfig {
        &self.config
    }

    /// Number of stored entries, including expired ones that haven't been read yet.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats { entries: inner.entries.len(), ..inner.stats }
    }

    fn effective_ttl(&self, ttl: Duration) -> Duration {
        if ttl.is_zero() { self.config.default_ttl } else { ttl }
    }
}

impl RangeCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.inner.lock().get(key, now)
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        let expires_at = Instant::now().checked_add(self.effective_ttl(ttl));
        self.inner.lock().set(key, value, expires_at, self.config.max_entries);
    }
}
