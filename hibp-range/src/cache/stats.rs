/// Counters for a [`MemoryCache`](super::MemoryCache).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    /// Lookups that found nothing, including expired entries.
    pub misses: u64,
    /// Entries dropped to stay within `max_entries`.
    pub evictions: u64,
    /// Entries dropped on read because their TTL had passed.
    pub expirations: u64,
    /// Entries currently held, including expired ones not yet read.
    pub entries: usize,
}

impl CacheStats {
    /// Returns hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
    }
}
