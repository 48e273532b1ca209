//! Caching of range responses keyed by hash prefix.
//!
//! [`RangeCache`] is the plug-in point: anything that can get and set a string
//! body by prefix can back a [`BreachClient`](crate::BreachClient). [`MemoryCache`]
//! is the bundled in-process implementation.

mod memory;
mod stats;

#[cfg(test)]
mod property_tests;

use std::time::Duration;

pub use memory::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL, MemoryCache, MemoryCacheConfig};
pub use stats::CacheStats;

/// A thread-safe store of raw range bodies keyed by prefix.
///
/// Implementations must be callable concurrently without external locking.
pub trait RangeCache: Send + Sync {
    /// Returns a copy of the live value for `key`, or `None` if absent or expired.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` for `ttl`. A zero `ttl` means the
    /// implementation's default.
    fn set(&self, key: &str, value: String, ttl: Duration);
}
