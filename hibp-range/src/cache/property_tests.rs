//! Model-based property tests for [`MemoryCache`] eviction order.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use proptest::prelude::*;

use super::{MemoryCache, MemoryCacheConfig, RangeCache};

const LONG: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: u8, value: u16 },
    Get { key: u8 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // A small key space so overwrites and evictions happen often.
    prop_oneof![
        (0u8..8, any::<u16>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        (0u8..8).prop_map(|key| CacheOp::Get { key }),
    ]
}

/// Straightforward FIFO reference: a map plus a queue with linear removal.
#[derive(Default)]
struct FifoModel {
    max: usize,
    map: HashMap<String, String>,
    order: VecDeque<String>,
}

impl FifoModel {
    fn set(&mut self, key: String, value: String) {
        if self.map.contains_key(&key) {
            self.map.insert(key, value);
            return;
        }
        if self.max > 0 && self.map.len() >= self.max {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.map.insert(key, value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_matches_fifo_model(
        max in 0usize..5,
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
    ) {
        let cache = MemoryCache::new(MemoryCacheConfig { max_entries: max, default_ttl: LONG });
        let mut model = FifoModel { max, ..Default::default() };

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(&key.to_string(), value.to_string(), LONG);
                    model.set(key.to_string(), value.to_string());
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key.to_string()), model.get(&key.to_string()));
                }
            }
            if max > 0 {
                prop_assert!(cache.len() <= max);
            }
        }
        prop_assert_eq!(cache.len(), model.map.len());
    }

    #[test]
    fn prop_stats_count_every_lookup(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let cache = MemoryCache::new(MemoryCacheConfig { max_entries: 4, default_ttl: LONG });
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(&key.to_string(), value.to_string(), LONG),
                CacheOp::Get { key } => match cache.get(&key.to_string()) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.entries, cache.len());
    }
}
