//! Property-Based Tests for the TTL cache

use proptest::prelude::*;

use crate::cache::TtlCache;

const TEST_DEFAULT_TTL: i64 = 300;

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}:all"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Invalidate { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses add up to the number of lookups performed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut cache = TtlCache::new(TEST_DEFAULT_TTL);
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value, None),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Invalidate { key } => cache.invalidate(&key),
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, cache.len());
    }

    // A read never observes a value that was invalidated after it was set.
    #[test]
    fn prop_invalidate_wins_over_earlier_set(
        key in key_strategy(),
        value in any::<u32>(),
    ) {
        let mut cache = TtlCache::new(TEST_DEFAULT_TTL);
        cache.set(key.clone(), value, None);
        prop_assert_eq!(cache.get(&key), Some(value));

        cache.invalidate(&key);
        prop_assert_eq!(cache.get(&key), None);
    }

    // Populating with a stale generation is always refused.
    #[test]
    fn prop_stale_generation_never_stored(
        key in key_strategy(),
        invalidations in 1usize..5,
        value in any::<u32>(),
    ) {
        let mut cache = TtlCache::new(TEST_DEFAULT_TTL);
        let generation = cache.generation(&key);
        for _ in 0..invalidations {
            cache.invalidate(&key);
        }

        prop_assert!(!cache.set_if_current(&key, generation, value, None));
        prop_assert_eq!(cache.get(&key), None);
    }
}
