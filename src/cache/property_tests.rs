//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the provider's observable behavior against a
//! simple model and the memory store's capacity and statistics bookkeeping.

use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::cache::{
    CacheExpirationPolicy, CacheKey, CacheProvider, MemoryStore, PrimitiveStore, TtlSpec,
};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 1000;

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "k[0-7]"
}

fn tag_strategy() -> impl Strategy<Value = String> {
    "[A-D]"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,16}"
}

fn tags_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(tag_strategy(), 0..3)
}

#[derive(Debug, Clone)]
enum ProviderOp {
    Add { key: String, tags: BTreeSet<String>, value: String },
    Set { key: String, tags: BTreeSet<String>, value: String },
    Get { key: String },
    Remove { key: String },
    Expire { tag: String },
}

fn provider_op_strategy() -> impl Strategy<Value = ProviderOp> {
    prop_oneof![
        (key_strategy(), tags_strategy(), value_strategy())
            .prop_map(|(key, tags, value)| ProviderOp::Add { key, tags, value }),
        (key_strategy(), tags_strategy(), value_strategy())
            .prop_map(|(key, tags, value)| ProviderOp::Set { key, tags, value }),
        key_strategy().prop_map(|key| ProviderOp::Get { key }),
        key_strategy().prop_map(|key| ProviderOp::Remove { key }),
        tag_strategy().prop_map(|tag| ProviderOp::Expire { tag }),
    ]
}

fn provider() -> CacheProvider<String> {
    CacheProvider::new(Arc::new(MemoryStore::new(TEST_MAX_ENTRIES)))
}

fn key_with(key: &str, tags: &BTreeSet<String>) -> CacheKey {
    CacheKey::new(key).with_tags(tags.iter().cloned())
}

/// Reference model: live entries and the tags each depends on.
#[derive(Default)]
struct Model {
    entries: HashMap<String, (String, BTreeSet<String>)>,
}

impl Model {
    fn expire(&mut self, tag: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, (_, tags)| !tags.contains(tag));
        before - self.entries.len()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every operation sequence agrees with the model: add-if-absent, overwrite,
    // remove and tag fan-out all behave as a plain map with tag-scoped deletes.
    #[test]
    fn prop_provider_matches_model(ops in prop::collection::vec(provider_op_strategy(), 1..60)) {
        let cache = provider();
        let policy = CacheExpirationPolicy::none();
        let mut model = Model::default();

        for op in ops {
            match op {
                ProviderOp::Add { key, tags, value } => {
                    let cache_key = key_with(&key, &tags);
                    let inserted = cache.add(&cache_key, value.clone(), &policy).unwrap();
                    let expected = !model.entries.contains_key(&key);
                    prop_assert_eq!(inserted, expected, "Add '{}'", key);
                    if expected {
                        model.entries.insert(key, (value, tags));
                    }
                }
                ProviderOp::Set { key, tags, value } => {
                    let cache_key = key_with(&key, &tags);
                    prop_assert!(cache.set(&cache_key, value.clone(), &policy).unwrap());
                    model.entries.insert(key, (value, tags));
                }
                ProviderOp::Get { key } => {
                    let got = cache.get(&CacheKey::new(key.as_str())).unwrap();
                    let expected = model.entries.get(&key).map(|(value, _)| value.clone());
                    prop_assert_eq!(got, expected, "Get '{}'", key);
                }
                ProviderOp::Remove { key } => {
                    let removed = cache.remove(&CacheKey::new(key.as_str())).unwrap();
                    let expected = model.entries.remove(&key).map(|(value, _)| value);
                    prop_assert_eq!(removed, expected, "Remove '{}'", key);
                }
                ProviderOp::Expire { tag } => {
                    let evicted = cache.expire(&tag).unwrap();
                    let expected = model.expire(&tag);
                    prop_assert_eq!(evicted, expected, "Expire '{}'", tag);
                }
            }
        }
    }

    // Expiring one tag never touches entries that do not depend on it.
    #[test]
    fn prop_tag_isolation(
        tagged in prop::collection::btree_map(key_strategy(), tag_strategy(), 1..8),
        expired in tag_strategy()
    ) {
        let cache = provider();
        let policy = CacheExpirationPolicy::none();

        for (key, tag) in &tagged {
            let cache_key = CacheKey::new(key.as_str()).with_tag(tag.as_str());
            cache.add(&cache_key, format!("value_{}", key), &policy).unwrap();
        }

        cache.expire(&expired).unwrap();

        for (key, tag) in &tagged {
            let got = cache.get(&CacheKey::new(key.as_str())).unwrap();
            if *tag == expired {
                prop_assert!(got.is_none(), "'{}' tagged '{}' should be gone", key, tag);
            } else {
                prop_assert_eq!(got, Some(format!("value_{}", key)));
            }
        }
    }

    // The store never holds more than its configured bound.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(("[a-z0-9]{1,8}", value_strategy()), 1..200)
    ) {
        let max_entries = 50;
        let store = MemoryStore::new(max_entries);

        for (key, value) in entries {
            store.set(&key, value, TtlSpec::Infinite).unwrap();
            let len = store.len().unwrap();
            prop_assert!(len <= max_entries, "Store size {} exceeds max {}", len, max_entries);
        }
    }

    // Hits and misses count every read.
    #[test]
    fn prop_statistics_accuracy(
        writes in prop::collection::vec(key_strategy(), 0..20),
        reads in prop::collection::vec(key_strategy(), 1..40)
    ) {
        let store = MemoryStore::new(TEST_MAX_ENTRIES);
        for key in &writes {
            store.set(key, "value".to_string(), TtlSpec::Infinite).unwrap();
        }

        let mut expected_hits = 0;
        let mut expected_misses = 0;
        for key in &reads {
            if store.get(key).unwrap().is_some() {
                expected_hits += 1;
            } else {
                expected_misses += 1;
            }
            prop_assert_eq!(store.contains(key).unwrap(), writes.contains(key));
        }

        let stats = store.stats().unwrap();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, store.len().unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Concurrent adds of one key: exactly one caller wins and its value sticks.
    #[test]
    fn prop_concurrent_add_single_winner(threads in 2usize..8, key in key_strategy()) {
        let cache = provider();
        let cache_key = CacheKey::new(key.as_str()).with_tag("A");
        let policy = CacheExpirationPolicy::none();

        let winners: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|i| {
                    let cache = &cache;
                    let cache_key = &cache_key;
                    let policy = &policy;
                    scope.spawn(move || {
                        cache.add(cache_key, format!("value_{}", i), policy).unwrap().then_some(i)
                    })
                })
                .collect();
            handles
                .into_iter()
                .filter_map(|handle| handle.join().unwrap())
                .collect()
        });

        prop_assert_eq!(winners.len(), 1);
        prop_assert_eq!(
            cache.get(&cache_key).unwrap(),
            Some(format!("value_{}", winners[0]))
        );
    }
}
