//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache's ordering, freshness and partition
//! properties over generated inputs.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{Cache, CacheValue, Document, ManualClock, Primitive};
use crate::error::CacheError;

// == Test Configuration ==
const TEST_CLOCK_START: i64 = 1_000_000;

fn test_store() -> Cache<u64> {
    Cache::with_clock(Arc::new(ManualClock::new(TEST_CLOCK_START)))
}

// == Strategies ==
/// Generates ids from a small range so collisions happen
fn id_strategy() -> impl Strategy<Value = u64> {
    0u64..32
}

/// Generates immutable primitives of every type
fn primitive_strategy() -> impl Strategy<Value = Primitive> {
    let leaf = prop_oneof![
        "[a-z]{0,8}".prop_map(Primitive::Str),
        any::<i64>().prop_map(Primitive::Int),
        (-1.0e6f64..1.0e6).prop_map(Primitive::Float),
        any::<bool>().prop_map(Primitive::Bool),
    ]
    .boxed();
    prop_oneof![
        4 => leaf.clone(),
        1 => prop::collection::vec(leaf.clone(), 0..4).prop_map(Primitive::Tuple),
        1 => prop::collection::vec(leaf, 0..4).prop_map(Primitive::frozenset),
    ]
}

/// Generates either a primitive or a document
fn value_strategy() -> impl Strategy<Value = CacheValue> {
    prop_oneof![
        3 => primitive_strategy().prop_map(CacheValue::Immutable),
        1 => Just(()).prop_map(|_| CacheValue::mutable(Document::new())),
    ]
}

fn max_age_strategy() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![Just(None), Just(Some(0)), (1i64..10_000).prop_map(Some)]
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Add { id: u64, value: Primitive },
    Remove { id: u64 },
    PopItem,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (id_strategy(), primitive_strategy())
            .prop_map(|(id, value)| CacheOp::Add { id, value }),
        1 => id_strategy().prop_map(|id| CacheOp::Remove { id }),
        1 => Just(CacheOp::PopItem),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Round trip: add then get returns what was stored.
    #[test]
    fn prop_roundtrip_storage(
        id in id_strategy(),
        value in primitive_strategy(),
        fetched_time in 0i64..TEST_CLOCK_START,
        max_age in max_age_strategy()
    ) {
        let mut store = test_store();

        store.add(id, value.clone(), fetched_time, max_age).unwrap();

        let entry = store.get(&id).unwrap();
        prop_assert_eq!(entry.value(), &CacheValue::Immutable(value));
        prop_assert_eq!(entry.fetched_time(), fetched_time);
        prop_assert_eq!(entry.max_age(), max_age);
    }

    // A duplicate add fails and leaves the original entry in place.
    #[test]
    fn prop_duplicate_add_rejected(
        id in id_strategy(),
        first in primitive_strategy(),
        second in primitive_strategy()
    ) {
        let mut store = test_store();

        store.add(id, first.clone(), 10, Some(5)).unwrap();
        let result = store.add(id, second, 20, None);

        prop_assert!(matches!(result, Err(CacheError::DuplicateKey(_))));
        let entry = store.get(&id).unwrap();
        prop_assert_eq!(entry.value(), &CacheValue::Immutable(first));
        prop_assert_eq!(entry.fetched_time(), 10);
        prop_assert_eq!(entry.max_age(), Some(5));
    }

    // Stale and fresh are exclusive and exhaustive at every instant.
    #[test]
    fn prop_stale_fresh_exclusive(
        fetched_time in 0i64..10_000,
        max_age in max_age_strategy(),
        now in 0i64..30_000
    ) {
        let mut store = test_store();
        store.add(1, "v", fetched_time, max_age).unwrap();

        let entry = store.get(&1).unwrap();
        prop_assert_ne!(entry.is_stale(now), entry.is_fresh(now));

        let stale = store.stale(now);
        let fresh = store.fresh(now);
        prop_assert_eq!(stale.len() + fresh.len(), 1);
    }

    // Remove then get reports the entry as missing.
    #[test]
    fn prop_remove_then_get(id in id_strategy(), value in primitive_strategy()) {
        let mut store = test_store();

        store.add(id, value, 0, None).unwrap();
        prop_assert!(store.remove(&id).is_some());
        prop_assert!(store.get(&id).is_none());
        prop_assert!(matches!(store.get_value(&id), Err(CacheError::NotFound(_))));
    }

    // Insertion order is kept across any mix of adds and removals.
    #[test]
    fn prop_insertion_order_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = test_store();
        let mut model: Vec<u64> = Vec::new();

        for op in ops {
            match op {
                CacheOp::Add { id, value } => {
                    let result = store.add(id, value, 0, None);
                    if model.contains(&id) {
                        prop_assert!(result.is_err());
                    } else {
                        prop_assert!(result.is_ok());
                        model.push(id);
                    }
                }
                CacheOp::Remove { id } => {
                    let removed = store.remove(&id);
                    prop_assert_eq!(removed.is_some(), model.contains(&id));
                    model.retain(|k| *k != id);
                }
                CacheOp::PopItem => match store.popitem() {
                    Ok((id, _)) => prop_assert_eq!(Some(id), model.pop()),
                    Err(error) => {
                        prop_assert_eq!(error, CacheError::EmptyCache);
                        prop_assert!(model.is_empty());
                    }
                },
            }
        }

        prop_assert_eq!(store.keys().copied().collect::<Vec<_>>(), model.clone());
        prop_assert_eq!(store.copy().ids(), model.clone());
        prop_assert_eq!(store.len(), model.len());
    }

    // find keeps insertion order and only returns matching entries.
    #[test]
    fn prop_find_ordered_subsequence(
        ids in prop::collection::vec(id_strategy(), 1..20),
        threshold in 0u64..32
    ) {
        let mut store = test_store();
        let unique: Vec<u64> = {
            let mut seen = HashSet::new();
            ids.into_iter().filter(|id| seen.insert(*id)).collect()
        };
        for id in &unique {
            store.add(*id, *id as i64, 0, None).unwrap();
        }

        let found = store.find(|entry| *entry.id() >= threshold);
        let expected: Vec<u64> = unique.iter().copied().filter(|id| *id >= threshold).collect();
        prop_assert_eq!(found.ids(), expected);
    }

    // Mutable and immutable views partition the entry set.
    #[test]
    fn prop_mutable_immutable_partition(values in prop::collection::vec(value_strategy(), 0..20)) {
        let mut store = test_store();
        for (id, value) in values.into_iter().enumerate() {
            store.add(id as u64, value, 0, None).unwrap();
        }

        let mutable: HashSet<u64> = store.mutable().ids().into_iter().collect();
        let immutable: HashSet<u64> = store.immutable().ids().into_iter().collect();
        let all: HashSet<u64> = store.keys().copied().collect();

        prop_assert!(mutable.is_disjoint(&immutable));
        prop_assert_eq!(mutable.union(&immutable).copied().collect::<HashSet<_>>(), all);
    }

    // setdefault never overwrites an existing entry.
    #[test]
    fn prop_setdefault_keeps_first(
        id in id_strategy(),
        first in primitive_strategy(),
        second in primitive_strategy()
    ) {
        let mut store = test_store();

        store.setdefault(id, first.clone()).unwrap();
        let entry = store.setdefault(id, second).unwrap();

        prop_assert_eq!(entry.value(), &CacheValue::Immutable(first));
        prop_assert_eq!(entry.fetched_time(), TEST_CLOCK_START);
        prop_assert_eq!(store.len(), 1);
    }
}
