// ChainedHashMap integration tests.
//
// Each test states the behavior under test and the invariants it relies
// on. The core invariants exercised:
// - Lookup: get(k) is None for keys never inserted or already removed.
// - Overwrite: set(k, v1); set(k, v2) leaves get(k) == v2 and len unchanged.
// - Growth: len <= table_size * load_factor right after every insert.
// - Rehash: growth and load-factor lowering never change any lookup.
// - Ownership: the map releases keys and values exactly once, on remove,
//   overwrite (old value only) or drop.
// - No-op policy: removing absent keys and out-of-range load factors are
//   silent, not errors.
mod common;

use chained_hashmap::mix::bucket_index;
use chained_hashmap::{ChainedHashMap, Collection, StoreConfig, StoreError};
use std::collections::BTreeSet;
use std::hash::BuildHasher;
use std::rc::Rc;

// Test: construction from pairs with a duplicate key.
// Verifies: count 2, the later value wins, the first position is kept.
#[test]
fn scenario_a_from_pairs_deduplicates() {
    common::init_logger();
    let m = ChainedHashMap::from_pairs([("a", Some(1)), ("b", Some(2)), ("a", Some(3))]).unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(m.get("a"), Some(&3));
    assert_eq!(m.get("b"), Some(&2));
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(m.table_size(), 4);
}

// Test: a missing value anywhere rejects the whole construction.
#[test]
fn from_pairs_rejects_missing_value() {
    let res = ChainedHashMap::<&str, i32>::from_pairs([("a", Some(1)), ("b", None)]);
    assert!(matches!(res, Err(StoreError::InvalidArgument(_))));
}

#[test]
fn from_pairs_empty_uses_minimum_table() {
    let m = ChainedHashMap::<u32, u32>::from_pairs(std::iter::empty()).unwrap();
    assert!(m.is_empty());
    assert_eq!(m.table_size(), 2);
}

// Test: many duplicates leave the table sized for the distinct keys only.
#[test]
fn from_pairs_sizes_for_distinct_keys() {
    let pairs = (0..40u32).map(|i| (i % 3, i));
    let m = ChainedHashMap::try_from_iter(pairs).unwrap();
    assert_eq!(m.len(), 3);
    assert_eq!(m.table_size(), 4);
    assert_eq!(m.get(&0), Some(&39));
    assert_eq!(m.get(&1), Some(&37));
    assert_eq!(m.get(&2), Some(&38));
}

// Test: 100 distinct keys from the minimum table.
// Verifies: final size is the smallest power of two >= 100 / 0.75, every
// key is retrievable, and the growth invariant holds after each insert.
#[test]
fn scenario_b_growth_to_fit() {
    common::init_logger();
    let mut m = ChainedHashMap::new();
    assert_eq!(m.table_size(), 2);
    for i in 0..100u64 {
        m.insert(i, i * 2).unwrap();
        assert!(
            m.len() as f64 <= m.table_size() as f64 * m.load_factor(),
            "growth invariant violated at {} entries, size {}",
            m.len(),
            m.table_size()
        );
        assert!(m.table_size().is_power_of_two());
    }
    let expected = ((100.0f64 / 0.75).ceil() as usize).next_power_of_two();
    assert_eq!(m.table_size(), expected);
    assert_eq!(m.table_size(), 256);
    for i in 0..100u64 {
        assert_eq!(m.get(&i), Some(&(i * 2)));
    }
}

// Test: lowering the load factor on a populated table.
// Verifies: immediate rehash at an unchanged size of 64, bucket occupancy
// matches the mixing function, all keys remain; the next insert grows
// far enough to restore the growth invariant.
#[test]
fn scenario_c_lower_load_factor_rehashes_in_place() {
    common::init_logger();
    let config = StoreConfig::new()
        .with_initial_table_size(64)
        .with_load_factor(1.0);
    let mut m = ChainedHashMap::with_config(config).unwrap();
    for i in 0..50u32 {
        m.insert(i, i).unwrap();
    }
    assert_eq!(m.table_size(), 64);

    m.set_load_factor(0.1).unwrap();
    assert_eq!(m.load_factor(), 0.1);
    assert_eq!(m.table_size(), 64);
    for i in 0..50u32 {
        assert_eq!(m.get(&i), Some(&i));
    }

    let expected_buckets: BTreeSet<usize> = (0..50u32)
        .map(|i| bucket_index(m.hasher().hash_one(i), 64))
        .collect();
    let stats = m.chain_stats();
    assert_eq!(stats.count, 50);
    assert_eq!(stats.filled_buckets, expected_buckets.len());

    m.insert(50, 50).unwrap();
    assert!(51.0 <= m.table_size() as f64 * 0.1);
    assert_eq!(m.table_size(), 512);
    for i in 0..=50u32 {
        assert_eq!(m.get(&i), Some(&i));
    }
}

// Test: removal of an absent key on an empty map.
#[test]
fn scenario_d_remove_absent_is_noop() {
    let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
    assert_eq!(m.remove("ghost"), None);
    assert_eq!(m.len(), 0);
    assert_eq!(m.count(), 0);
}

// Test: insert, overwrite, remove, remove again.
#[test]
fn set_get_overwrite_remove() {
    let mut m = ChainedHashMap::new();
    assert_eq!(m.get("k"), None);
    m.insert("k".to_string(), 1).unwrap();
    assert_eq!(m.get("k"), Some(&1));

    let before = m.len();
    assert_eq!(m.insert("k".to_string(), 2).unwrap(), Some(1));
    assert_eq!(m.get("k"), Some(&2));
    assert_eq!(m.len(), before);

    m.insert("other".to_string(), 9).unwrap();
    let before = m.len();
    assert_eq!(m.remove("k"), Some(2));
    assert_eq!(m.get("k"), None);
    assert_eq!(m.len(), before - 1);
    assert_eq!(m.remove("k"), None);
    assert_eq!(m.len(), before - 1);
    assert!(m.contains_key("other"));
}

// Test: out-of-range and near-equal load factors are ignored silently.
#[test]
fn load_factor_quirks() {
    let mut m: ChainedHashMap<u32, u32> = ChainedHashMap::new();
    for lf in [1.5, -0.1, 0.0, f64::NAN, f64::INFINITY, 0.755] {
        assert_eq!(m.set_load_factor(lf), Ok(()));
        assert_eq!(m.load_factor(), 0.75, "lf {lf} must be ignored");
    }
    // Raising only affects later growth decisions.
    for i in 0..3 {
        m.insert(i, i).unwrap();
    }
    let size = m.table_size();
    m.set_load_factor(0.95).unwrap();
    assert_eq!(m.load_factor(), 0.95);
    assert_eq!(m.table_size(), size);
}

#[test]
fn with_config_validates() {
    let bad = StoreConfig::new().with_initial_table_size(3);
    assert!(matches!(
        ChainedHashMap::<u32, u32>::with_config(bad),
        Err(StoreError::InvalidArgument(_))
    ));
    let bad = StoreConfig::new().with_load_factor(0.0);
    assert!(ChainedHashMap::<u32, u32>::with_config(bad).is_err());
}

// Test: iteration follows insertion order across growth and removals.
#[test]
fn iteration_in_insertion_order() {
    let mut m = ChainedHashMap::new();
    let words = ["delta", "alpha", "charlie", "bravo", "echo", "foxtrot"];
    for (i, w) in words.iter().enumerate() {
        m.insert(*w, i).unwrap();
    }
    m.remove("charlie");
    let seen: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(
        seen,
        vec![("delta", 0), ("alpha", 1), ("bravo", 3), ("echo", 4), ("foxtrot", 5)]
    );
    assert_eq!(m.values().copied().sum::<usize>(), 13);
    assert_eq!(m.first(), Some((&"delta", &0)));
    assert_eq!(m.last(), Some((&"foxtrot", &5)));
    assert_eq!((&m).into_iter().count(), m.len());
}

// Test: ownership of shared keys and values.
// Verifies: the map holds one strong count per stored key/value; overwrite
// releases only the old value; remove and drop release everything.
#[test]
fn shared_ownership_is_released() {
    let k1 = Rc::new("k1".to_string());
    let k2 = Rc::new("k2".to_string());
    let v1 = Rc::new(1);
    let v2 = Rc::new(2);
    let v3 = Rc::new(3);

    let mut m: ChainedHashMap<Rc<String>, Rc<i32>> = ChainedHashMap::new();
    m.insert(Rc::clone(&k1), Rc::clone(&v1)).unwrap();
    m.insert(Rc::clone(&k2), Rc::clone(&v2)).unwrap();
    assert_eq!(Rc::strong_count(&k1), 2);
    assert_eq!(Rc::strong_count(&v1), 2);

    // Overwrite: the stored key stays, the duplicate key is dropped.
    let old = m.insert(Rc::clone(&k1), Rc::clone(&v3)).unwrap();
    drop(old);
    assert_eq!(Rc::strong_count(&k1), 2);
    assert_eq!(Rc::strong_count(&v1), 1);
    assert_eq!(Rc::strong_count(&v3), 2);

    // Growth rebuilds chains but never touches entries.
    for i in 0..32 {
        m.insert(Rc::new(format!("filler{i}")), Rc::new(i)).unwrap();
    }
    assert_eq!(Rc::strong_count(&k1), 2);
    assert_eq!(Rc::strong_count(&v3), 2);

    let (k, v) = m.remove_entry(&k2).unwrap();
    drop((k, v));
    assert_eq!(Rc::strong_count(&k2), 1);
    assert_eq!(Rc::strong_count(&v2), 1);

    drop(m);
    assert_eq!(Rc::strong_count(&k1), 1);
    assert_eq!(Rc::strong_count(&v3), 1);
}

// Test: heavy collisions through a constant hasher.
// Verifies: equality alone resolves entries; growth does not split them
// (all raw hashes are equal) and nothing is lost.
#[test]
fn constant_hasher_collisions() {
    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    impl std::hash::Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            42
        }
    }

    let mut m = ChainedHashMap::with_hasher(ConstBuildHasher);
    for i in 0..64u32 {
        m.insert(i.to_string(), i).unwrap();
    }
    let stats = m.chain_stats();
    assert_eq!(stats.filled_buckets, 1);
    assert_eq!(stats.max_chain, 64);
    for i in 0..64u32 {
        assert_eq!(m.get(i.to_string().as_str()), Some(&i));
    }
    assert_eq!(m.remove("10"), Some(10));
    assert_eq!(m.get("10"), None);
    assert_eq!(m.len(), 63);
}

// Test: chain statistics add up for a well-spread hasher.
#[test]
fn chain_stats_account_for_every_entry() {
    let mut m = ChainedHashMap::new();
    for i in 0..200u32 {
        m.insert(i, ()).unwrap();
    }
    let s = m.chain_stats();
    assert_eq!(s.table_size, m.table_size());
    assert_eq!(s.count, 200);
    assert_eq!(s.empty_buckets + s.filled_buckets, s.table_size);
    assert!(s.min_chain >= 1);
    assert!(s.max_chain >= s.min_chain);
    assert!(s.mean_chain() >= 1.0);
}
