#![cfg(test)]

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::alloc::{Global, Tracking};
use crate::collections::hash::LoadFactor;
use crate::util::alloc::CountedDrop;
use crate::util::error::KeyNotFound;
use crate::util::hash::{BadHasherBuilder, IdentityHasherBuilder, ManualHash};
use crate::util::panic::assert_panics;

fn identity_map<V>(bucket_count: usize) -> HashMap<u64, V, IdentityHasherBuilder> {
    HashMap::with_buckets_and_hasher(bucket_count, IdentityHasherBuilder)
}

fn tracked_map<V>(bucket_count: usize, tracking: &Tracking) -> HashMap<u64, V, IdentityHasherBuilder, Tracking> {
    HashMap::with_config_in(bucket_count, LoadFactor::DEFAULT, IdentityHasherBuilder, tracking.clone())
}

#[test]
fn test_insert_scenario() {
    let mut map = identity_map(2);

    assert!(map.insert(1, "a").1);
    assert_eq!(map.bucket_count(), 2, "1 / 2 doesn't exceed the load factor.");

    assert!(map.insert(2, "b").1);
    assert_eq!(map.bucket_count(), 4, "2 / 2 exceeds the load factor, so the map rehashes first.");

    assert!(map.insert(3, "c").1);
    assert_eq!(map.bucket_count(), 4, "3 / 4 is exactly the load factor.");

    assert_eq!(map.len(), 3);
    assert_eq!(map.at(&1), Ok(&"a"));
    assert_eq!(map.at(&2), Ok(&"b"));
    assert_eq!(map.at(&3), Ok(&"c"));
    assert_eq!(map.bucket(&3), 3);
    assert_eq!((0..4).map(|i| map.bucket_len(i)).collect::<Vec<_>>(), [0, 1, 1, 1]);
}

#[test]
fn test_insert_overwrites() {
    let mut map = identity_map(8);
    map.insert(5, String::from("five"));

    let (mut entry, inserted) = map.insert(5, String::from("FIVE"));
    assert!(!inserted);
    assert_eq!(entry.key(), &5);
    entry.get_mut().push('!');

    assert_eq!(map.len(), 1);
    assert_eq!(map[&5], "FIVE!");
}

#[test]
fn test_colliding_keys() {
    let mut map = HashMap::with_config_in(1, LoadFactor::new(100.0).unwrap(), BadHasherBuilder, Global);
    for i in 0..10 {
        map.insert(i, i * 10);
    }

    assert_eq!(map.bucket_count(), 1);
    assert_eq!(map.bucket_len(0), 10);
    assert_eq!(
        map.bucket_iter(0).map(|(k, _)| *k).collect::<Vec<_>>(),
        (0..10).collect::<Vec<_>>(),
        "New entries should be appended to the end of the chain."
    );

    // Head, middle and tail of the chain.
    assert_eq!(map.remove(&0), Some(0));
    assert_eq!(map.remove(&5), Some(50));
    assert_eq!(map.remove(&9), Some(90));
    assert_eq!(map.remove(&9), None);

    assert_eq!(map.len(), 7);
    for i in [1, 2, 3, 4, 6, 7, 8] {
        assert_eq!(map.get(&i), Some(&(i * 10)));
    }
}

#[test]
fn test_manual_hash_collisions() {
    let mut map = HashMap::with_buckets(4);
    map.insert(ManualHash::new(7, "x"), 1);
    map.insert(ManualHash::new(7, "y"), 2);
    map.insert(ManualHash::new(7, "x"), 3);

    assert_eq!(map.len(), 2, "Colliding keys are only equal if their values are.");
    assert_eq!(map.bucket_len(map.bucket(&ManualHash::new(7, "z"))), 2);
    assert_eq!(map.get(&ManualHash::new(7, "x")), Some(&3));
    assert_eq!(map.get(&ManualHash::new(7, "y")), Some(&2));
    assert_eq!(map.get(&ManualHash::new(7, "z")), None);
}

#[test]
fn test_load_factor_invariant() {
    let mut map = identity_map(1);

    for i in 0..1000 {
        map.insert(i * 7, i);
        assert!(
            map.load_factor() <= map.max_load_factor().get(),
            "Load factor {} exceeded after {} inserts.",
            map.load_factor(),
            i + 1
        );
    }

    assert_eq!(map.len(), 1000);
    for i in 0..1000 {
        assert_eq!(map.get(&(i * 7)), Some(&i));
    }
}

#[test]
fn test_rehash_preserves_entries_and_addresses() {
    let mut map = identity_map(4);
    for i in 0..3 {
        map.insert(i, i.to_string());
    }

    let before = map.get(&1).map(|v| v as *const String);

    map.rehash(map.bucket_count());
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&1).map(|v| v as *const String), before, "Rehashing shouldn't move entries.");

    map.rehash(64);
    assert_eq!(map.bucket_count(), 64);
    assert_eq!(map.get(&1).map(|v| v as *const String), before);

    map.rehash(0);
    assert_eq!(map.bucket_count(), 1);
    for i in 0..3 {
        assert_eq!(map.at(&i), Ok(&i.to_string()));
    }
}

#[test]
fn test_rehash_alloc_failure_leaves_map_untouched() {
    let tracking = Tracking::new();
    let mut map = tracked_map(4, &tracking);
    for i in 0..3 {
        map.insert(i, i);
    }

    tracking.set_budget(Some(0));
    assert!(map.try_rehash(16).is_err_and(|e| e.is_alloc_error()));
    assert!(map.try_insert(3, 3).is_err(), "The insert needs a rehash, which can't allocate.");

    assert_eq!(map.bucket_count(), 4);
    assert_eq!(map.len(), 3);
    assert!(!map.contains_key(&3));
    for i in 0..3 {
        assert_eq!(map.get(&i), Some(&i));
    }
}

#[test]
fn test_node_alloc_failure() {
    let tracking = Tracking::new();
    let mut map = tracked_map(4, &tracking);
    for i in 0..3 {
        map.insert(i, i);
    }

    // Enough for the new bucket array but not for the node.
    tracking.set_budget(Some(1));
    assert!(map.try_insert(3, 3).is_err());
    assert_eq!(map.bucket_count(), 8, "The completed rehash is kept.");
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&3), None);
}

#[test]
fn test_no_leaks() {
    let tracking = Tracking::new();
    let drops = Rc::new(Cell::new(0));
    let mut map = tracked_map(2, &tracking);

    for i in 0..20 {
        map.insert(i, CountedDrop::new(&drops));
    }
    assert_eq!(tracking.live_blocks(), 21, "One block per entry, plus the bucket array.");

    drop(map.remove(&4));
    assert_eq!(drops.get(), 1);
    assert_eq!(tracking.live_blocks(), 20);

    map.clear();
    assert_eq!(drops.get(), 20);
    assert_eq!(tracking.live_blocks(), 1, "Clearing keeps the bucket array.");
    assert!(map.is_empty());

    map.insert(1, CountedDrop::new(&drops));
    drop(map);
    assert_eq!(drops.get(), 21);
    assert_eq!(tracking.live_blocks(), 0);
}

#[test]
fn test_at_and_index() {
    let mut map = identity_map(8);
    map.insert(1, 10);

    assert_eq!(map.at(&2), Err(KeyNotFound));
    assert_eq!(map.at_mut(&2), Err(KeyNotFound));
    *map.at_mut(&1).expect("key 1 is present") += 1;
    assert_eq!(map[&1], 11);

    assert_panics!({
        let _ = map[&2];
    });
    assert_eq!(map.len(), 1, "Indexing shouldn't insert.");
}

#[test]
fn test_get_or_insert() {
    let mut map: HashMap<String, Vec<u8>> = HashMap::new();

    map.get_or_insert_default(String::from("a")).push(1);
    map.get_or_insert_default(String::from("a")).push(2);
    map.get_or_insert_with(String::from("b"), || vec![9]).push(3);

    assert_eq!(map.get("a"), Some(&vec![1, 2]));
    assert_eq!(map.get("b"), Some(&vec![9, 3]));
    assert_eq!(map.len(), 2);
}

#[test]
fn test_retain() {
    let drops = Rc::new(Cell::new(0));
    let mut map = HashMap::with_config_in(1, LoadFactor::new(100.0).unwrap(), BadHasherBuilder, Global);
    for i in 0..6 {
        map.insert(i, CountedDrop::new(&drops));
    }

    map.retain(|k, _| k % 2 == 1);
    assert_eq!(map.len(), 3);
    assert_eq!(drops.get(), 3);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 5]);
}

#[test]
fn test_reserve() {
    let mut map: HashMap<u64, u64, _> = identity_map(2);

    map.reserve(10);
    assert_eq!(map.bucket_count(), 14);

    map.reserve(5);
    assert_eq!(map.bucket_count(), 14, "Reserving never shrinks the bucket array.");

    for i in 0..10 {
        map.insert(i, i);
    }
    assert_eq!(map.bucket_count(), 14, "Reserved insertions shouldn't rehash.");
}

#[test]
fn test_set_max_load_factor() {
    let mut map = identity_map(8);
    for i in 0..6 {
        map.insert(i, ());
    }

    map.set_max_load_factor(LoadFactor::new(0.5).unwrap());
    assert_eq!(map.bucket_count(), 12);
    assert!(map.load_factor() <= 0.5);
    assert_eq!(map.len(), 6);
}

#[test]
fn test_iteration() {
    let mut map = identity_map(8);
    for (k, v) in [(3, 'c'), (1, 'a'), (2, 'b')] {
        map.insert(k, v);
    }

    let iter = map.iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.collect::<Vec<_>>(), [(&1, &'a'), (&2, &'b'), (&3, &'c')], "Bucket order.");

    for (_, v) in map.iter_mut() {
        *v = v.to_ascii_uppercase();
    }
    for v in map.values_mut() {
        v.make_ascii_lowercase();
    }
    assert_eq!(map.values().collect::<String>(), "abc");
    assert_eq!(map.keys().sum::<u64>(), 6);

    let (entry, _) = map.insert(2, 'B');
    assert_eq!(entry.bucket(), 2);
    assert_eq!(entry.iter().map(|(_, v)| *v).collect::<String>(), "Bc");

    assert_eq!(map.clone().into_keys().collect::<Vec<_>>(), [1, 2, 3]);
    assert_eq!(map.into_values().collect::<String>(), "aBc");
}

#[test]
fn test_partially_consumed_into_iter() {
    let tracking = Tracking::new();
    let drops = Rc::new(Cell::new(0));
    let mut map = tracked_map(8, &tracking);
    for i in 0..5 {
        map.insert(i, CountedDrop::new(&drops));
    }

    let mut iter = map.into_iter();
    assert_eq!(tracking.live_blocks(), 5, "The bucket array is released straight away.");
    assert_eq!(iter.len(), 5);
    drop(iter.next());
    assert_eq!(drops.get(), 1);

    drop(iter);
    assert_eq!(drops.get(), 5);
    assert_eq!(tracking.live_blocks(), 0);
}

#[test]
fn test_drain() {
    let mut map = identity_map(8);
    for i in 0..4 {
        map.insert(i, i * 2);
    }

    let mut drain = map.drain();
    assert_eq!(drain.len(), 4);
    assert_eq!(drain.next(), Some((0, 0)));
    drop(drain);

    assert!(map.is_empty());
    assert_eq!(map.bucket_count(), 8);
    assert_eq!(map.iter().count(), 0);

    map.insert(1, 1);
    assert_eq!(map.get(&1), Some(&1));
}

#[test]
fn test_clone_and_eq() {
    let mut map = identity_map(2);
    for i in 0..5 {
        map.insert(i, i.to_string());
    }

    let mut copy = map.clone();
    assert_eq!(copy, map);
    assert_eq!(copy.bucket_count(), map.bucket_count());

    copy.get_mut(&0).expect("key 0 was cloned").push('!');
    assert_ne!(copy, map);
    assert_eq!(map[&0], "0");

    // Equality doesn't depend on layout or insertion order.
    let mut other = identity_map(64);
    for i in (0..5).rev() {
        other.insert(i, i.to_string());
    }
    assert_eq!(map, other);

    other.remove(&4);
    assert_ne!(map, other);
}

#[test]
fn test_from_iter_and_extend() {
    let mut map: HashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    map.extend([("b", 20), ("c", 30)]);

    assert_eq!(map.len(), 3);
    assert_eq!(map[&"b"], 20);
    assert!(map.contains_key(&"c"));
    assert_eq!(map.get_key_value(&"a"), Some((&"a", &1)));
}

#[test]
fn test_borrowed_lookup() {
    let mut map = HashMap::new();
    map.insert(String::from("key"), 1);

    assert_eq!(map.get("key"), Some(&1));
    assert_eq!(map.remove_entry("key"), Some((String::from("key"), 1)));
    assert!(map.is_empty());
}

#[test]
fn test_bucket_out_of_range() {
    let map: HashMap<u64, (), _> = identity_map(4);
    assert_panics!({ map.bucket_len(4) });
}

#[test]
fn test_formatting() {
    let mut map = identity_map(2);
    map.insert(1, "a");

    assert_eq!(format!("{map}"), "#{1: \"a\"}");
    assert_eq!(
        format!("{map:?}"),
        "HashMap { buckets: [-, (1: \"a\")], len: 1, load_factor: LoadFactor(0.75), hasher: IdentityHasherBuilder }"
    );

    let mut chained = HashMap::with_config_in(1, LoadFactor::new(4.0).unwrap(), IdentityHasherBuilder, Global);
    chained.insert(1_u64, "a");
    chained.insert(3, "c");
    assert_eq!(format!("{chained:?}").split_once(", len").map(|(b, _)| b), Some("HashMap { buckets: [(1: \"a\") -> (3: \"c\")]"));
}
