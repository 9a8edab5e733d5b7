#![cfg(not(shardmap_loom))]
#![allow(unused_crate_dependencies, reason = "These are tests, not the main crate.")]

use std::collections::BTreeSet;

use oorandom::Rand32;

use anchored_shardmap::{Entry, Error, ShardedSkiplist, hash};


fn value_of(key: u64) -> Vec<u8> {
    format!("value-{key}").into_bytes()
}

fn keys<V>(entries: &[Entry<V>]) -> Vec<u64> {
    entries.iter().map(Entry::key).collect()
}

fn for_each_keys<V: Clone>(map: &ShardedSkiplist<V>) -> Vec<u64> {
    let mut visited = Vec::new();
    map.for_each(|entry| {
        visited.push(entry.key());
        true
    });
    visited
}

#[test]
fn ascending_inserts_then_extremes() {
    let map = ShardedSkiplist::new(8).unwrap();

    for key in (2..=10).chain([1, 2018]) {
        map.insert(key, value_of(key));
    }

    assert_eq!(map.len(), 11);
    assert_eq!(map.search(2018), Some(value_of(2018)));
    assert_eq!(map.search(1024), None);
}

#[test]
fn deletions_leave_the_rest_intact() {
    let map = ShardedSkiplist::new(12).unwrap();

    for key in 0..=10 {
        map.insert(key, value_of(key));
    }
    for key in [5, 1, 11] {
        map.delete(key);
    }

    assert_eq!(map.len(), 9);
    assert_eq!(map.search(5), None);
    assert_eq!(map.search(1), None);
    for key in (0..=10).filter(|key| ![1, 5].contains(key)) {
        assert_eq!(map.search(key), Some(value_of(key)), "key {key}");
    }
}

#[test]
fn keys_at_both_ends_of_the_key_space() {
    let map = ShardedSkiplist::new(16).unwrap();

    assert_eq!(map.search(0), None);
    assert_eq!(map.search(u64::MAX), None);

    map.insert(u64::MAX, "X");
    map.insert(0, "Y");

    assert_eq!(map.search(u64::MAX), Some("X"));
    assert_eq!(map.search(0), Some("Y"));
    assert_eq!(for_each_keys(&map), [0, u64::MAX]);
    assert_eq!(map.shard_lens()[0], 1);
    assert_eq!(map.shard_lens()[31], 1);
}

#[test]
fn invalid_max_levels_are_rejected() {
    for max_level in [0, 33, usize::MAX] {
        let err = ShardedSkiplist::<String>::new(max_level).unwrap_err();
        assert_eq!(err, Error::InvalidMaxLevel { max_level });
    }

    for max_level in 1..=32 {
        assert_eq!(ShardedSkiplist::<String>::new(max_level).unwrap().level(), max_level);
    }
}

#[test]
fn expected_len_picks_a_level() {
    assert_eq!(ShardedSkiplist::<String>::with_expected_len(0).unwrap().level(), 1);
    assert_eq!(ShardedSkiplist::<String>::with_expected_len(10_000_000).unwrap().level(), 12);
    assert_eq!(ShardedSkiplist::<String>::default().level(), 12);
}

#[test]
fn round_trip_and_overwrite() {
    let map = ShardedSkiplist::new_seeded(10, 4).unwrap();

    map.insert(77, String::from("first"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.search(77).as_deref(), Some("first"));
    assert!(map.contains(77));

    map.insert(77, String::from("second"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.search(77).as_deref(), Some("second"));
    assert_eq!(map.search_with(77, String::len), Some(6));
}

#[test]
fn deleting_absent_keys_changes_nothing() {
    let map = ShardedSkiplist::new_seeded(10, 4).unwrap();
    map.insert(1 << 60, vec![1_u8]);

    map.delete(3);
    map.delete((1 << 60) + 1);
    assert_eq!(map.len(), 1);

    map.delete(1 << 60);
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    map.delete(1 << 60);
    assert_eq!(map.len(), 0);
}

/// Empty values are rejected rather than stored as "present but empty". This is a deliberate
/// choice, so that presence in the map always means a non-empty value.
#[test]
fn empty_values_are_rejected() {
    let map = ShardedSkiplist::new_seeded(6, 8).unwrap();

    map.insert(9, Vec::new());
    assert_eq!(map.len(), 0);
    assert_eq!(map.search(9), None);

    map.insert(9, vec![3_u8]);
    map.insert(9, Vec::new());
    assert_eq!(map.len(), 1);
    assert_eq!(map.search(9), Some(vec![3_u8]));

    let strs = ShardedSkiplist::new_seeded(6, 8).unwrap();
    strs.insert(1, "");
    strs.insert(2, "two");
    assert_eq!(keys(&strs.snapshot()), [2]);

    let options = ShardedSkiplist::new_seeded(6, 8).unwrap();
    options.insert(1, None);
    options.insert(2, Some(0_u32));
    let pairs: Vec<(u64, Option<u32>)> = options.snapshot().into_iter().map(Into::into).collect();
    assert_eq!(pairs, [(2, Some(0))]);
}

#[test]
fn for_each_is_ordered_across_shards() {
    let map = ShardedSkiplist::new_seeded(12, 21).unwrap();
    let mut prng = Rand32::new(5);
    let mut model = BTreeSet::new();

    for _ in 0..5_000 {
        let key = hash(&prng.rand_u32().to_le_bytes());
        if prng.rand_range(0..4) == 0 {
            map.delete(key);
            model.remove(&key);
        } else {
            map.insert(key, value_of(key));
            model.insert(key);
        }
    }

    let visited = for_each_keys(&map);
    assert!(visited.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(visited, model.into_iter().collect::<Vec<_>>());
    assert_eq!(visited.len(), map.len());
    assert_eq!(keys(&map.snapshot()), visited);
}

#[test]
fn for_each_stops_when_told() {
    let map = ShardedSkiplist::new_seeded(12, 21).unwrap();
    for key in 0..100_u64 {
        map.insert(key.wrapping_mul(0x9E37_79B9_7F4A_7C15), value_of(key));
    }

    let mut calls = 0;
    map.for_each(|_| {
        calls += 1;
        false
    });
    assert_eq!(calls, 1);

    let mut calls = 0;
    map.for_each(|_| {
        calls += 1;
        calls < 40
    });
    assert_eq!(calls, 40);
}

#[test]
fn for_each_may_write_to_the_map() {
    let map = ShardedSkiplist::new_seeded(8, 2).unwrap();
    for key in [1, 2, 3, 1 << 62, 1 << 63] {
        map.insert(key, value_of(key));
    }

    map.for_each(|entry| {
        map.delete(entry.key());
        true
    });

    assert!(map.is_empty());
}

#[test]
fn sub_matches_sorted_slices() {
    let map = ShardedSkiplist::new_seeded(12, 99).unwrap();
    let mut sorted: Vec<u64> = (0..300_u32).map(|n| hash(&n.to_be_bytes())).collect();
    for &key in &sorted {
        map.insert(key, value_of(key));
    }
    sorted.sort_unstable();
    let len = sorted.len();

    for start in [0, 1, 7, 9, 10, 150, 298, 299] {
        for count in [1, 2, 10, 33, 299, 300, 1_000] {
            let expected = &sorted[start..len.min(start + count)];
            let sub = map.sub(start.try_into().unwrap(), count.try_into().unwrap());
            assert_eq!(keys(&sub), expected, "sub({start}, {count})");
            assert!(sub.iter().all(|entry| *entry.value() == value_of(entry.key())));
        }
    }
}

#[test]
fn sub_edge_cases_are_empty() {
    let map = ShardedSkiplist::new_seeded(12, 99).unwrap();
    assert!(map.sub(0, 1).is_empty());

    for key in 0..10 {
        map.insert(key, value_of(key));
    }

    assert!(map.sub(-1, 5).is_empty());
    assert!(map.sub(isize::MIN, isize::MAX).is_empty());
    assert!(map.sub(0, 0).is_empty());
    assert!(map.sub(3, -2).is_empty());
    assert!(map.sub(10, 1).is_empty());
    assert!(map.sub(isize::MAX, 1).is_empty());
    assert_eq!(keys(&map.sub(9, isize::MAX)), [9]);
    assert_eq!(keys(&map.sub(0, isize::MAX)), (0..10_u64).collect::<Vec<_>>());
}
