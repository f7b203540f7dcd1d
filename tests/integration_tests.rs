use sharded_map::{Error, HashFunction, ShardedMap, ShardedMapBuilder};
use std::collections::HashMap as StdHashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct NodeId(u32);

fn identity_map<V>() -> ShardedMap<NodeId, V> {
    ShardedMapBuilder::new()
        .shard_count(10)
        .unwrap()
        .hash_function(HashFunction::Identity)
        .build()
        .unwrap()
}

#[test]
fn test_basic_insert_get() {
    let map = ShardedMap::new();

    assert!(map.insert("key1", "value1").is_none());
    assert_eq!(*map.get(&"key1").unwrap(), "value1");

    // Overwrite
    assert_eq!(*map.insert("key1", "value2").unwrap(), "value1");
    assert_eq!(*map.get(&"key1").unwrap(), "value2");
}

#[test]
fn test_last_write_wins() {
    let map = ShardedMap::new();
    for round in 0..5 {
        for key in 0..20u32 {
            map.insert(key, key * 100 + round);
        }
    }
    for key in 0..20u32 {
        assert_eq!(*map.get(&key).unwrap(), key * 100 + 4);
    }
    assert_eq!(map.len(), 20);
}

#[test]
fn test_get_distinguishes_absent_from_stored_none() {
    let map: ShardedMap<&str, Option<i32>> = ShardedMap::new();
    map.insert("empty", None);

    assert_eq!(map.get(&"empty").as_deref(), Some(&None));
    assert!(map.get(&"missing").is_none());
    assert!(map.contains_key(&"empty"));
    assert!(!map.contains_key(&"missing"));
}

#[test]
fn test_remove() {
    let map = ShardedMap::new();

    map.insert("key1", "value1");
    assert_eq!(*map.remove(&"key1").unwrap(), "value1");
    assert!(map.get(&"key1").is_none());
    assert!(map.remove(&"key1").is_none());
}

#[test]
fn test_put_if_absent() {
    let map = identity_map();
    map.insert(NodeId(3), 4);

    let (stored, inserted) = map.put_if_absent(NodeId(3), 5);
    assert_eq!((*stored, inserted), (4, false));
    assert_eq!(*map.get(&NodeId(3)).unwrap(), 4);

    let (stored, inserted) = map.put_if_absent(NodeId(4), 5);
    assert_eq!((*stored, inserted), (5, true));
    assert_eq!(*map.get(&NodeId(4)).unwrap(), 5);
}

#[test]
fn test_put_if_absent_returns_shared_value() {
    let map = ShardedMap::new();
    let (first, _) = map.put_if_absent("key", String::from("value"));
    let (second, inserted) = map.put_if_absent("key", String::from("other"));

    assert!(!inserted);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_put_if_newer_monotonic() {
    let map = ShardedMap::new();

    for version in 1..=10u64 {
        assert!(map.put_if_newer("node", version));
        assert_eq!(*map.get(&"node").unwrap(), version);
    }

    for stale in [10u64, 9, 5, 1, 0] {
        assert!(!map.put_if_newer("node", stale));
        assert_eq!(*map.get(&"node").unwrap(), 10);
    }
}

#[test]
fn test_put_if_newer_by_version_field() {
    #[derive(Debug, PartialEq)]
    struct Heartbeat {
        version: u64,
        addr: &'static str,
    }

    let map = ShardedMap::new();
    let newer = |candidate: &Heartbeat, existing: &Heartbeat| candidate.version > existing.version;

    assert!(map.put_if_newer_by(NodeId(1), Heartbeat { version: 2, addr: "a" }, newer));
    assert!(!map.put_if_newer_by(NodeId(1), Heartbeat { version: 1, addr: "b" }, newer));
    assert!(map.put_if_newer_by(NodeId(1), Heartbeat { version: 7, addr: "c" }, newer));

    assert_eq!(
        *map.get(&NodeId(1)).unwrap(),
        Heartbeat { version: 7, addr: "c" }
    );
}

#[test]
fn test_len_and_is_empty() {
    let map = ShardedMap::new();

    assert!(map.is_empty());
    assert_eq!(map.len(), 0);

    map.insert("key1", "value1");
    assert!(!map.is_empty());
    assert_eq!(map.len(), 1);

    map.insert("key2", "value2");
    assert_eq!(map.len(), 2);

    map.remove(&"key1");
    assert_eq!(map.len(), 1);
}

#[test]
fn test_sorted_keys_across_shards() {
    let map = identity_map();
    map.insert(NodeId(3), 4);
    map.insert(NodeId(63), 5);
    map.insert(NodeId(42), 4);
    map.insert(NodeId(14), 5);

    assert_eq!(map.len(), 4);
    assert_eq!(
        map.sorted_keys(),
        vec![NodeId(3), NodeId(14), NodeId(42), NodeId(63)]
    );
    assert_eq!(
        map.sorted_keys_by(|a, b| b.cmp(a)),
        vec![NodeId(63), NodeId(42), NodeId(14), NodeId(3)]
    );
}

#[test]
fn test_keys_follow_shard_order() {
    let map = identity_map();
    for id in [19u32, 5, 10, 21] {
        map.insert(NodeId(id), ());
    }

    let shards: Vec<usize> = map.keys().iter().map(|k| map.shard_index(k)).collect();
    let mut sorted = shards.clone();
    sorted.sort_unstable();
    assert_eq!(shards, sorted);
}

#[test]
fn test_keys_and_values() {
    let map = identity_map();
    map.insert(NodeId(3), 4);
    map.insert(NodeId(4), 5);

    assert_eq!(map.keys().len(), 2);

    let mut values: Vec<i32> = map.values().iter().map(|v| **v).collect();
    values.sort_unstable();
    assert_eq!(values, vec![4, 5]);
}

#[test]
fn test_items_round_trip() {
    let map = ShardedMap::new();
    let mut expected = StdHashMap::new();

    for i in 0..100u32 {
        map.insert(i, i * 2);
        expected.insert(i, i * 2);
    }
    for i in 100..120u32 {
        map.put_if_absent(i, i);
        expected.insert(i, i);
    }

    let items: StdHashMap<u32, u32> = map.items().into_iter().map(|(k, v)| (k, *v)).collect();
    assert_eq!(items, expected);
}

#[test]
fn test_update_merges_batch() {
    let map = ShardedMap::new();
    map.insert("a", 1);
    map.insert("b", 2);

    map.update([("b", 20), ("c", 30)]);

    assert_eq!(map.len(), 3);
    assert_eq!(*map.get(&"a").unwrap(), 1);
    assert_eq!(*map.get(&"b").unwrap(), 20);
    assert_eq!(*map.get(&"c").unwrap(), 30);

    let other: StdHashMap<&str, i32> = [("d", 4)].into_iter().collect();
    map.update(other);
    assert_eq!(*map.get(&"d").unwrap(), 4);
}

#[test]
fn test_clear() {
    let map = ShardedMap::new();
    for i in 0..50 {
        map.insert(i, i);
    }

    map.clear();
    assert!(map.is_empty());
    assert!(map.get(&1).is_none());

    map.insert(1, 10);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_iter() {
    let map = ShardedMap::new();

    map.insert("key1", "value1");
    map.insert("key2", "value2");
    map.insert("key3", "value3");

    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by_key(|(k, _)| *k);

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].0, "key1");
    assert_eq!(entries[1].0, "key2");
    assert_eq!(entries[2].0, "key3");

    let mut count = 0;
    for (_key, _value) in &map {
        count += 1;
    }
    assert_eq!(count, 3);
}

#[test]
fn test_from_iterator() {
    let map: ShardedMap<u32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
    assert_eq!(map.len(), 2);
    assert_eq!(*map.get(&2).unwrap(), "two");
}

#[test]
fn test_stats() {
    let map = ShardedMap::new();

    map.insert("key1", "value1");
    map.insert("key2", "value2");
    map.get(&"key1");
    map.get(&"key2");
    map.remove(&"key1");

    let stats = map.stats();
    assert_eq!(stats.size, 1);
    assert_eq!(stats.shard_sizes.len(), 10);
    assert_eq!(stats.operations.len(), 10);

    if cfg!(feature = "metrics") {
        let total_ops: u64 = stats.operations.iter().map(|op| op.total()).sum();
        assert_eq!(total_ops, 5);
    }
}

#[test]
fn test_diagnostics() {
    let map = identity_map();
    for id in 0..20u32 {
        map.insert(NodeId(id), id);
    }

    let diag = map.diagnostics();
    assert_eq!(diag.total_entries, 20);
    assert_eq!(diag.shards.len(), 10);
    assert!(diag.shards.iter().all(|s| s.entries == 2));
    assert_eq!(diag.avg_load_per_shard, 2.0);
    assert_eq!(diag.max_load_ratio, 1.0);
}

#[test]
fn test_builder() {
    let map = ShardedMapBuilder::new()
        .shard_count(8)
        .unwrap()
        .capacity_per_shard(64)
        .build::<String, i32>()
        .unwrap();

    map.insert("test".to_string(), 42);
    assert_eq!(*map.get(&"test".to_string()).unwrap(), 42);
    assert_eq!(map.shard_count(), 8);
}

#[test]
fn test_builder_invalid_shard_count() {
    assert_eq!(
        ShardedMapBuilder::new().shard_count(0).unwrap_err(),
        Error::InvalidShardCount
    );
    assert!(ShardedMap::<u32, u32>::with_shard_count(0).is_err());
    assert_eq!(Error::InvalidShardCount.to_string(), "shard count must be greater than 0");
}

#[test]
fn test_non_power_of_two_shard_count() {
    let map = ShardedMap::<u32, u32>::with_shard_count(10).unwrap();
    for i in 0..1000 {
        assert!(map.shard_index(&i) < 10);
    }
}

#[test]
fn test_arc_sharing() {
    let map = ShardedMap::new();

    map.insert("key", "value");
    let arc1 = map.get(&"key").unwrap();
    let arc2 = map.get(&"key").unwrap();

    assert!(Arc::ptr_eq(&arc1, &arc2));
    assert_eq!(*arc1, *arc2);
}
