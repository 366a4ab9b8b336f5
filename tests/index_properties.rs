//! Hash Index Property Tests
//!
//! Tests for index invariants:
//! - Bucket hash is deterministic and in range
//! - Insert / lookup / remove / update behave per key
//! - Persisted index reloads to identical lookups
//! - Rebuild is idempotent
//! - Statistics stay within their bounds

use std::collections::BTreeSet;
use std::fs;

use gameshelf::index::{bucket_of, HashIndex, IndexEntry, IndexLoad};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn uuid_keys(n: usize) -> Vec<String> {
    (0..n).map(|_| uuid::Uuid::new_v4().to_string()).collect()
}

fn flattened(index: &HashIndex) -> BTreeSet<IndexEntry> {
    index.entries().cloned().collect()
}

// =============================================================================
// Hash Function Tests
// =============================================================================

/// Hash of any key is stable and below the table size.
#[test]
fn test_hash_deterministic_and_in_range() {
    for key in uuid_keys(200) {
        for size in [1, 10, 100, 101] {
            let bucket = bucket_of(&key, size);
            assert!(bucket < size);
            assert_eq!(bucket, bucket_of(&key, size));
        }
    }
}

/// Keys without digits share bucket 0.
#[test]
fn test_digitless_keys_collide_in_bucket_zero() {
    let mut index = HashIndex::in_memory(10).unwrap();
    index.insert("alpha", 0).unwrap();
    index.insert("beta", 1).unwrap();

    assert_eq!(index.bucket_for("alpha"), bucket_of("", 10));
    assert_eq!(index.chain(0).len(), 2);
    assert_eq!(index.statistics().collisions, 1);
}

// =============================================================================
// Insert / Lookup / Remove Tests
// =============================================================================

/// Small table with three distinct buckets.
#[test]
fn test_three_keys_no_collision() {
    let mut index = HashIndex::in_memory(10).unwrap();
    index.insert("a1", 0).unwrap();
    index.insert("b11", 1).unwrap();
    index.insert("c21", 2).unwrap();

    assert_eq!(index.lookup_position("b11"), Some(1));
    assert_eq!(index.statistics().collisions, 0);
    assert_eq!(index.statistics().occupied_buckets, 3);
}

/// Weighted sums 12 and 22 share bucket 2 in a table of 10.
#[test]
fn test_congruent_sums_chain() {
    let mut index = HashIndex::in_memory(10).unwrap();
    index.insert("44", 0).unwrap();
    index.insert("244", 1).unwrap();

    let chain: Vec<_> = index.chain(2).iter().map(|e| e.key.as_str()).collect();
    assert_eq!(chain, vec!["44", "244"]);
    assert_eq!(index.statistics().collisions, 1);
}

/// Every inserted key is found at its position.
#[test]
fn test_insert_then_lookup_many() {
    let keys = uuid_keys(500);
    let mut index = HashIndex::in_memory(100).unwrap();
    for (pos, key) in keys.iter().enumerate() {
        index.insert(key, pos).unwrap();
    }

    for (pos, key) in keys.iter().enumerate() {
        assert_eq!(index.lookup_position(key), Some(pos));
    }
}

/// Removing one key leaves every other lookup unchanged.
#[test]
fn test_remove_isolated() {
    let keys = uuid_keys(150);
    let mut index = HashIndex::in_memory(20).unwrap();
    for (pos, key) in keys.iter().enumerate() {
        index.insert(key, pos).unwrap();
    }

    for victim in keys.iter().step_by(7) {
        assert!(index.remove(victim).unwrap());
        assert!(!index.exists(victim));
    }

    for (pos, key) in keys.iter().enumerate() {
        if pos % 7 == 0 {
            assert_eq!(index.lookup_position(key), None);
        } else {
            assert_eq!(index.lookup_position(key), Some(pos));
        }
    }
}

// =============================================================================
// Persistence Tests
// =============================================================================

/// Reloading the written file gives identical lookups.
#[test]
fn test_reload_identical_lookups() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tabla_hash.json");
    let keys = uuid_keys(120);

    let (mut index, load) = HashIndex::open(&path, 100).unwrap();
    assert_eq!(load, IndexLoad::Missing);
    for (pos, key) in keys.iter().enumerate() {
        index.insert(key, pos).unwrap();
    }
    index.remove(&keys[3]).unwrap();
    index.update_position(&keys[119], 3).unwrap();

    let (reloaded, load) = HashIndex::open(&path, 100).unwrap();

    assert_eq!(load, IndexLoad::Loaded);
    for key in &keys {
        assert_eq!(reloaded.lookup_position(key), index.lookup_position(key));
    }
    for bucket in 0..100 {
        assert_eq!(reloaded.chain(bucket), index.chain(bucket));
    }
}

/// Only non-empty buckets are written, in ascending order.
#[test]
fn test_only_non_empty_buckets_written() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tabla_hash.json");

    let (mut index, _) = HashIndex::open(&path, 100).unwrap();
    index.insert("k9", 0).unwrap();
    index.insert("k1", 1).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let buckets: Vec<u64> = raw["datos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["indice"].as_u64().unwrap())
        .collect();
    assert_eq!(buckets, vec![1, 9]);
    assert_eq!(raw["tamano"], 100);
}

/// Truncated file resets rather than failing.
#[test]
fn test_truncated_file_resets() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tabla_hash.json");
    {
        let (mut index, _) = HashIndex::open(&path, 100).unwrap();
        index.insert("k1", 0).unwrap();
    }
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, &content[..content.len() / 2]).unwrap();

    let (index, load) = HashIndex::open(&path, 100).unwrap();

    assert!(matches!(load, IndexLoad::Reset { .. }));
    assert!(!index.exists("k1"));
}

// =============================================================================
// Rebuild & Statistics Tests
// =============================================================================

/// Two rebuilds over the same keys give the same flattened entries.
#[test]
fn test_rebuild_idempotent() {
    let keys = uuid_keys(80);
    let mut index = HashIndex::in_memory(100).unwrap();

    index.rebuild(&keys).unwrap();
    let first = flattened(&index);
    index.rebuild(&keys).unwrap();

    assert_eq!(first, flattened(&index));
    assert_eq!(first.len(), 80);
}

/// collisions <= occupied <= table size, load factor exact.
#[test]
fn test_statistics_bounds() {
    for (size, count) in [(1, 5), (10, 3), (100, 250), (7, 0)] {
        let mut index = HashIndex::in_memory(size).unwrap();
        index.rebuild(uuid_keys(count)).unwrap();

        let stats = index.statistics();
        assert_eq!(stats.total_entries, count);
        assert!(stats.collisions <= stats.occupied_buckets);
        assert!(stats.occupied_buckets <= size);
        assert_eq!(stats.load_factor, count as f64 / size as f64);
        assert!(stats.max_chain <= count);
    }
}
