//! Position-indexed hash table
//!
//! Maps a record key to its position in the record store. Collisions are
//! resolved by separate chaining: each bucket is a growable sequence kept in
//! insertion order, oldest first. An empty bucket holds no allocation.
//!
//! Every mutating call rewrites the index file in full. If that write fails
//! the in-memory change has already been applied; the caller treats the
//! operation as failed and the next read that finds a mismatch rebuilds.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::errors::{IndexError, IndexResult};
use super::format::{BucketRecord, EntryRecord, IndexFile};
use super::hash::bucket_of;
use super::stats::IndexStatistics;
use crate::observability::{log_event_with_fields, Event};
use crate::storage::{to_pretty_json, Keyed, RecordStore};

/// Default number of buckets
pub const DEFAULT_TABLE_SIZE: usize = 100;

/// One chained entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexEntry {
    pub key: String,
    pub position: usize,
}

/// How the index came up when opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexLoad {
    /// The index file was read successfully
    Loaded,
    /// No index file; the table starts empty
    Missing,
    /// The file could not be decoded; the table starts empty
    Reset {
        /// Why the file was discarded
        reason: String,
    },
}

/// Fixed-size chained hash table from key to store position
#[derive(Debug, Clone)]
pub struct HashIndex {
    table_size: usize,
    buckets: Vec<Vec<IndexEntry>>,
    /// Backing file; `None` keeps the index in memory only
    path: Option<PathBuf>,
}

impl HashIndex {
    /// Creates an empty index that is never written to disk.
    pub fn in_memory(table_size: usize) -> IndexResult<Self> {
        Self::empty(table_size, None)
    }

    /// Opens the index backed by `path`.
    ///
    /// A missing file yields an empty table. A file that is not valid JSON,
    /// lacks expected fields, was written for a different table size, or
    /// places an entry in a bucket it does not hash to is discarded and the
    /// table starts empty; that is reported as [`IndexLoad::Reset`], never as
    /// an error. Only an OS-level read failure is an error.
    pub fn open(path: impl AsRef<Path>, table_size: usize) -> IndexResult<(Self, IndexLoad)> {
        let path = path.as_ref().to_path_buf();
        let mut index = Self::empty(table_size, Some(path.clone()))?;

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((index, IndexLoad::Missing)),
            Err(e) => {
                return Err(IndexError::read_failed(
                    format!("Failed to read index: {}", path.display()),
                    e,
                ))
            }
        };

        match Self::decode(&bytes, table_size) {
            Ok(buckets) => {
                index.buckets = buckets;
                Ok((index, IndexLoad::Loaded))
            }
            Err(reason) => Ok((index, IndexLoad::Reset { reason })),
        }
    }

    fn empty(table_size: usize, path: Option<PathBuf>) -> IndexResult<Self> {
        if table_size == 0 {
            return Err(IndexError::invalid_config("table size must be greater than zero"));
        }
        Ok(Self {
            table_size,
            buckets: vec![Vec::new(); table_size],
            path,
        })
    }

    /// Decodes a persisted table, or explains why it cannot be trusted.
    fn decode(bytes: &[u8], table_size: usize) -> Result<Vec<Vec<IndexEntry>>, String> {
        let file: IndexFile = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;

        if file.table_size != table_size {
            return Err(format!(
                "index written for table size {}, configured {}",
                file.table_size, table_size
            ));
        }

        let mut buckets = vec![Vec::new(); table_size];
        for record in file.buckets {
            if record.bucket >= table_size {
                return Err(format!("bucket {} out of range", record.bucket));
            }
            for entry in record.entries {
                if bucket_of(&entry.key, table_size) != record.bucket {
                    return Err(format!(
                        "key {:?} stored in bucket {} but hashes elsewhere",
                        entry.key, record.bucket
                    ));
                }
                // Repeated keys load as written; lookups take the first
                buckets[record.bucket].push(IndexEntry {
                    key: entry.key,
                    position: entry.position,
                });
            }
        }

        Ok(buckets)
    }

    /// Number of buckets
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bucket a key hashes to
    pub fn bucket_for(&self, key: &str) -> usize {
        bucket_of(key, self.table_size)
    }

    /// Entries of one bucket in chain order. Out-of-range buckets are empty.
    pub fn chain(&self, bucket: usize) -> &[IndexEntry] {
        self.buckets.get(bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All entries, bucket by bucket, each bucket in chain order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.buckets.iter().flatten()
    }

    /// Appends `(key, position)` to the end of its bucket's chain and
    /// persists.
    ///
    /// Does not check for an existing entry with the same key; the caller
    /// must rule that out first.
    pub fn insert(&mut self, key: &str, position: usize) -> IndexResult<()> {
        if key.is_empty() {
            return Err(IndexError::invalid_key("key must not be empty"));
        }
        let bucket = self.bucket_for(key);
        self.buckets[bucket].push(IndexEntry {
            key: key.to_string(),
            position,
        });
        self.persist()
    }

    /// Position of the first entry for `key` in its chain.
    pub fn lookup_position(&self, key: &str) -> Option<usize> {
        self.buckets[self.bucket_for(key)]
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.position)
    }

    /// True if `key` has an entry.
    pub fn exists(&self, key: &str) -> bool {
        self.lookup_position(key).is_some()
    }

    /// Unlinks the entry for `key` and persists.
    ///
    /// Other entries keep their positions; renumbering after a store delete
    /// goes through [`HashIndex::update_position`].
    pub fn remove(&mut self, key: &str) -> IndexResult<bool> {
        let bucket = self.bucket_for(key);
        let chain = &mut self.buckets[bucket];
        let Some(at) = chain.iter().position(|entry| entry.key == key) else {
            return Ok(false);
        };
        // Vec::remove keeps the survivors in chain order
        chain.remove(at);
        if chain.is_empty() {
            chain.shrink_to_fit();
        }
        self.persist()?;
        Ok(true)
    }

    /// Overwrites the stored position of `key` in place and persists.
    pub fn update_position(&mut self, key: &str, new_position: usize) -> IndexResult<bool> {
        let bucket = self.bucket_for(key);
        let Some(entry) = self.buckets[bucket].iter_mut().find(|entry| entry.key == key) else {
            return Ok(false);
        };
        entry.position = new_position;
        self.persist()?;
        Ok(true)
    }

    /// Discards every entry and re-indexes `keys`, each at its iteration
    /// position. The result is written once at the end.
    ///
    /// An empty key cannot be indexed; it is skipped with a warning and the
    /// keys after it keep their own positions. Returns the number skipped.
    pub fn rebuild<I, K>(&mut self, keys: I) -> IndexResult<usize>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut buckets: Vec<Vec<IndexEntry>> = vec![Vec::new(); self.table_size];
        let mut skipped = 0;
        for (position, key) in keys.into_iter().enumerate() {
            let key = key.as_ref();
            if key.is_empty() {
                let position = position.to_string();
                log_event_with_fields(
                    Event::RecordSkipped,
                    &[("position", position.as_str()), ("reason", "empty key")],
                );
                skipped += 1;
                continue;
            }
            buckets[bucket_of(key, self.table_size)].push(IndexEntry {
                key: key.to_string(),
                position,
            });
        }

        self.buckets = buckets;
        self.persist()?;
        Ok(skipped)
    }

    /// Rebuilds the whole index from the store's current array order.
    pub fn rebuild_from_store<S: RecordStore>(&mut self, store: &S) -> IndexResult<usize> {
        let records = store.get_all().map_err(|e| {
            IndexError::build_failed(format!("Failed to scan record store: {}", e))
        })?;
        self.rebuild(records.iter().map(|record| record.key()))
    }

    /// Recomputes occupancy statistics from the current buckets.
    pub fn statistics(&self) -> IndexStatistics {
        IndexStatistics::from_chain_lengths(self.table_size, self.buckets.iter().map(Vec::len))
    }

    /// Serializable snapshot: non-empty buckets only, chains in order.
    pub fn to_file(&self) -> IndexFile {
        let buckets = self
            .buckets
            .iter()
            .enumerate()
            .filter(|(_, chain)| !chain.is_empty())
            .map(|(bucket, chain)| BucketRecord {
                bucket,
                entries: chain
                    .iter()
                    .map(|entry| EntryRecord {
                        key: entry.key.clone(),
                        position: entry.position,
                    })
                    .collect(),
            })
            .collect();

        IndexFile {
            table_size: self.table_size,
            buckets,
        }
    }

    /// Rewrites the backing file with the full table.
    pub fn persist(&self) -> IndexResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = to_pretty_json(&self.to_file()).map_err(|e| {
            IndexError::persist_failed_no_source(format!("Failed to encode index: {}", e))
        })?;

        fs::write(path, bytes).map_err(|e| {
            IndexError::persist_failed(format!("Failed to write index: {}", path.display()), e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn flattened(index: &HashIndex) -> BTreeSet<IndexEntry> {
        index.entries().cloned().collect()
    }

    #[test]
    fn test_zero_table_size_rejected() {
        let err = HashIndex::in_memory(0).unwrap_err();
        assert_eq!(err.code().code(), "SHELF_INDEX_INVALID_CONFIG");
    }

    #[test]
    fn test_insert_then_lookup() {
        let mut index = HashIndex::in_memory(10).unwrap();
        index.insert("a1", 0).unwrap();
        index.insert("b11", 1).unwrap();
        index.insert("c21", 2).unwrap();

        assert_eq!(index.lookup_position("a1"), Some(0));
        assert_eq!(index.lookup_position("b11"), Some(1));
        assert_eq!(index.lookup_position("c21"), Some(2));
        assert_eq!(index.lookup_position("d31"), None);
        assert_eq!(index.statistics().collisions, 0);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut index = HashIndex::in_memory(10).unwrap();
        let err = index.insert("", 0).unwrap_err();
        assert_eq!(err.code().code(), "SHELF_INDEX_INVALID_KEY");
        assert_eq!(index.entries().count(), 0);
    }

    #[test]
    fn test_collision_chains_in_insertion_order() {
        let mut index = HashIndex::in_memory(10).unwrap();
        // 4*1 + 4*2 = 12 and 2*1 + 4*2 + 4*3 = 22
        index.insert("44", 0).unwrap();
        index.insert("244", 1).unwrap();

        assert_eq!(index.bucket_for("44"), 2);
        assert_eq!(index.bucket_for("244"), 2);
        let chain: Vec<&str> = index.chain(2).iter().map(|e| e.key.as_str()).collect();
        assert_eq!(chain, vec!["44", "244"]);
        assert_eq!(index.statistics().collisions, 1);
        assert_eq!(index.lookup_position("244"), Some(1));
    }

    #[test]
    fn test_remove_head_middle_tail() {
        let mut index = HashIndex::in_memory(1).unwrap();
        for (pos, key) in ["k1", "k2", "k3", "k4"].iter().enumerate() {
            index.insert(key, pos).unwrap();
        }

        assert!(index.remove("k1").unwrap());
        assert!(index.remove("k3").unwrap());
        assert!(!index.remove("k3").unwrap());

        let chain: Vec<&str> = index.chain(0).iter().map(|e| e.key.as_str()).collect();
        assert_eq!(chain, vec!["k2", "k4"]);
        assert_eq!(index.lookup_position("k2"), Some(1));
        assert_eq!(index.lookup_position("k4"), Some(3));

        assert!(index.remove("k4").unwrap());
        assert!(index.remove("k2").unwrap());
        assert!(index.chain(0).is_empty());
    }

    #[test]
    fn test_remove_leaves_other_positions() {
        let mut index = HashIndex::in_memory(100).unwrap();
        index.insert("x17", 0).unwrap();
        index.insert("y42", 1).unwrap();
        index.insert("z99", 2).unwrap();

        assert!(index.remove("y42").unwrap());

        assert!(!index.exists("y42"));
        assert_eq!(index.lookup_position("x17"), Some(0));
        assert_eq!(index.lookup_position("z99"), Some(2));
    }

    #[test]
    fn test_update_position() {
        let mut index = HashIndex::in_memory(10).unwrap();
        index.insert("a1", 4).unwrap();

        assert!(index.update_position("a1", 0).unwrap());
        assert_eq!(index.lookup_position("a1"), Some(0));
        assert!(!index.update_position("missing1", 3).unwrap());
    }

    #[test]
    fn test_duplicate_insert_not_detected() {
        let mut index = HashIndex::in_memory(10).unwrap();
        index.insert("a1", 0).unwrap();
        index.insert("a1", 5).unwrap();

        // First match in chain order wins
        assert_eq!(index.lookup_position("a1"), Some(0));
        assert_eq!(index.chain(1).len(), 2);
    }

    #[test]
    fn test_duplicate_key_survives_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tabla_hash.json");
        let (mut index, _) = HashIndex::open(&path, 10).unwrap();
        index.insert("a1", 0).unwrap();
        index.insert("a1", 5).unwrap();

        let (reloaded, load) = HashIndex::open(&path, 10).unwrap();

        assert_eq!(load, IndexLoad::Loaded);
        assert_eq!(reloaded.lookup_position("a1"), Some(0));
        assert_eq!(reloaded.chain(1), index.chain(1));
    }

    #[test]
    fn test_rebuild_skips_empty_keys() {
        let mut index = HashIndex::in_memory(10).unwrap();
        index.insert("stale1", 9).unwrap();

        let skipped = index.rebuild(["a1", "", "c3"]).unwrap();

        assert_eq!(skipped, 1);
        assert!(!index.exists("stale1"));
        assert_eq!(index.lookup_position("a1"), Some(0));
        assert_eq!(index.lookup_position("c3"), Some(2));
        assert_eq!(index.entries().count(), 2);
    }

    #[test]
    fn test_rebuild_replaces_everything() {
        let mut index = HashIndex::in_memory(10).unwrap();
        index.insert("stale1", 9).unwrap();

        index.rebuild(["a1", "b2", "c3"]).unwrap();

        assert!(!index.exists("stale1"));
        assert_eq!(index.lookup_position("a1"), Some(0));
        assert_eq!(index.lookup_position("b2"), Some(1));
        assert_eq!(index.lookup_position("c3"), Some(2));
    }

    #[test]
    fn test_rebuild_idempotent() {
        let keys = ["k-1-2", "k-3", "k-45", "k-6-7-8", "k-9"];
        let mut index = HashIndex::in_memory(7).unwrap();

        index.rebuild(keys).unwrap();
        let first = flattened(&index);
        index.rebuild(keys).unwrap();

        assert_eq!(first, flattened(&index));
    }

    #[test]
    fn test_statistics_invariants() {
        let mut index = HashIndex::in_memory(5).unwrap();
        for i in 0..23 {
            index.insert(&format!("key-{}", i), i).unwrap();
        }

        let stats = index.statistics();
        assert_eq!(stats.total_entries, 23);
        assert!(stats.collisions <= stats.occupied_buckets);
        assert!(stats.occupied_buckets <= index.table_size());
        assert_eq!(stats.load_factor, 23.0 / 5.0);
    }

    #[test]
    fn test_open_missing_file() {
        let temp = TempDir::new().unwrap();
        let (index, load) = HashIndex::open(temp.path().join("tabla_hash.json"), 100).unwrap();

        assert_eq!(load, IndexLoad::Missing);
        assert_eq!(index.entries().count(), 0);
    }

    #[test]
    fn test_persist_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tabla_hash.json");

        let (mut index, _) = HashIndex::open(&path, 10).unwrap();
        index.insert("44", 0).unwrap();
        index.insert("244", 1).unwrap();
        index.insert("a1", 2).unwrap();
        index.remove("a1").unwrap();
        index.insert("c21", 3).unwrap();

        let (reloaded, load) = HashIndex::open(&path, 10).unwrap();

        assert_eq!(load, IndexLoad::Loaded);
        for key in ["44", "244", "a1", "c21"] {
            assert_eq!(reloaded.lookup_position(key), index.lookup_position(key));
        }
        assert_eq!(reloaded.chain(2), index.chain(2));
    }

    #[test]
    fn test_persisted_layout() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tabla_hash.json");

        let (mut index, _) = HashIndex::open(&path, 10).unwrap();
        index.insert("44", 0).unwrap();
        index.insert("244", 1).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "tamano": 10,
                "datos": [ {
                    "indice": 2,
                    "elementos": [
                        { "id_juego": "44", "posicion_inventario": 0 },
                        { "id_juego": "244", "posicion_inventario": 1 }
                    ]
                } ]
            })
        );
    }

    #[test]
    fn test_corrupt_file_resets() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tabla_hash.json");
        fs::write(&path, "{\"tamano\": 10, \"datos\": [ {\"indice\": 1} ] }").unwrap();

        let (index, load) = HashIndex::open(&path, 10).unwrap();

        assert!(matches!(load, IndexLoad::Reset { .. }));
        assert_eq!(index.entries().count(), 0);
    }

    #[test]
    fn test_garbage_file_resets() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tabla_hash.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let (_, load) = HashIndex::open(&path, 10).unwrap();
        assert!(matches!(load, IndexLoad::Reset { .. }));
    }

    #[test]
    fn test_table_size_mismatch_resets() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tabla_hash.json");
        let (mut index, _) = HashIndex::open(&path, 10).unwrap();
        index.insert("a1", 0).unwrap();

        let (reloaded, load) = HashIndex::open(&path, 100).unwrap();

        assert!(matches!(load, IndexLoad::Reset { .. }));
        assert!(!reloaded.exists("a1"));
    }

    #[test]
    fn test_misplaced_entry_resets() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tabla_hash.json");
        let body = serde_json::json!({
            "tamano": 10,
            "datos": [ { "indice": 7, "elementos": [ { "id_juego": "a1", "posicion_inventario": 0 } ] } ]
        });
        fs::write(&path, body.to_string()).unwrap();

        let (_, load) = HashIndex::open(&path, 10).unwrap();
        assert!(matches!(load, IndexLoad::Reset { .. }));
    }

    #[test]
    fn test_bucket_out_of_range_resets() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tabla_hash.json");
        let body = serde_json::json!({ "tamano": 10, "datos": [ { "indice": 10, "elementos": [] } ] });
        fs::write(&path, body.to_string()).unwrap();

        let (_, load) = HashIndex::open(&path, 10).unwrap();
        assert!(matches!(load, IndexLoad::Reset { .. }));
    }

    #[test]
    fn test_in_memory_never_writes() {
        let mut index = HashIndex::in_memory(10).unwrap();
        index.insert("a1", 0).unwrap();
        assert!(index.path().is_none());
    }
}
