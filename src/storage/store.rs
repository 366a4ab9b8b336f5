//! Array-backed record store
//!
//! The inventory is one JSON array on disk. Every read loads the whole file
//! and every mutation rewrites it; there is no partial write and no log.
//! A record's position is its index in that array: appends land at the old
//! length, and deletion swaps the victim with the last record before popping.

use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::{StorageError, StorageResult};

/// A record that carries its own unique key
pub trait Keyed {
    /// The key the index maps to a position
    fn key(&self) -> &str;
}

/// Outcome of a swap-remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRemoval {
    /// Key of the record moved into the vacated position, if the removed
    /// record was not already last
    pub moved_key: Option<String>,
    /// Length of the store after the removal
    pub new_len: usize,
}

/// Position contract the hash index relies on
pub trait RecordStore {
    /// Stored record type
    type Record: Keyed + Clone;

    /// Adds a record at the end and returns its position.
    fn append(&mut self, record: Self::Record) -> StorageResult<usize>;

    /// Returns a full snapshot in position order.
    fn get_all(&self) -> StorageResult<Vec<Self::Record>>;

    /// Returns the record at `position`, or `None` past the end.
    fn get_at(&self, position: usize) -> StorageResult<Option<Self::Record>> {
        Ok(self.get_all()?.into_iter().nth(position))
    }

    /// Number of stored records
    fn len(&self) -> StorageResult<usize> {
        Ok(self.get_all()?.len())
    }

    /// Returns true when the store holds no records
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Moves the last record into `position`, drops the old last slot and
    /// persists.
    fn swap_remove_last(&mut self, position: usize) -> StorageResult<SwapRemoval>;

    /// Replaces the whole sequence (import / restore).
    fn replace_all(&mut self, records: Vec<Self::Record>) -> StorageResult<()>;
}

/// Serializes `value` as JSON indented with four spaces.
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(1024);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Record store persisted as a single JSON array file
#[derive(Debug)]
pub struct JsonFileStore<R> {
    /// Path to the inventory file
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonFileStore<R>
where
    R: Serialize + DeserializeOwned + Keyed + Clone,
{
    /// Opens the store at `path`, creating an empty array file (and its
    /// parent directories) when it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::io_error(
                        format!("Failed to create directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let store = Self {
            path,
            _record: PhantomData,
        };

        if !store.path.exists() {
            store.save(&[])?;
        }

        Ok(store)
    }

    /// Returns the path to the inventory file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<Vec<R>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::read_failed(
                    format!("Failed to read inventory: {}", self.path.display()),
                    e,
                ))
            }
        };

        serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::data_corruption(self.path.display(), e.to_string()))
    }

    fn save(&self, records: &[R]) -> StorageResult<()> {
        let bytes = to_pretty_json(records).map_err(|e| {
            StorageError::write_failed_no_source(format!("Failed to encode inventory: {}", e))
        })?;

        fs::write(&self.path, bytes).map_err(|e| {
            StorageError::write_failed(
                format!("Failed to write inventory: {}", self.path.display()),
                e,
            )
        })
    }
}

impl<R> RecordStore for JsonFileStore<R>
where
    R: Serialize + DeserializeOwned + Keyed + Clone,
{
    type Record = R;

    fn append(&mut self, record: R) -> StorageResult<usize> {
        let mut records = self.load()?;
        let position = records.len();
        records.push(record);
        self.save(&records)?;
        Ok(position)
    }

    fn get_all(&self) -> StorageResult<Vec<R>> {
        self.load()
    }

    fn swap_remove_last(&mut self, position: usize) -> StorageResult<SwapRemoval> {
        let mut records = self.load()?;
        if position >= records.len() {
            return Err(StorageError::out_of_range(position, records.len()));
        }

        let last = records.len() - 1;
        let moved_key = if position != last {
            records.swap(position, last);
            Some(records[position].key().to_string())
        } else {
            None
        };
        records.truncate(last);
        self.save(&records)?;

        Ok(SwapRemoval {
            moved_key,
            new_len: records.len(),
        })
    }

    fn replace_all(&mut self, records: Vec<R>) -> StorageResult<()> {
        self.save(&records)
    }
}
