//! Catalog operations
//!
//! # API
//!
//! - `insert(record)` - Reject duplicates, append, index the new position
//! - `find(key)` - Indexed lookup, verified against the store
//! - `delete(key)` - Swap-remove keeping the moved record's position current
//! - `replace_all(records)` - Bulk replace followed by a full rebuild
//! - `rebuild()` - Full rebuild on request

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::errors::{CatalogError, CatalogResult};
use super::resolution::{Resolved, Startup};
use crate::config::Config;
use crate::covers::CoverStore;
use crate::index::{HashIndex, IndexError, IndexLoad, IndexStatistics};
use crate::observability::{log_event_with_fields, Event};
use crate::storage::{to_pretty_json, Game, JsonFileStore, Keyed, NewGame, RecordStore};

/// Catalog over the JSON inventory file
pub type GameCatalog = Catalog<JsonFileStore<Game>>;

/// Record store plus the hash index over it
pub struct Catalog<S: RecordStore> {
    store: S,
    index: HashIndex,
    covers: Option<CoverStore>,
    startup: Startup,
}

impl<S: RecordStore> Catalog<S> {
    /// Couples `store` with `index`.
    ///
    /// The index is rebuilt before first use when its file was discarded,
    /// or when there was no file but the store already holds records.
    pub fn new(store: S, mut index: HashIndex, load: IndexLoad) -> CatalogResult<Self> {
        let rebuild = match &load {
            IndexLoad::Loaded => {
                log_event_with_fields(Event::IndexLoaded, &[]);
                false
            }
            IndexLoad::Missing => {
                log_event_with_fields(Event::IndexMissing, &[]);
                !store.is_empty()?
            }
            IndexLoad::Reset { reason } => {
                log_event_with_fields(Event::IndexReset, &[("reason", reason.as_str())]);
                true
            }
        };

        if rebuild {
            index.rebuild_from_store(&store)?;
            log_rebuilt("startup", &index);
        }

        Ok(Self {
            store,
            index,
            covers: None,
            startup: Startup {
                load,
                rebuilt: rebuild,
            },
        })
    }

    /// Attaches the cover store used by `register`.
    pub fn with_covers(mut self, covers: CoverStore) -> Self {
        self.covers = Some(covers);
        self
    }

    /// How the index came up
    pub fn startup(&self) -> &Startup {
        &self.startup
    }

    /// The hash index
    pub fn index(&self) -> &HashIndex {
        &self.index
    }

    /// The record store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn rebuild_index(&mut self, reason: &str) -> CatalogResult<()> {
        self.index.rebuild_from_store(&self.store)?;
        log_rebuilt(reason, &self.index);
        Ok(())
    }

    /// Discards the index and rebuilds it from the whole store.
    pub fn rebuild(&mut self) -> CatalogResult<IndexStatistics> {
        self.rebuild_index("requested")?;
        Ok(self.index.statistics())
    }

    /// Index occupancy statistics
    pub fn statistics(&self) -> IndexStatistics {
        self.index.statistics()
    }

    /// Every record in store order
    pub fn list(&self) -> CatalogResult<Vec<S::Record>> {
        Ok(self.store.get_all()?)
    }

    /// Looks `key` up through the index and checks the record found there.
    ///
    /// If the indexed position is out of range or holds another key, the
    /// store is scanned linearly and the index rebuilt. A key the index has
    /// no entry for is reported absent without touching the store.
    pub fn find(&mut self, key: &str) -> CatalogResult<Resolved<Option<S::Record>>> {
        let Some(position) = self.index.lookup_position(key) else {
            return Ok(Resolved::indexed(None));
        };

        if let Some(record) = self.store.get_at(position)? {
            if record.key() == key {
                return Ok(Resolved::indexed(Some(record)));
            }
        }

        log_stale(key, position);
        let found = self
            .store
            .get_all()?
            .into_iter()
            .find(|record| record.key() == key);
        self.rebuild_index("stale_lookup")?;

        Ok(Resolved::rebuilt(found))
    }

    /// True if `key` is in the store, going through the verified lookup.
    pub fn contains(&mut self, key: &str) -> CatalogResult<bool> {
        Ok(self.find(key)?.value.is_some())
    }

    /// Appends `record` and indexes it at its new position.
    pub fn insert(&mut self, record: S::Record) -> CatalogResult<usize> {
        let key = record.key().to_string();
        if key.is_empty() {
            return Err(IndexError::invalid_key("key must not be empty").into());
        }
        if self.contains(&key)? {
            log_event_with_fields(Event::RecordDuplicate, &[("key", key.as_str())]);
            return Err(CatalogError::Duplicate(key));
        }

        let position = self.store.append(record)?;
        self.index.insert(&key, position)?;

        let position_str = position.to_string();
        log_event_with_fields(
            Event::RecordInserted,
            &[("key", key.as_str()), ("position", position_str.as_str())],
        );
        Ok(position)
    }

    /// Deletes the record with `key`.
    ///
    /// Fast path: the record moving out of the last slot has its index
    /// position updated before the store is truncated and written, then the
    /// deleted key is unlinked. Stale path: the key is located by a linear
    /// scan, removed there, and the whole index rebuilt from the result.
    pub fn delete(&mut self, key: &str) -> CatalogResult<Resolved<bool>> {
        let Some(position) = self.index.lookup_position(key) else {
            return Ok(Resolved::indexed(false));
        };

        let records = self.store.get_all()?;
        let verified = records
            .get(position)
            .is_some_and(|record| record.key() == key);

        if !verified {
            log_stale(key, position);
            let found = records.iter().position(|record| record.key() == key);
            if let Some(at) = found {
                self.store.swap_remove_last(at)?;
                log_deleted(key, at);
            }
            self.rebuild_index("stale_delete")?;
            return Ok(Resolved::rebuilt(found.is_some()));
        }

        let last = records.len() - 1;
        let mut moved_indexed = true;
        if position != last {
            let moved_key = records[last].key();
            moved_indexed = self.index.update_position(moved_key, position)?;
        }

        self.store.swap_remove_last(position)?;
        self.index.remove(key)?;
        log_deleted(key, position);

        // The moved record had no entry to update, so the index was already
        // missing keys.
        if !moved_indexed {
            self.rebuild_index("stale_delete")?;
            return Ok(Resolved::rebuilt(true));
        }

        Ok(Resolved::indexed(true))
    }

    /// Replaces the whole dataset (import / restore) and rebuilds the index.
    pub fn replace_all(&mut self, records: Vec<S::Record>) -> CatalogResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if record.key().is_empty() {
                return Err(IndexError::invalid_key("key must not be empty").into());
            }
            if !seen.insert(record.key()) {
                return Err(CatalogError::DuplicateInDataset(record.key().to_string()));
            }
        }

        self.store.replace_all(records)?;
        self.rebuild_index("replace_all")
    }
}

impl Catalog<JsonFileStore<Game>> {
    /// Opens the inventory, its index and the cover store described by
    /// `config`.
    pub fn open(config: &Config) -> CatalogResult<Self> {
        let store = JsonFileStore::open(config.inventory_path())?;
        let (index, load) = HashIndex::open(config.index_path(), config.table_size)?;
        let covers = CoverStore::open(config.data_path(), &config.covers_dir)?;

        let catalog = Self::new(store, index, load)?.with_covers(covers);
        log_event_with_fields(Event::CatalogOpened, &[("data_dir", config.data_dir.as_str())]);
        Ok(catalog)
    }
}

impl<S: RecordStore<Record = Game>> Catalog<S> {
    /// Saves the cover, builds and validates the game, then inserts it.
    ///
    /// The cover is written before validation, so a rejected draft may
    /// leave an unreferenced cover file behind.
    pub fn register(&mut self, draft: NewGame, cover: &[u8], cover_name: &str) -> CatalogResult<Game> {
        let covers = self.covers.as_ref().ok_or(CatalogError::CoversUnavailable)?;
        let portada = covers.save(cover, cover_name)?;
        log_event_with_fields(Event::CoverSaved, &[("path", portada.as_str())]);

        let game = Game::from_draft(draft, portada)?;
        self.insert(game.clone())?;
        Ok(game)
    }

    /// First game whose name equals `name`, ignoring case and surrounding
    /// whitespace.
    pub fn find_by_name(&self, name: &str) -> CatalogResult<Option<Game>> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self
            .list()?
            .into_iter()
            .find(|game| game.nombre.trim().to_lowercase() == wanted))
    }

    /// Every game whose company contains `fragment`, ignoring case.
    pub fn filter_by_company(&self, fragment: &str) -> CatalogResult<Vec<Game>> {
        let wanted = fragment.trim().to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|game| game.compania.to_lowercase().contains(&wanted))
            .collect())
    }

    /// Replaces the inventory with the JSON array in `path`.
    ///
    /// Every game is validated before anything is written.
    pub fn import(&mut self, path: &Path) -> CatalogResult<usize> {
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let games: Vec<Game> =
            serde_json::from_slice(&bytes).map_err(|e| CatalogError::InvalidImport {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        for game in &games {
            game.validate()?;
        }

        let count = games.len();
        self.replace_all(games)?;

        let path_str = path.display().to_string();
        let count_str = count.to_string();
        log_event_with_fields(
            Event::ImportComplete,
            &[("path", path_str.as_str()), ("records", count_str.as_str())],
        );
        Ok(count)
    }

    /// Writes the inventory to `path` in the store's own format.
    pub fn export(&self, path: &Path) -> CatalogResult<usize> {
        let games = self.list()?;
        let bytes = to_pretty_json(&games).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e.into(),
        })?;
        fs::write(path, bytes).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let path_str = path.display().to_string();
        let count_str = games.len().to_string();
        log_event_with_fields(
            Event::ExportComplete,
            &[("path", path_str.as_str()), ("records", count_str.as_str())],
        );
        Ok(games.len())
    }
}

fn log_rebuilt(reason: &str, index: &HashIndex) {
    let entries = index.statistics().total_entries.to_string();
    log_event_with_fields(Event::IndexRebuilt, &[("reason", reason), ("entries", entries.as_str())]);
}

fn log_stale(key: &str, position: usize) {
    let position = position.to_string();
    log_event_with_fields(Event::IndexStaleEntry, &[("key", key), ("position", position.as_str())]);
}

fn log_deleted(key: &str, position: usize) {
    let position = position.to_string();
    log_event_with_fields(Event::RecordDeleted, &[("key", key), ("position", position.as_str())]);
}
