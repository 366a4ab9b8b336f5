//! # Local Cover Store

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::errors::{CoverError, CoverResult};

/// Default folder for covers, relative to the data directory
pub const DEFAULT_COVERS_DIR: &str = "imagenes/portadas";

/// Saves cover images under their content hash
#[derive(Debug)]
pub struct CoverStore {
    /// Directory the relative paths are resolved against
    root: PathBuf,
    /// Covers folder relative to `root`, `/`-separated
    relative_dir: String,
}

impl CoverStore {
    /// Opens the store, creating `root/relative_dir` if needed.
    pub fn open(root: impl AsRef<Path>, relative_dir: &str) -> CoverResult<Self> {
        let store = Self {
            root: root.as_ref().to_path_buf(),
            relative_dir: relative_dir.trim_matches('/').to_string(),
        };

        fs::create_dir_all(store.folder()).map_err(|e| CoverError::IoError(e.to_string()))?;

        Ok(store)
    }

    /// Absolute folder holding the covers
    pub fn folder(&self) -> PathBuf {
        self.root.join(&self.relative_dir)
    }

    /// Resolves a relative cover path returned by [`CoverStore::save`].
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Hex SHA-256 of `data`
    pub fn content_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    /// Stores `data` as `<sha256><ext>`, where `<ext>` is the lower-cased
    /// extension of `original_name`. Existing files are left untouched.
    ///
    /// Returns the path relative to the data directory, e.g.
    /// `imagenes/portadas/ab12….png`.
    pub fn save(&self, data: &[u8], original_name: &str) -> CoverResult<String> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();
        let file_name = format!("{}{}", Self::content_hash(data), extension);

        let target = self.folder().join(&file_name);
        if !target.exists() {
            fs::write(&target, data).map_err(|e| CoverError::IoError(e.to_string()))?;
        }

        Ok(format!("{}/{}", self.relative_dir, file_name))
    }
}
