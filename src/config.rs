//! Configuration file
//!
//! A single JSON object. Only `data_dir` is required; every file name is
//! resolved relative to it.
//!
//! ```json
//! { "data_dir": "./data", "table_size": 100 }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::covers::DEFAULT_COVERS_DIR;
use crate::index::DEFAULT_TABLE_SIZE;
use crate::observability::Severity;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Number of hash index buckets (default 100)
    #[serde(default = "default_table_size")]
    pub table_size: usize,

    /// Inventory file name (default "inventario.json")
    #[serde(default = "default_inventory_file")]
    pub inventory_file: String,

    /// Index file name (default "tabla_hash.json")
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Cover folder (default "imagenes/portadas")
    #[serde(default = "default_covers_dir")]
    pub covers_dir: String,

    /// Lowest log severity written to stderr (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_table_size() -> usize {
    DEFAULT_TABLE_SIZE
}
fn default_inventory_file() -> String {
    "inventario.json".to_string()
}
fn default_index_file() -> String {
    "tabla_hash.json".to_string()
}
fn default_covers_dir() -> String {
    DEFAULT_COVERS_DIR.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            table_size: default_table_size(),
            inventory_file: default_inventory_file(),
            index_file: default_index_file(),
            covers_dir: default_covers_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Config rooted at `data_dir` with every other field defaulted
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_string_lossy().into_owned(),
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".to_string()));
        }
        if self.table_size == 0 {
            return Err(ConfigError::Invalid("table_size must be > 0".to_string()));
        }
        for (name, value) in [
            ("inventory_file", &self.inventory_file),
            ("index_file", &self.index_file),
            ("covers_dir", &self.covers_dir),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
        }
        if self.inventory_file == self.index_file {
            return Err(ConfigError::Invalid(
                "inventory_file and index_file must differ".to_string(),
            ));
        }
        self.log_severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> Result<Severity, ConfigError> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "Invalid log_level: '{}'. Must be trace, info, warn or error.",
                self.log_level
            ))
        })
    }

    /// Data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Full path of the inventory file
    pub fn inventory_path(&self) -> PathBuf {
        self.data_path().join(&self.inventory_file)
    }

    /// Full path of the index file
    pub fn index_path(&self) -> PathBuf {
        self.data_path().join(&self.index_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("gameshelf.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults_applied() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"{ "data_dir": "/srv/shelf" }"#);

        let config = Config::load(&path).unwrap();

        assert_eq!(config.table_size, 100);
        assert_eq!(config.inventory_file, "inventario.json");
        assert_eq!(config.index_file, "tabla_hash.json");
        assert_eq!(config.covers_dir, "imagenes/portadas");
        assert_eq!(config.inventory_path(), Path::new("/srv/shelf/inventario.json"));
        assert_eq!(config.index_path(), Path::new("/srv/shelf/tabla_hash.json"));
    }

    #[test]
    fn test_missing_data_dir_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"{ "table_size": 10 }"#);

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_table_size_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"{ "data_dir": ".", "table_size": 0 }"#);

        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_same_file_names_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"{ "data_dir": ".", "inventory_file": "x.json", "index_file": "x.json" }"#,
        );

        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"{ "data_dir": ".", "log_level": "chatty" }"#);

        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_or_default(&temp.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(&temp.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
