//! Store configuration
//!
//! Selects the physical backend and where it keeps its data. Usually read
//! from a `strata.toml`:
//!
//! ```toml
//! backend = "sqlite"
//! storage_folder = "/var/lib/strata"
//! sqlite_path = ":memory:"
//! ```

#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, FsBackend, SqlRecord, SqliteBackend};
use crate::errors::{invalid_input, io_error, Result};

/// Path value selecting an in-memory SQLite database
pub const IN_MEMORY: &str = ":memory:";

const DEFAULT_STORAGE_FOLDER: &str = ".strata";
const DEFAULT_SQLITE_FILE: &str = "strata.db";

/// Which physical store records go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Filesystem,
    Sqlite,
}

/// Backend selection and locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Root of the filesystem backend, and parent of the default database
    pub storage_folder: PathBuf,
    /// Database file; `:memory:` for an in-memory database
    pub sqlite_path: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            storage_folder: PathBuf::from(DEFAULT_STORAGE_FOLDER),
            sqlite_path: None,
        }
    }
}

impl StoreConfig {
    pub fn filesystem(storage_folder: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::Filesystem,
            storage_folder: storage_folder.into(),
            sqlite_path: None,
        }
    }

    pub fn sqlite(storage_folder: impl Into<PathBuf>, sqlite_path: Option<String>) -> Self {
        Self {
            backend: BackendKind::Sqlite,
            storage_folder: storage_folder.into(),
            sqlite_path,
        }
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// `ERR_IO` if the file cannot be read, `ERR_INVALID_INPUT` if it is
    /// not valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| io_error("load_config", e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            component = module_path!(),
            op = "load_config",
            backend = ?config.backend,
            "Configuration loaded from {}",
            path.display()
        );
        Ok(config)
    }

    /// # Errors
    ///
    /// `ERR_INVALID_INPUT` on malformed TOML or unknown backend names.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| invalid_input("parse_config", e.to_string()))
    }

    /// Where the SQLite backend keeps its database
    pub fn sqlite_location(&self) -> SqliteLocation {
        match self.sqlite_path.as_deref() {
            Some(IN_MEMORY) => SqliteLocation::InMemory,
            Some(path) if !path.is_empty() => SqliteLocation::File(PathBuf::from(path)),
            _ => SqliteLocation::File(self.storage_folder.join(DEFAULT_SQLITE_FILE)),
        }
    }

    /// Open the configured backend for records of type `M`
    ///
    /// # Errors
    ///
    /// Failures creating the storage folder or opening/migrating the
    /// database.
    pub fn open_backend<M: SqlRecord>(&self) -> Result<Box<dyn Backend<M>>> {
        match self.backend {
            BackendKind::Filesystem => Ok(Box::new(FsBackend::<M>::new(&self.storage_folder))),
            BackendKind::Sqlite => {
                let backend = match self.sqlite_location() {
                    SqliteLocation::InMemory => SqliteBackend::<M>::open_in_memory()?,
                    SqliteLocation::File(path) => {
                        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                            std::fs::create_dir_all(parent)
                                .map_err(|e| io_error("create_dir", e))?;
                        }
                        SqliteBackend::<M>::open(&path)?
                    }
                };
                Ok(Box::new(backend))
            }
        }
    }
}

/// Resolved SQLite database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteLocation {
    InMemory,
    File(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::model::DataNodeModel;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_keys_missing() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.backend, BackendKind::Filesystem);
    }

    #[test]
    fn test_parse_sqlite_config() {
        let config = StoreConfig::from_toml_str(
            r#"
            backend = "sqlite"
            storage_folder = "/srv/strata"
            sqlite_path = ":memory:"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::Sqlite);
        assert_eq!(config.sqlite_location(), SqliteLocation::InMemory);
    }

    #[test]
    fn test_default_database_lives_in_storage_folder() {
        let config = StoreConfig::sqlite("/srv/strata", None);
        assert_eq!(
            config.sqlite_location(),
            SqliteLocation::File(PathBuf::from("/srv/strata/strata.db"))
        );
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = StoreConfig::from_toml_str(r#"backend = "mongo""#).unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_INPUT");
    }

    #[test]
    fn test_open_backends() {
        let dir = TempDir::new().unwrap();

        let fs = StoreConfig::filesystem(dir.path())
            .open_backend::<DataNodeModel>()
            .unwrap();
        assert_eq!(fs.name(), "filesystem");

        let sqlite = StoreConfig::sqlite(dir.path().join("nested"), None)
            .open_backend::<DataNodeModel>()
            .unwrap();
        assert_eq!(sqlite.name(), "sqlite");
        assert!(dir.path().join("nested").join("strata.db").exists());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("strata.toml");
        std::fs::write(&path, "backend = \"filesystem\"\nstorage_folder = \"data\"\n").unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.storage_folder, PathBuf::from("data"));
    }
}
