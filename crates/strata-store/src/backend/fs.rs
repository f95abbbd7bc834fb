//! Filesystem backend
//!
//! One pretty-printed JSON document per record under
//! `<root>/<KIND_LABEL>/<id>.json`.

#![allow(clippy::result_large_err)]

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::Backend;
use crate::atomic::atomic_write;
use crate::errors::{invalid_input, io_error, serialization_error, Result};
use crate::model::StoredModel;

const EXTENSION: &str = "json";

/// Path of the document holding record `id` below `root`
///
/// # Errors
///
/// Returns `ERR_INVALID_INPUT` for ids that are not usable as a file name.
pub fn record_path<M: StoredModel>(root: &Path, id: &str) -> Result<PathBuf> {
    let unusable = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(&['/', '\\', '\0'][..]);
    if unusable {
        return Err(invalid_input(
            "record_path",
            format!("'{}' cannot be used as a file name", id),
        )
        .with_entity_id(id));
    }
    Ok(root
        .join(M::KIND_LABEL)
        .join(format!("{}.{}", id, EXTENSION)))
}

/// Filesystem backend rooted at a storage folder
#[derive(Debug, Clone)]
pub struct FsBackend<M> {
    root: PathBuf,
    _model: PhantomData<fn() -> M>,
}

impl<M: StoredModel> FsBackend<M> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            _model: PhantomData,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn kind_dir(&self) -> PathBuf {
        self.root.join(M::KIND_LABEL)
    }

    /// Paths of every stored document, in no particular order
    fn document_paths(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(self.kind_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("scan_dir", e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error("scan_dir", e))?.path();
            let is_document = path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION);
            if is_document {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    fn read_document(path: &Path) -> Result<Option<M>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("read_record", e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| serialization_error("read_record", e))
    }
}

impl<M: StoredModel> Backend<M> for FsBackend<M> {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn put(&self, model: &M) -> Result<()> {
        let path = record_path::<M>(&self.root, model.id())?;
        let bytes =
            serde_json::to_vec_pretty(model).map_err(|e| serialization_error("write_record", e))?;
        atomic_write(&path, &bytes)
    }

    fn get(&self, id: &str) -> Result<Option<M>> {
        let path = record_path::<M>(&self.root, id)?;
        Self::read_document(&path)
    }

    fn contains(&self, id: &str) -> Result<bool> {
        Ok(record_path::<M>(&self.root, id)?.is_file())
    }

    fn scan(&self) -> Result<Vec<M>> {
        let mut records = Vec::new();
        for path in self.document_paths()? {
            // A document removed between listing and reading is skipped
            if let Some(record) = Self::read_document(&path)? {
                records.push(record);
            }
        }
        records.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(records)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let path = record_path::<M>(&self.root, id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error("delete_record", e)),
        }
    }

    fn delete_all(&self) -> Result<usize> {
        let mut removed = 0;
        for path in self.document_paths()? {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(io_error("delete_record", e)),
            }
        }
        Ok(removed)
    }
}
