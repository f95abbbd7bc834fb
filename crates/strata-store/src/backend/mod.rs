//! Physical storage contract
//!
//! A backend stores models by id and knows nothing about entities,
//! conversion or filtering. The repository owns all of that.

#![allow(clippy::result_large_err)]

pub mod fs;
pub mod sqlite;

use crate::errors::Result;
use crate::model::StoredModel;

pub use fs::FsBackend;
pub use sqlite::{SqlRecord, SqliteBackend};

/// Narrow put/get/scan/delete contract over one record type
///
/// Writes are upserts and the last writer for an id wins.
pub trait Backend<M: StoredModel>: Send + Sync {
    /// Short name used in log events
    fn name(&self) -> &'static str;

    /// Insert or replace the record with `model.id()`
    fn put(&self, model: &M) -> Result<()>;

    fn get(&self, id: &str) -> Result<Option<M>>;

    /// Whether a record is stored under `id`
    fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Every stored record, in the backend's order
    fn scan(&self) -> Result<Vec<M>>;

    /// Remove one record; `Ok(false)` when nothing was stored under `id`
    fn delete(&self, id: &str) -> Result<bool>;

    /// Remove every record, returning how many were removed
    fn delete_all(&self) -> Result<usize>;
}

impl<M: StoredModel> Backend<M> for Box<dyn Backend<M>> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn put(&self, model: &M) -> Result<()> {
        (**self).put(model)
    }

    fn get(&self, id: &str) -> Result<Option<M>> {
        (**self).get(id)
    }

    fn contains(&self, id: &str) -> Result<bool> {
        (**self).contains(id)
    }

    fn scan(&self) -> Result<Vec<M>> {
        (**self).scan()
    }

    fn delete(&self, id: &str) -> Result<bool> {
        (**self).delete(id)
    }

    fn delete_all(&self) -> Result<usize> {
        (**self).delete_all()
    }
}
