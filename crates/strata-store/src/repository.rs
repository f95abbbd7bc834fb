//! Backend-agnostic repository
//!
//! Converts entities to models on the way in and back on the way out;
//! filtering, search and export all operate on the canonical model so
//! they behave the same over every backend.
//!
//! Every public operation is bracketed by `log_op_start!` and
//! `log_op_end!` (or `log_op_error!`), tagged with the backend name.

#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use serde_json::Value;
use strata_core::diagnostics::{Diagnostic, Diagnostics};
use strata_core::errors::{ExError, ExErrorKind};
use strata_core::logging_facility::elapsed_ms;
use strata_core::{log_op_end, log_op_error, log_op_start, Converter};

use crate::atomic::atomic_write;
use crate::backend::fs::record_path;
use crate::backend::Backend;
use crate::errors::{not_found, serialization_error, Result};
use crate::filter::{matches_any, Filter};
use crate::model::StoredModel;

/// Diagnostics kept by a repository before the oldest are dropped
pub const DEFAULT_DIAGNOSTICS_LIMIT: usize = 1024;

/// Repository over converter `C` and backend `B`
///
/// Holds no cache: every read goes to the backend, so a caller always
/// observes its own writes. Concurrent writers to one id are not
/// coordinated; the last `save` wins.
///
/// Conversion diagnostics accumulate until drained with
/// [`Repository::take_diagnostics`]; past the configured limit only the
/// most recent ones are kept.
pub struct Repository<C, B> {
    converter: C,
    backend: B,
    diagnostics: Mutex<Diagnostics>,
    diagnostics_limit: usize,
}

impl<C, B> Repository<C, B>
where
    C: Converter,
    C::Model: StoredModel,
    B: Backend<C::Model>,
{
    pub fn new(converter: C, backend: B) -> Self {
        Self {
            converter,
            backend,
            diagnostics: Mutex::new(Diagnostics::new()),
            diagnostics_limit: DEFAULT_DIAGNOSTICS_LIMIT,
        }
    }

    /// Keep at most `limit` undrained diagnostics
    pub fn with_diagnostics_limit(mut self, limit: usize) -> Self {
        self.diagnostics_limit = limit;
        self
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Drain the diagnostics raised by conversions so far
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|mut d| d.take())
            .unwrap_or_default()
    }

    /// Insert or replace an entity
    ///
    /// # Errors
    ///
    /// Conversion failures, or `ERR_PERSISTENCE`/`ERR_IO` from the backend.
    pub fn save(&self, entity: &C::Entity) -> Result<()> {
        self.instrumented("save", Some(self.converter.entity_id(entity)), || {
            let model = self.convert_to_model(entity)?;
            self.backend.put(&model)
        })
    }

    /// Load one entity
    ///
    /// # Errors
    ///
    /// `ERR_NOT_FOUND` if no record has this id; conversion errors if the
    /// stored record cannot be rebuilt.
    pub fn load(&self, id: &str) -> Result<C::Entity> {
        self.instrumented("load", Some(id), || {
            let model = self.fetch_model("load", id)?;
            self.convert_from_model(&model)
        })
    }

    /// Load the stored model without converting it
    ///
    /// # Errors
    ///
    /// `ERR_NOT_FOUND` if no record has this id.
    pub fn load_model(&self, id: &str) -> Result<C::Model> {
        self.instrumented("load_model", Some(id), || self.fetch_model("load_model", id))
    }

    /// # Errors
    ///
    /// Backend failures only.
    pub fn exists(&self, id: &str) -> Result<bool> {
        self.backend.contains(id)
    }

    /// Load every entity matching `filters` (all entities for an empty slice)
    ///
    /// Results follow the backend's scan order.
    ///
    /// # Errors
    ///
    /// Backend failures, or the first conversion error among matching
    /// records.
    pub fn load_all(&self, filters: &[Filter]) -> Result<Vec<C::Entity>> {
        self.instrumented("load_all", None, || {
            let started = Instant::now();
            let entities = self
                .matching_models(filters)?
                .iter()
                .map(|model| self.convert_from_model(model))
                .collect::<Result<Vec<_>>>()?;
            tracing::debug!(
                component = module_path!(),
                op = "load_all",
                record_count = entities.len() as u64,
                filter_count = filters.len() as u64,
                duration_ms = elapsed_ms(started),
                "Loaded entities"
            );
            Ok(entities)
        })
    }

    /// Delete one entity; `Ok(false)` when it did not exist
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub fn delete(&self, id: &str) -> Result<bool> {
        self.instrumented("delete", Some(id), || self.backend.delete(id))
    }

    /// Delete several entities, skipping ids that do not exist
    ///
    /// Returns the number actually removed.
    ///
    /// # Errors
    ///
    /// Backend failures; ids before the failing one stay deleted.
    pub fn delete_many<I, S>(&self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.instrumented("delete_many", None, || {
            let mut removed = 0;
            for id in ids {
                if self.backend.delete(id.as_ref())? {
                    removed += 1;
                }
            }
            Ok(removed)
        })
    }

    /// Delete every entity, returning how many were removed
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub fn delete_all(&self) -> Result<usize> {
        self.instrumented("delete_all", None, || self.backend.delete_all())
    }

    /// First entity (in scan order) whose `field` equals `value`
    ///
    /// # Errors
    ///
    /// `ERR_NOT_FOUND` when nothing matches.
    pub fn search(&self, field: &str, value: impl Into<Value>) -> Result<C::Entity> {
        let value = value.into();
        self.instrumented("search", None, || {
            let filter = Filter::eq(field, value.clone());
            let model = self
                .matching_models(std::slice::from_ref(&filter))?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    ExError::new(ExErrorKind::NotFound)
                        .with_op("search")
                        .with_message(format!("No entity with {} == {}", field, value))
                })?;
            self.convert_from_model(&model)
        })
    }

    /// Write the stored model of `id` to `<destination>/<kind>/<id>.json`
    ///
    /// The output is the backend-independent JSON form regardless of
    /// which backend holds the record. Returns the written path.
    ///
    /// # Errors
    ///
    /// `ERR_NOT_FOUND` if no record has this id; `ERR_IO` if the file
    /// cannot be written.
    pub fn export(&self, id: &str, destination: impl AsRef<Path>) -> Result<PathBuf> {
        self.instrumented("export", Some(id), || {
            let model = self.fetch_model("export", id)?;
            let path = record_path::<C::Model>(destination.as_ref(), id)?;
            let bytes = serde_json::to_vec_pretty(&model)
                .map_err(|e| serialization_error("export", e))?;
            atomic_write(&path, &bytes)?;
            Ok(path)
        })
    }

    fn fetch_model(&self, op: &str, id: &str) -> Result<C::Model> {
        self.backend.get(id)?.ok_or_else(|| not_found(op, id))
    }

    fn matching_models(&self, filters: &[Filter]) -> Result<Vec<C::Model>> {
        let models = self.backend.scan()?;
        if filters.iter().all(Filter::is_empty) {
            return Ok(models);
        }

        let mut matching = Vec::new();
        for model in models {
            let record = serde_json::to_value(&model)
                .map_err(|e| serialization_error("filter", e))?;
            if matches_any(filters, &record) {
                matching.push(model);
            }
        }
        Ok(matching)
    }

    fn convert_to_model(&self, entity: &C::Entity) -> Result<C::Model> {
        let mut diagnostics = Diagnostics::new();
        let result = self.converter.to_model(entity, &mut diagnostics);
        self.collect(diagnostics);
        result.map_err(|e| ExError::from(e).with_op("to_model"))
    }

    fn convert_from_model(&self, model: &C::Model) -> Result<C::Entity> {
        let mut diagnostics = Diagnostics::new();
        let result = self.converter.from_model(model, &mut diagnostics);
        self.collect(diagnostics);
        result.map_err(|e| {
            ExError::from(e)
                .with_op("from_model")
                .with_entity_id(self.converter.model_id(model))
        })
    }

    fn collect(&self, mut diagnostics: Diagnostics) {
        if diagnostics.is_empty() {
            return;
        }
        if let Ok(mut all) = self.diagnostics.lock() {
            all.append(&mut diagnostics);
            let dropped = all.retain_latest(self.diagnostics_limit);
            if dropped > 0 {
                tracing::debug!(
                    component = module_path!(),
                    dropped = dropped as u64,
                    limit = self.diagnostics_limit as u64,
                    "Dropped oldest diagnostics"
                );
            }
        }
    }

    fn instrumented<T>(
        &self,
        op: &'static str,
        entity_id: Option<&str>,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let backend = self.backend.name();
        log_op_start!(op, backend = backend, entity_id = entity_id);
        let started = Instant::now();

        let result = f().map_err(|e| {
            log_op_error!(
                op,
                e.clone(),
                since = started,
                backend = backend,
                entity_id = entity_id
            );
            e
        })?;

        log_op_end!(op, since = started, backend = backend, entity_id = entity_id);
        Ok(result)
    }
}

impl<C, B> std::fmt::Debug for Repository<C, B>
where
    C: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("converter", &self.converter)
            .finish_non_exhaustive()
    }
}
