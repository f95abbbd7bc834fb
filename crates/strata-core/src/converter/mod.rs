//! Entity/model conversion
//!
//! `to_model` turns a live `DataNode` into its flat persisted record;
//! `from_model` rebuilds the entity, resolving every symbolic reference
//! through the registry. Legacy shapes are upgraded on the way in and
//! reported through `Diagnostics`.

pub mod edits;
pub mod exposed_type;
pub mod migration;
pub mod references;
pub mod variants;

use std::sync::Arc;

use crate::diagnostics::Diagnostics;
use crate::errors::{Result, StrataError};
use crate::model::{DataNode, DataNodeModel};
use crate::registry::Registry;

pub use migration::{MigrationFn, MigrationHook, NoopMigrationHook, VersionMigrationHook};
pub use variants::{DecodeFn, VariantConstructors};

use edits::{
    deserialize_edits, edits_from_job_ids, format_timestamp, join_validity, parse_timestamp,
    serialize_edits, split_validity,
};
use references::EXPOSED_TYPE_KEY;

/// Bidirectional mapping between an entity and its persisted model
pub trait Converter: Send + Sync {
    type Entity;
    type Model;

    /// # Errors
    ///
    /// Fails only if the entity cannot be represented in the model.
    fn to_model(&self, entity: &Self::Entity, diagnostics: &mut Diagnostics)
        -> Result<Self::Model>;

    /// # Errors
    ///
    /// `UnknownVariant`, `Resolution` or `Format` when the model cannot be
    /// rebuilt into an entity.
    fn from_model(&self, model: &Self::Model, diagnostics: &mut Diagnostics)
        -> Result<Self::Entity>;

    /// Identifier of a model without converting it
    fn model_id<'a>(&self, model: &'a Self::Model) -> &'a str;

    fn entity_id<'a>(&self, entity: &'a Self::Entity) -> &'a str;
}

/// Converter for data nodes of every storage type
#[derive(Clone)]
pub struct DataNodeConverter {
    registry: Arc<Registry>,
    constructors: VariantConstructors,
    migration: Arc<dyn MigrationHook>,
}

impl DataNodeConverter {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            constructors: VariantConstructors::standard(),
            migration: Arc::new(NoopMigrationHook),
        }
    }

    pub fn with_migration_hook(mut self, hook: impl MigrationHook + 'static) -> Self {
        self.migration = Arc::new(hook);
        self
    }

    pub fn with_constructors(mut self, constructors: VariantConstructors) -> Self {
        self.constructors = constructors;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl std::fmt::Debug for DataNodeConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataNodeConverter")
            .field("symbols", &self.registry.len())
            .field("constructors", &self.constructors)
            .finish()
    }
}

impl Converter for DataNodeConverter {
    type Entity = DataNode;
    type Model = DataNodeModel;

    fn to_model(&self, node: &DataNode, diagnostics: &mut Diagnostics) -> Result<DataNodeModel> {
        let mut properties = node.properties.clone();
        variants::encode_kind(node.kind(), &mut properties);
        match &node.exposed_type {
            Some(exposed) => {
                properties.set(EXPOSED_TYPE_KEY, exposed_type::serialize(exposed));
            }
            None => {
                properties.remove(EXPOSED_TYPE_KEY);
            }
        }

        let (validity_days, validity_seconds) = split_validity(node.validity_period);

        Ok(DataNodeModel {
            id: node.id().to_string(),
            config_id: node.config_id.clone(),
            scope: node.scope,
            storage_type: node.storage_type().as_str().to_string(),
            name: node.name.clone(),
            owner_id: node.owner_id.clone(),
            parent_ids: node.parent_ids.iter().cloned().collect(),
            last_edit_date: node.last_edit_date.as_ref().map(format_timestamp),
            edits: serialize_edits(node.id(), &node.edits, diagnostics)?,
            version: node.version.clone(),
            validity_days,
            validity_seconds,
            edit_in_progress: node.edit_in_progress,
            properties,
            job_ids: None,
        })
    }

    fn from_model(&self, model: &DataNodeModel, diagnostics: &mut Diagnostics) -> Result<DataNode> {
        let decode =
            self.constructors
                .get(&model.storage_type)
                .ok_or_else(|| StrataError::UnknownVariant {
                    storage_type: model.storage_type.clone(),
                })?;

        let mut properties = model.properties.clone();
        let kind = decode(&mut properties, &self.registry)?;

        let exposed_type = properties
            .remove(EXPOSED_TYPE_KEY)
            .map(|value| exposed_type::deserialize(&value, &self.registry))
            .transpose()?
            .flatten();

        let validity_period = join_validity(model.validity_days, model.validity_seconds)?;
        let last_edit_date = model
            .last_edit_date
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_timestamp("last_edit_date", raw))
            .transpose()?;

        let mut edits = deserialize_edits(&model.id, &model.edits, diagnostics)?;
        if let Some(job_ids) = &model.job_ids {
            if edits.is_empty() {
                edits = edits_from_job_ids(&model.id, job_ids, diagnostics);
            }
        }

        let mut node = DataNode::new(model.id.clone(), model.config_id.clone(), kind);
        node.scope = model.scope;
        node.name = model.name.clone();
        node.owner_id = model.owner_id.clone();
        node.parent_ids = model.parent_ids.iter().cloned().collect();
        node.last_edit_date = last_edit_date;
        node.edits = edits;
        node.version = model.version.clone();
        node.validity_period = validity_period;
        node.edit_in_progress = model.edit_in_progress;
        node.exposed_type = exposed_type;
        node.properties = properties;

        tracing::debug!(
            component = module_path!(),
            op = "from_model",
            entity_id = model.id.as_str(),
            storage_type = model.storage_type.as_str(),
            version = model.version.as_str(),
            "Rebuilt data node"
        );

        self.migration.migrate(node, diagnostics)
    }

    fn model_id<'a>(&self, model: &'a DataNodeModel) -> &'a str {
        &model.id
    }

    fn entity_id<'a>(&self, node: &'a DataNode) -> &'a str {
        node.id()
    }
}
