//! Version migration hook
//!
//! Runs on every loaded entity after conversion. The default hook does
//! nothing; `VersionMigrationHook` upgrades entities of selected
//! configurations whose version differs from a target.

use std::collections::BTreeMap;
use std::fmt;

use crate::diagnostics::Diagnostics;
use crate::errors::Result;
use crate::model::DataNode;

/// Hook applied to each entity right after it is rebuilt from its model
pub trait MigrationHook: Send + Sync {
    /// Return the (possibly upgraded) entity
    ///
    /// # Errors
    ///
    /// Any error aborts the load of this entity.
    fn migrate(&self, node: DataNode, diagnostics: &mut Diagnostics) -> Result<DataNode>;
}

/// Hook that returns every entity unchanged
///
/// # Example
/// ```
/// use strata_core::converter::{MigrationHook, NoopMigrationHook};
/// use strata_core::diagnostics::Diagnostics;
/// use strata_core::model::{DataNode, DataNodeKind};
///
/// let node = DataNode::new("dn-1", "sales", DataNodeKind::Csv);
/// let migrated = NoopMigrationHook
///     .migrate(node.clone(), &mut Diagnostics::new())
///     .unwrap();
/// assert_eq!(migrated, node);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMigrationHook;

impl MigrationHook for NoopMigrationHook {
    fn migrate(&self, node: DataNode, _diagnostics: &mut Diagnostics) -> Result<DataNode> {
        Ok(node)
    }
}

/// Single upgrade step for one configuration
pub type MigrationFn = fn(DataNode) -> Result<DataNode>;

/// Hook upgrading entities whose version differs from `target_version`
///
/// Steps are registered per `config_id` and run in registration order.
/// The version is only rewritten when at least one step ran.
#[derive(Clone)]
pub struct VersionMigrationHook {
    target_version: String,
    migrations: BTreeMap<String, Vec<MigrationFn>>,
}

impl VersionMigrationHook {
    pub fn new(target_version: impl Into<String>) -> Self {
        Self {
            target_version: target_version.into(),
            migrations: BTreeMap::new(),
        }
    }

    pub fn with_step(mut self, config_id: impl Into<String>, step: MigrationFn) -> Self {
        self.migrations.entry(config_id.into()).or_default().push(step);
        self
    }

    pub fn target_version(&self) -> &str {
        &self.target_version
    }
}

impl fmt::Debug for VersionMigrationHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionMigrationHook")
            .field("target_version", &self.target_version)
            .field("configs", &self.migrations.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MigrationHook for VersionMigrationHook {
    fn migrate(&self, node: DataNode, _diagnostics: &mut Diagnostics) -> Result<DataNode> {
        if node.version == self.target_version {
            return Ok(node);
        }
        let Some(steps) = self.migrations.get(&node.config_id) else {
            return Ok(node);
        };
        if steps.is_empty() {
            return Ok(node);
        }

        let from = node.version.clone();
        let mut node = steps.iter().try_fold(node, |node, step| step(node))?;
        node.version = self.target_version.clone();
        tracing::debug!(
            component = module_path!(),
            op = "migrate",
            entity_id = node.id(),
            from_version = from.as_str(),
            to_version = self.target_version.as_str(),
            "Migrated entity"
        );
        Ok(node)
    }
}
