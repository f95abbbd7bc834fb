use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::edit::Edit;
use super::exposed_type::ExposedType;
use super::properties::PropertyMap;
use super::scope::Scope;
use super::storage_type::StorageType;
use crate::registry::{FunctionHandle, TypeHandle};

/// Version tag given to freshly constructed data nodes
pub const DEFAULT_VERSION: &str = "1.0";

/// Properties of a data node read and written by user functions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenericProperties {
    pub read_fct: Option<FunctionHandle>,
    pub write_fct: Option<FunctionHandle>,
}

/// Properties of a JSON file data node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonProperties {
    pub encoder: Option<TypeHandle>,
    pub decoder: Option<TypeHandle>,
}

/// Properties of a query-backed SQL data node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlProperties {
    pub write_query_builder: Option<FunctionHandle>,
}

/// Properties of a document-collection data node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MongoCollectionProperties {
    pub custom_document: Option<TypeHandle>,
}

/// Variant of a data node together with its typed properties
///
/// Variants without reference-bearing properties keep everything in the
/// node's extension map.
#[derive(Debug, Clone, PartialEq)]
pub enum DataNodeKind {
    Generic(GenericProperties),
    Json(JsonProperties),
    Sql(SqlProperties),
    MongoCollection(MongoCollectionProperties),
    SqlTable,
    Csv,
    Excel,
    Parquet,
    Pickle,
    InMemory,
}

impl DataNodeKind {
    pub fn storage_type(&self) -> StorageType {
        match self {
            DataNodeKind::Generic(_) => StorageType::Generic,
            DataNodeKind::Json(_) => StorageType::Json,
            DataNodeKind::Sql(_) => StorageType::Sql,
            DataNodeKind::MongoCollection(_) => StorageType::MongoCollection,
            DataNodeKind::SqlTable => StorageType::SqlTable,
            DataNodeKind::Csv => StorageType::Csv,
            DataNodeKind::Excel => StorageType::Excel,
            DataNodeKind::Parquet => StorageType::Parquet,
            DataNodeKind::Pickle => StorageType::Pickle,
            DataNodeKind::InMemory => StorageType::InMemory,
        }
    }
}

/// DataNode - a logical data artifact managed by the orchestration layer
///
/// The identifier and the variant are fixed at construction; every other
/// attribute is public and may be replaced by the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct DataNode {
    id: String,
    kind: DataNodeKind,

    pub config_id: String,
    pub scope: Scope,
    pub name: Option<String>,
    pub owner_id: Option<String>,

    /// Unordered, deduplicated
    pub parent_ids: BTreeSet<String>,

    pub last_edit_date: Option<DateTime<Utc>>,

    /// Append order is chronological
    pub edits: Vec<Edit>,

    pub version: String,
    pub validity_period: Option<Duration>,
    pub edit_in_progress: bool,
    pub exposed_type: Option<ExposedType>,

    /// Extension properties not covered by the typed variant fields
    pub properties: PropertyMap,
}

impl DataNode {
    /// Create a new DataNode with the given ID, configuration ID and variant
    ///
    /// # Returns
    /// A node with scenario scope, no parents, no edits and the default version
    pub fn new(id: impl Into<String>, config_id: impl Into<String>, kind: DataNodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            config_id: config_id.into(),
            scope: Scope::default(),
            name: None,
            owner_id: None,
            parent_ids: BTreeSet::new(),
            last_edit_date: None,
            edits: Vec::new(),
            version: DEFAULT_VERSION.to_string(),
            validity_period: None,
            edit_in_progress: false,
            exposed_type: None,
            properties: PropertyMap::new(),
        }
    }

    /// Generate a fresh identifier for a node built from `config_id`
    pub fn generate_id(config_id: &str) -> String {
        format!("DATANODE_{}_{}", config_id, Uuid::now_v7())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &DataNodeKind {
        &self.kind
    }

    pub fn storage_type(&self) -> StorageType {
        self.kind.storage_type()
    }

    /// Add a parent ID; duplicates collapse
    pub fn add_parent_id(&mut self, parent_id: impl Into<String>) {
        self.parent_ids.insert(parent_id.into());
    }

    /// Append an edit and advance `last_edit_date` to its timestamp
    pub fn push_edit(&mut self, edit: Edit) {
        if let Some(ts) = edit.timestamp {
            self.last_edit_date = Some(ts);
        }
        self.edits.push(edit);
    }

    /// Whether the data is still within its validity period at `now`
    ///
    /// Nodes never edited are not up to date; nodes without a validity
    /// period never expire.
    pub fn is_up_to_date_at(&self, now: DateTime<Utc>) -> bool {
        match (self.last_edit_date, self.validity_period) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(last), Some(period)) => last + period >= now,
        }
    }
}
