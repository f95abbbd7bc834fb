//! Records a backend can store
//!
//! Backends see only models: flat, serializable, reference-free records.
//! Entities never reach this crate's storage layer.

use serde::de::DeserializeOwned;
use serde::Serialize;
use strata_core::model::DataNodeModel;

/// A persisted record addressable by id
pub trait StoredModel: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Directory / label under which records of this kind are grouped
    const KIND_LABEL: &'static str;

    fn id(&self) -> &str;
}

impl StoredModel for DataNodeModel {
    const KIND_LABEL: &'static str = "data_node";

    fn id(&self) -> &str {
        &self.id
    }
}
