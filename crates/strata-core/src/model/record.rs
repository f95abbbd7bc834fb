//! Canonical persisted form of a data node
//!
//! Flat, backend-neutral, and free of live references: every function or
//! type a node points at is stored as a symbolic name. Field names are the
//! on-disk format shared by all backends and by exports.

use serde::{Deserialize, Serialize};

use super::properties::PropertyMap;
use super::scope::Scope;

/// Serialized edit
///
/// `timestamp` is always written; it is optional only so that legacy
/// job-id-only edits can still be read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

/// Persisted data node record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataNodeModel {
    pub id: String,
    pub config_id: String,
    pub scope: Scope,
    /// Kept as the raw tag so unknown variants still load as records
    pub storage_type: String,
    pub name: Option<String>,
    pub owner_id: Option<String>,
    #[serde(default)]
    pub parent_ids: Vec<String>,
    pub last_edit_date: Option<String>,
    #[serde(default)]
    pub edits: Vec<ModelEdit>,
    pub version: String,
    /// Set together with `validity_seconds` or not at all
    pub validity_days: Option<i64>,
    pub validity_seconds: Option<i64>,
    #[serde(default)]
    pub edit_in_progress: bool,
    #[serde(default)]
    pub properties: PropertyMap,
    /// Pre-edits schema: bare list of the jobs that wrote the data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_ids: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edit_extra_keys_are_flattened() {
        let edit: ModelEdit = serde_json::from_value(json!({
            "timestamp": "2024-01-01T00:00:00Z",
            "job_id": "job-1",
            "writer": "etl"
        }))
        .unwrap();

        assert_eq!(edit.timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(edit.extra.get("writer"), Some(&json!("etl")));
        assert_eq!(serde_json::to_value(&edit).unwrap()["writer"], json!("etl"));
    }

    #[test]
    fn test_legacy_record_without_edits_deserializes() {
        let model: DataNodeModel = serde_json::from_value(json!({
            "id": "dn-legacy",
            "config_id": "sales",
            "scope": "global",
            "storage_type": "csv",
            "name": null,
            "owner_id": null,
            "parent_ids": [],
            "last_edit_date": null,
            "version": "1.0",
            "validity_days": null,
            "validity_seconds": null,
            "job_ids": ["job-1", "job-2"]
        }))
        .unwrap();

        assert!(model.edits.is_empty());
        assert!(!model.edit_in_progress);
        assert_eq!(model.scope, Scope::Global);
        assert_eq!(model.job_ids.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_job_ids_omitted_when_absent() {
        let model = DataNodeModel {
            id: "dn-1".to_string(),
            config_id: "sales".to_string(),
            scope: Scope::Scenario,
            storage_type: "csv".to_string(),
            name: None,
            owner_id: None,
            parent_ids: Vec::new(),
            last_edit_date: None,
            edits: Vec::new(),
            version: "1.0".to_string(),
            validity_days: None,
            validity_seconds: None,
            edit_in_progress: false,
            properties: PropertyMap::new(),
            job_ids: None,
        };

        let value = serde_json::to_value(&model).unwrap();
        assert!(value.get("job_ids").is_none());
        assert_eq!(value["scope"], json!("scenario"));
        assert_eq!(value["validity_days"], json!(null));
    }
}
