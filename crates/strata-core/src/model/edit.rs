use chrono::{DateTime, Utc};
use serde_json::Value;

use super::properties::PropertyMap;

/// One recorded modification of a data node's underlying data
///
/// `timestamp` is only ever `None` on legacy edits that were recorded as a
/// bare job id; conversion stamps those with the current time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Edit {
    pub timestamp: Option<DateTime<Utc>>,
    pub job_id: Option<String>,
    /// Free-form keys (writer, comment, ...)
    pub extra: PropertyMap,
}

impl Edit {
    /// Edit made at `timestamp`
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..Self::default()
        }
    }

    /// Legacy edit carrying only the job that produced it
    pub fn legacy(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Self::default()
        }
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.set(key, value);
        self
    }

    pub fn is_legacy(&self) -> bool {
        self.timestamp.is_none()
    }
}
