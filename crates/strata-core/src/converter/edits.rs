//! Timestamps, edits and validity periods
//!
//! Legacy edits without a timestamp cannot be dated any more; they are
//! stamped with the conversion time and reported as a deprecation.

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::{Result, StrataError};
use crate::model::{Edit, ModelEdit};

pub const LEGACY_JOB_IDS_FIELD: &str = "job_ids";
pub const EDITS_FIELD: &str = "edits";

const SECONDS_PER_DAY: i64 = 86_400;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// RFC 3339, UTC, with as many sub-second digits as needed
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one taken as UTC
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| StrataError::format(field, format!("'{}' is not an ISO-8601 timestamp", raw)))
}

/// Keys of a persisted edit that free-form extra keys may not reuse
pub const RESERVED_EDIT_KEYS: [&str; 2] = ["timestamp", "job_id"];

/// # Errors
///
/// `Format` if an edit's extra keys reuse a reserved key.
pub fn serialize_edits(
    entity_id: &str,
    edits: &[Edit],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<ModelEdit>> {
    edits
        .iter()
        .map(|edit| {
            if let Some(key) = RESERVED_EDIT_KEYS
                .iter()
                .find(|key| edit.extra.contains_key(key))
            {
                return Err(StrataError::format(
                    format!("edits.{}", key),
                    format!("'{}' is reserved and cannot be an extra edit key", key),
                ));
            }
            let timestamp = match &edit.timestamp {
                Some(ts) => *ts,
                None => {
                    diagnostics.push(Diagnostic::deprecated(
                        entity_id,
                        LEGACY_JOB_IDS_FIELD,
                        EDITS_FIELD,
                    ));
                    Utc::now()
                }
            };
            Ok(ModelEdit {
                timestamp: Some(format_timestamp(&timestamp)),
                job_id: edit.job_id.clone(),
                extra: edit.extra.clone(),
            })
        })
        .collect()
}

pub fn deserialize_edits(
    entity_id: &str,
    edits: &[ModelEdit],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Edit>> {
    edits
        .iter()
        .map(|edit| {
            let timestamp = match edit.timestamp.as_deref() {
                Some(raw) if !raw.is_empty() => parse_timestamp("edits.timestamp", raw)?,
                _ => {
                    diagnostics.push(Diagnostic::deprecated(
                        entity_id,
                        LEGACY_JOB_IDS_FIELD,
                        EDITS_FIELD,
                    ));
                    Utc::now()
                }
            };
            Ok(Edit {
                timestamp: Some(timestamp),
                job_id: edit.job_id.clone(),
                extra: edit.extra.clone(),
            })
        })
        .collect()
}

/// Turn a legacy `job_ids` list into edits stamped with the current time
pub fn edits_from_job_ids(
    entity_id: &str,
    job_ids: &[String],
    diagnostics: &mut Diagnostics,
) -> Vec<Edit> {
    diagnostics.push(Diagnostic::deprecated(
        entity_id,
        LEGACY_JOB_IDS_FIELD,
        EDITS_FIELD,
    ));
    let now = Utc::now();
    job_ids
        .iter()
        .map(|job_id| Edit::at(now).with_job_id(job_id.clone()))
        .collect()
}

/// Split a validity period into whole days and the remaining seconds
///
/// Sub-second precision is dropped.
pub fn split_validity(period: Option<Duration>) -> (Option<i64>, Option<i64>) {
    period
        .map(|d| {
            let total = d.num_seconds();
            (
                total.div_euclid(SECONDS_PER_DAY),
                total.rem_euclid(SECONDS_PER_DAY),
            )
        })
        .unzip()
}

pub fn join_validity(days: Option<i64>, seconds: Option<i64>) -> Result<Option<Duration>> {
    match (days, seconds) {
        (None, None) => Ok(None),
        (Some(days), Some(seconds)) => days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|d| d.checked_add(seconds))
            .and_then(Duration::try_seconds)
            .map(Some)
            .ok_or_else(|| StrataError::format("validity_days", "validity period out of range")),
        (Some(_), None) => Err(StrataError::format(
            "validity_seconds",
            "validity_days is set but validity_seconds is missing",
        )),
        (None, Some(_)) => Err(StrataError::format(
            "validity_days",
            "validity_seconds is set but validity_days is missing",
        )),
    }
}
