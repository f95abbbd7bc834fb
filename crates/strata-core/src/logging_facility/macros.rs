//! Canonical logging macros
//!
//! Operation boundaries are logged as a `start` event at DEBUG, then either
//! an `end` event at INFO or an `end_error` event at ERROR. Both closing
//! macros take the `Instant` captured when the operation began and derive
//! `duration_ms` from it.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use strata_core::log_op_start;
/// log_op_start!("save");
/// log_op_start!("save", entity_id = "dn-1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Log the successful end of an operation started at `since`
///
/// # Example
///
/// ```
/// # use strata_core::log_op_end;
/// let started = std::time::Instant::now();
/// log_op_end!("save", since = started, backend = "filesystem");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, since = $since:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $crate::logging_facility::elapsed_ms($since),
            $($($field)*)?
        );
    };
}

/// Log the failure of an operation started at `since`
///
/// `$err` is anything convertible into `ExError`; its kind and stable code
/// are attached as `err.kind` and `err.code`.
///
/// # Example
///
/// ```
/// # use strata_core::{log_op_error, errors::StrataError};
/// let started = std::time::Instant::now();
/// let err = StrataError::NotFound { entity_id: "dn-1".to_string() };
/// log_op_error!("load", err, since = started, entity_id = "dn-1");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, since = $since:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $crate::logging_facility::elapsed_ms($since),
            $($($field)*,)?
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            "{}",
            ex_err
        );
    }};
}

/// Log use of a deprecated persisted field
///
/// # Example
///
/// ```
/// # use strata_core::log_deprecation;
/// log_deprecation!("dn-1", "job_ids", "edits", "legacy job list read");
/// ```
#[macro_export]
macro_rules! log_deprecation {
    ($entity_id:expr, $field:expr, $suggest:expr, $($msg:tt)+) => {
        tracing::warn!(
            component = module_path!(),
            op = "convert",
            event = $crate::core_types::schema::EVENT_DEPRECATION,
            entity_id = $entity_id,
            deprecated_field = $field,
            suggest = $suggest,
            $($msg)+
        );
    };
}
