#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::{Duration, Instant};

use strata_core::diagnostics::{Diagnostic, Diagnostics};
use strata_core::errors::{ExError, ExErrorKind, StrataError};
use strata_core::logging_facility::test_capture::{init_test_capture, CapturedEvent};
use strata_core::{log_deprecation, log_op_end, log_op_error, log_op_start};
use strata_core_types::schema::{
    EVENT_DEPRECATION, EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_BACKEND,
    FIELD_DEPRECATED_FIELD, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_STORAGE_TYPE, FIELD_SUGGEST,
};
use tracing::Level;

fn events_for_op(events: &[CapturedEvent], op: &str) -> Vec<CapturedEvent> {
    events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op))
        .cloned()
        .collect()
}

#[test]
fn test_start_is_debug_and_carries_extra_fields() {
    let capture = init_test_capture();
    let op = "logging_start_fields_op";

    log_op_start!(op, entity_id = "log-dn-start", storage_type = "csv");

    let events = events_for_op(&capture.events(), op);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::DEBUG);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].entity_id.as_deref(), Some("log-dn-start"));
    assert_eq!(
        events[0].fields.get(FIELD_STORAGE_TYPE).map(String::as_str),
        Some("csv")
    );
}

#[test]
fn test_end_measures_duration_from_instant() {
    let capture = init_test_capture();
    let op = "logging_end_duration_op";
    let started = Instant::now() - Duration::from_millis(25);

    log_op_end!(op, since = started, backend = "filesystem");

    let events = events_for_op(&capture.events(), op);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::INFO);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));

    let duration: u64 = events[0].fields[FIELD_DURATION_MS].parse().unwrap();
    assert!(duration >= 25, "duration_ms was {}", duration);
    assert_eq!(
        events[0].fields.get(FIELD_BACKEND).map(String::as_str),
        Some("filesystem")
    );
}

#[test]
fn test_error_carries_stable_code_for_domain_error() {
    let capture = init_test_capture();
    let op = "logging_error_domain_op";

    let err = StrataError::UnknownVariant {
        storage_type: "s3_object".to_string(),
    };
    log_op_error!(op, err, since = Instant::now(), entity_id = "log-dn-err");

    let events = events_for_op(&capture.events(), op);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::ERROR);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(
        events[0].fields.get(FIELD_ERR_CODE).map(String::as_str),
        Some("ERR_UNKNOWN_VARIANT")
    );
    assert_eq!(events[0].entity_id.as_deref(), Some("log-dn-err"));
    assert!(events[0].fields["message"].contains("s3_object"));
}

#[test]
fn test_error_accepts_structured_error() {
    let capture = init_test_capture();
    let op = "logging_error_structured_op";

    let err = ExError::new(ExErrorKind::Persistence).with_message("disk full");
    log_op_error!(op, err, since = Instant::now());

    let events = events_for_op(&capture.events(), op);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].fields.get(FIELD_ERR_CODE).map(String::as_str),
        Some("ERR_PERSISTENCE")
    );
}

#[test]
fn test_operation_brackets_do_not_interleave_across_ops() {
    let capture = init_test_capture();
    let save = "logging_bracket_save_op";
    let load = "logging_bracket_load_op";

    let started = Instant::now();
    log_op_start!(save);
    log_op_start!(load);
    log_op_end!(save, since = started);
    log_op_error!(
        load,
        StrataError::NotFound {
            entity_id: "missing".to_string()
        },
        since = started
    );

    let events = capture.events();
    let save_events: Vec<_> = events_for_op(&events, save)
        .into_iter()
        .filter_map(|e| e.event)
        .collect();
    let load_events: Vec<_> = events_for_op(&events, load)
        .into_iter()
        .filter_map(|e| e.event)
        .collect();

    assert_eq!(save_events, vec![EVENT_START, EVENT_END]);
    assert_eq!(load_events, vec![EVENT_START, EVENT_END_ERROR]);
}

#[test]
fn test_deprecation_macro_emits_warning() {
    let capture = init_test_capture();

    log_deprecation!("log-dn-deprecated", "job_ids", "edits", "legacy list read");

    let events = capture.events_for_entity("log-dn-deprecated");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::WARN);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_DEPRECATION));
    assert_eq!(
        events[0].fields.get(FIELD_SUGGEST).map(String::as_str),
        Some("edits")
    );
    assert_eq!(
        events[0].fields.get(FIELD_DEPRECATED_FIELD).map(String::as_str),
        Some("job_ids")
    );
}

#[test]
fn test_each_recorded_diagnostic_is_logged_once() {
    let capture = init_test_capture();
    let mut diagnostics = Diagnostics::new();

    diagnostics.push(Diagnostic::deprecated("log-dn-diag", "job_ids", "edits"));
    diagnostics.push(Diagnostic::deprecated("log-dn-diag", "edits", "edits"));

    let mut merged = Diagnostics::new();
    merged.append(&mut diagnostics);

    let count = capture.count_events(|e| {
        e.entity_id.as_deref() == Some("log-dn-diag")
            && e.event.as_deref() == Some(EVENT_DEPRECATION)
    });
    assert_eq!(count, 2);
    assert_eq!(merged.deprecation_count(), 2);
}
