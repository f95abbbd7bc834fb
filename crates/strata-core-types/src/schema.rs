//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_ENTITY_ID: &str = "entity_id";
pub const FIELD_STORAGE_TYPE: &str = "storage_type";
pub const FIELD_BACKEND: &str = "backend";

// Collection sizes
pub const FIELD_RECORD_COUNT: &str = "record_count";

// Diagnostic fields
pub const FIELD_DEPRECATED_FIELD: &str = "deprecated_field";
pub const FIELD_SUGGEST: &str = "suggest";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_DEPRECATION: &str = "deprecation";
