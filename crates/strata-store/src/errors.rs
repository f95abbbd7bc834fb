//! Error handling for strata-store
//!
//! Wraps strata-core ExError with store-specific helpers

use strata_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error for an already applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a not-found error for a record id
pub fn not_found(operation: &str, id: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(operation.to_string())
        .with_entity_id(id)
        .with_message("Entity not found")
}

/// Create a serialization error from serde_json::Error
pub fn serialization_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an invalid-input error (bad configuration, unusable paths)
pub fn invalid_input(operation: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(operation.to_string())
        .with_message(reason)
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_helpers_are_backend_kinds() {
        let db = from_rusqlite(rusqlite::Error::InvalidQuery);
        let io = io_error("read", std::io::Error::from(std::io::ErrorKind::PermissionDenied));

        assert!(db.kind().is_backend());
        assert!(io.kind().is_backend());
        assert_eq!(io.op(), Some("read"));
    }

    #[test]
    fn test_not_found_carries_id() {
        let err = not_found("load", "dn-1");
        assert_eq!(err.code(), "ERR_NOT_FOUND");
        assert_eq!(err.entity_id(), Some("dn-1"));
    }
}
