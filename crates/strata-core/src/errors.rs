use thiserror::Error;

/// Result type alias using StrataError
pub type Result<T> = std::result::Result<T, StrataError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log correlation. None of these kinds are
/// transient: every failure surfaces to the caller unchanged and is never
/// retried inside the conversion or repository layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Lookup
    NotFound,

    // Conversion
    UnknownVariant,
    Resolution,
    Format,
    DuplicateSymbol,

    // Input
    InvalidInput,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::UnknownVariant => "ERR_UNKNOWN_VARIANT",
            ExErrorKind::Resolution => "ERR_RESOLUTION",
            ExErrorKind::Format => "ERR_FORMAT",
            ExErrorKind::DuplicateSymbol => "ERR_DUPLICATE_SYMBOL",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind originates in the physical store rather than in
    /// the persisted data or the caller's request
    pub fn is_backend(&self) -> bool {
        matches!(self, ExErrorKind::Io | ExErrorKind::Persistence)
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context for
/// debugging. Built with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for conversion and lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrataError {
    /// Requested id or field value is absent
    #[error("Not found: {entity_id}")]
    NotFound { entity_id: String },

    /// Persisted storage_type has no registered variant
    #[error("Unknown storage type: {storage_type}")]
    UnknownVariant { storage_type: String },

    /// Symbolic reference cannot be resolved to a registered function or type
    #[error("Unresolvable reference: {reference}")]
    Resolution { reference: String },

    /// Malformed timestamp, partial validity period or partial reference pair
    #[error("Malformed field '{field}': {reason}")]
    Format { field: String, reason: String },

    /// A symbol path was registered twice
    #[error("Symbol already registered: {reference}")]
    DuplicateSymbol { reference: String },

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StrataError {
    /// Shorthand for a format error on a named field
    pub fn format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StrataError::Format {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for StrataError {
    fn from(err: serde_json::Error) -> Self {
        StrataError::Serialization(err.to_string())
    }
}

impl From<StrataError> for ExError {
    fn from(err: StrataError) -> Self {
        match err {
            StrataError::NotFound { entity_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(entity_id)
                .with_message("Entity not found"),

            StrataError::UnknownVariant { storage_type } => {
                ExError::new(ExErrorKind::UnknownVariant)
                    .with_message(format!("Unknown storage type '{}'", storage_type))
            }

            StrataError::Resolution { reference } => ExError::new(ExErrorKind::Resolution)
                .with_message(format!("Cannot resolve reference '{}'", reference)),

            StrataError::Format { field, reason } => ExError::new(ExErrorKind::Format)
                .with_message(format!("Malformed field '{}': {}", field, reason)),

            StrataError::DuplicateSymbol { reference } => {
                ExError::new(ExErrorKind::DuplicateSymbol)
                    .with_message(format!("Symbol '{}' is already registered", reference))
            }

            StrataError::Serialization(msg) => {
                ExError::new(ExErrorKind::Serialization).with_message(msg)
            }
        }
    }
}
