//! Strata Core - data node entities, reference registry and conversion
//!
//! This crate provides the backend-independent half of the persistence
//! layer:
//! - `DataNode` entities with a closed set of storage-type variants
//! - The flat `DataNodeModel` record every backend stores
//! - A registry mapping symbolic paths to functions and types
//! - The versioned converter between entities and models, with
//!   deprecation diagnostics for legacy records
//! - The error and logging facilities shared with `strata-store`

pub mod converter;
pub mod diagnostics;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod registry;

pub use strata_core_types as core_types;

// Re-export commonly used types
pub use converter::{Converter, DataNodeConverter, MigrationHook, NoopMigrationHook};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use errors::{ExError, ExErrorKind, Result, StrataError};
pub use model::{DataNode, DataNodeKind, DataNodeModel, Scope, StorageType};
pub use registry::{FunctionHandle, Registry, Symbol, SymbolPath, TypeHandle};
