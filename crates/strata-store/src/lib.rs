//! Strata Store - repository and physical backends for data nodes
//!
//! Provides:
//! - The backend contract with filesystem (JSON documents) and SQLite
//!   implementations
//! - Embedded SQL migrations with checksums
//! - The backend-agnostic `Repository` (save, load, filter, search,
//!   delete, export)
//! - TOML-driven backend selection

pub mod atomic;
pub mod backend;
pub mod config;
pub mod db;
pub mod errors;
pub mod filter;
pub mod migrations;
pub mod model;
pub mod repository;

// Re-export key types
pub use backend::{Backend, FsBackend, SqlRecord, SqliteBackend};
pub use config::{BackendKind, StoreConfig};
pub use errors::Result;
pub use filter::Filter;
pub use model::StoredModel;
pub use repository::{Repository, DEFAULT_DIAGNOSTICS_LIMIT};
