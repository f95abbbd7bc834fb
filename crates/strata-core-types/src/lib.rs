//! Core types shared across Strata facilities
//!
//! This crate provides the canonical field keys and event names used by
//! both the error facility and the structured logging facility, so that
//! store, converter and tests agree on one vocabulary.

pub mod schema;
