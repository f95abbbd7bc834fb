//! Structured logging for Strata
//!
//! One initialization point (`init`), the operation-boundary macros
//! (`log_op_start!`, `log_op_end!`, `log_op_error!`), `log_deprecation!`
//! for legacy data read during conversion, and an in-memory capture layer
//! for tests.
//!
//! ```rust
//! use strata_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

use std::time::Instant;

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};

/// Milliseconds elapsed since `since`, saturating at `u64::MAX`
pub fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}
