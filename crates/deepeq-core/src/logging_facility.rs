//! Structured logging for deepeq
//!
//! The engine only emits `tracing` events; it never installs a subscriber.
//! A host picks an output profile once with [`init`], and tests install the
//! in-memory layer with [`init_test_capture`].
//!
//! Lifecycle events of a comparison go through the `log_op_*!` macros so that
//! every `start`, `end` and `end_error` record carries the same field keys:
//!
//! - `log_op_start!(op, ...)`
//! - `log_op_end!(op, duration_ms = ..., ...)`
//! - `log_op_error!(op, err, duration_ms = ..., ...)`
//!
//! ```rust
//! use deepeq_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
