//! Logging for every Folio crate
//!
//! [`init`] installs the subscriber for a [`Profile`] and is the only place
//! a subscriber is set up outside tests. Engine operations report their
//! lifecycle through [`log_op_start!`](crate::log_op_start),
//! [`log_op_end!`](crate::log_op_end) and
//! [`log_op_error!`](crate::log_op_error). Tests observe those events
//! through [`init_test_capture`].
//!
//! ```rust
//! use folio_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
