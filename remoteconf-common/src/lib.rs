//! # RemoteConf Common
//!
//! Shared building blocks for the RemoteConf crates:
//!
//! - [`error`] - Severity classification implemented by every crate's error type
//! - [`logging`] - Helpers for rendering structured values in log lines

pub mod error;
pub mod logging;

pub use error::{ErrorSeverity, Severity};
pub use logging::Pretty;
