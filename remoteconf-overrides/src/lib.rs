//! Override resolution engine
//!
//! A template says which fields exist and what their defaults are. An
//! override record says which fields differ for one identifier. This crate
//! keeps records sparse and resolves effective values:
//!
//! - [`write_cell`] validates first, then stores the value or removes the
//!   key when the value is empty or equals the default
//! - [`resolve`] merges defaults with one identifier's record
//! - [`copy_overrides`] snapshots a record into another environment
//!
//! [`EnvironmentOverrides`] applies these rules to an in-memory set of
//! records, and [`OverrideService`] applies them over an [`OverrideStore`].

pub mod copy;
pub mod environment;
pub mod error;
pub mod memory;
pub mod record;
pub mod resolve;
pub mod service;
pub mod store;
pub mod write;

pub use copy::copy_overrides;
pub use environment::EnvironmentOverrides;
pub use error::{OverridesError, Result};
pub use memory::MemoryOverrideStore;
pub use record::{OverrideKey, OverrideRecord, OverrideValues};
pub use resolve::{normalize_identifier, resolve, Resolution};
pub use service::OverrideService;
pub use store::OverrideStore;
pub use write::{clear_cell, write_cell, write_field, CellState};
