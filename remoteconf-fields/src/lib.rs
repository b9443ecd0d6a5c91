//! Template field schema model
//!
//! `remoteconf-fields` defines the four field kinds a configuration template
//! can hold (String, Number, Boolean, Enum), validates their constraints, and
//! coerces and validates candidate values. It knows nothing about overrides
//! or identifiers; `remoteconf-overrides` builds on it.
//!
//! # Architecture
//!
//! - **Pure**: every function is a computation over its arguments, no I/O
//!   except loading the [`FieldDefaults`] catalog
//! - **Sum-typed fields**: each [`FieldKind`] variant carries only its own constraints
//! - **Explicit catalog**: new fields are seeded from a [`FieldDefaults`]
//!   value passed to [`TemplateBuilder`], never from shared state

pub mod builder;
pub mod defaults;
pub mod error;
pub mod format;
pub mod types;
pub mod validation;
pub mod value;

pub use builder::TemplateBuilder;
pub use defaults::{BooleanDefaults, FieldDefaults, NumberDefaults, StringDefaults};
pub use error::{ConstraintError, FieldsError, Result};
pub use format::format_constraints;
pub use types::{
    BooleanField, EnumField, FieldKind, NumberField, StringField, Template, TemplateField,
    TemplateType,
};
pub use validation::{
    is_increment_aligned, validate_enum_default, validate_enum_options, validate_field,
    validate_key, validate_kind, validate_number_constraints, validate_string_constraints,
};
pub use value::{
    coerce_value, get_default_value, is_default_value, is_empty_value, prepare_value,
    validate_value, values_equal,
};
