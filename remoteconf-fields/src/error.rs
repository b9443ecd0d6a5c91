//! Error types for the field schema model

use std::path::PathBuf;

use remoteconf_common::{ErrorSeverity, Severity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// A single constraint violation.
///
/// Returned by every validator in this crate. Serializes with a `kind`
/// discriminant so callers can render a per-field message without parsing
/// the display string.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum ConstraintError {
    /// Key is empty or not an identifier
    #[error("invalid field key '{key}': must start with a letter and contain only letters, digits and underscores")]
    InvalidKey { key: String },

    /// Key already used by another field in the template
    #[error("duplicate field key: {key}")]
    DuplicateKey { key: String },

    #[error("minimum length cannot be negative (got {min_length})")]
    NegativeMinLength { min_length: i64 },

    #[error("maximum length must be greater than zero (got {max_length})")]
    NonPositiveMaxLength { max_length: i64 },

    /// Lower bound above upper bound, for both string lengths and number ranges
    #[error("minimum {min} exceeds maximum {max}")]
    MinExceedsMax { min: f64, max: f64 },

    #[error("value is {length} characters, minimum is {min_length}")]
    DefaultTooShort { length: usize, min_length: i64 },

    #[error("value is {length} characters, maximum is {max_length}")]
    DefaultTooLong { length: usize, max_length: i64 },

    #[error("increment must be greater than zero (got {increment})")]
    NonPositiveIncrement { increment: f64 },

    #[error("value {value} is outside {min}..={max}")]
    DefaultOutOfRange { value: f64, min: f64, max: f64 },

    /// Value not reachable from the minimum in whole increments
    #[error("value {value} is not a multiple of {increment} from {min}")]
    IncrementMisaligned { value: f64, min: f64, increment: f64 },

    #[error("enum fields need at least one option")]
    EmptyOptions,

    #[error("enum option {index} is blank")]
    BlankOption { index: usize },

    /// Option repeated; `index` is the position of the repeat
    #[error("enum option '{value}' is repeated at position {index}")]
    DuplicateOption { value: String, index: usize },

    /// Enum value (or default) not among the declared options
    #[error("'{value}' is not one of the allowed options")]
    NotAnOption { value: String },

    /// Numeric input that does not parse to a finite number
    #[error("'{input}' is not a number")]
    NotANumber { input: String },

    /// Raw value of a JSON type the field cannot accept
    #[error("expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },
}

impl ConstraintError {
    /// The `kind` discriminant as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ConstraintError::InvalidKey { .. } => "InvalidKey",
            ConstraintError::DuplicateKey { .. } => "DuplicateKey",
            ConstraintError::NegativeMinLength { .. } => "NegativeMinLength",
            ConstraintError::NonPositiveMaxLength { .. } => "NonPositiveMaxLength",
            ConstraintError::MinExceedsMax { .. } => "MinExceedsMax",
            ConstraintError::DefaultTooShort { .. } => "DefaultTooShort",
            ConstraintError::DefaultTooLong { .. } => "DefaultTooLong",
            ConstraintError::NonPositiveIncrement { .. } => "NonPositiveIncrement",
            ConstraintError::DefaultOutOfRange { .. } => "DefaultOutOfRange",
            ConstraintError::IncrementMisaligned { .. } => "IncrementMisaligned",
            ConstraintError::EmptyOptions => "EmptyOptions",
            ConstraintError::BlankOption { .. } => "BlankOption",
            ConstraintError::DuplicateOption { .. } => "DuplicateOption",
            ConstraintError::NotAnOption { .. } => "NotAnOption",
            ConstraintError::NotANumber { .. } => "NotANumber",
            ConstraintError::TypeMismatch { .. } => "TypeMismatch",
        }
    }

    pub(crate) fn type_mismatch(expected: &str, found: &serde_json::Value) -> Self {
        let found = match found {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

impl Severity for ConstraintError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

/// Errors that can occur in field schema operations
#[derive(Debug, Error)]
pub enum FieldsError {
    /// A field definition violates its constraints
    #[error("invalid field '{key}': {source}")]
    InvalidField {
        key: String,
        #[source]
        source: ConstraintError,
    },

    /// Field not found by key
    #[error("field not found: {key}")]
    FieldNotFound { key: String },

    /// Field defaults file does not exist
    #[error("field defaults file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Field defaults file extension is not toml, yaml, yml or json
    #[error("unsupported field defaults format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// The field defaults catalog could not be loaded
    #[error("failed to load field defaults: {0}")]
    Config(#[from] Box<figment::Error>),

    /// The field defaults catalog loaded but is not usable
    #[error("invalid field defaults for {section}: {source}")]
    InvalidDefaults {
        section: &'static str,
        #[source]
        source: ConstraintError,
    },
}

impl From<figment::Error> for FieldsError {
    fn from(error: figment::Error) -> Self {
        FieldsError::Config(Box::new(error))
    }
}

impl FieldsError {
    /// Attach a field key to a constraint violation.
    pub fn invalid_field(key: impl Into<String>, source: ConstraintError) -> Self {
        Self::InvalidField {
            key: key.into(),
            source,
        }
    }

    /// The underlying constraint violation, if this error carries one.
    pub fn constraint(&self) -> Option<&ConstraintError> {
        match self {
            FieldsError::InvalidField { source, .. } => Some(source),
            FieldsError::InvalidDefaults { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Severity for FieldsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FieldsError::InvalidField { .. } => ErrorSeverity::Error,
            FieldsError::FieldNotFound { .. } => ErrorSeverity::Error,
            FieldsError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            FieldsError::UnsupportedFormat { .. } => ErrorSeverity::Critical,
            FieldsError::Config(_) => ErrorSeverity::Critical,
            FieldsError::InvalidDefaults { .. } => ErrorSeverity::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = FieldsError::FieldNotFound {
            key: "api_url".into(),
        };
        assert_eq!(err.to_string(), "field not found: api_url");
    }

    #[test]
    fn test_invalid_field_carries_key_and_reason() {
        let err = FieldsError::invalid_field("max_items", ConstraintError::NonPositiveIncrement {
            increment: 0.0,
        });
        assert!(err.to_string().contains("max_items"));
        assert!(err.to_string().contains("increment"));
        assert_eq!(err.constraint().map(|c| c.kind()), Some("NonPositiveIncrement"));
    }

    #[test]
    fn test_constraint_error_serializes_kind() {
        let err = ConstraintError::DefaultTooLong {
            length: 21,
            max_length: 20,
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], json!("DefaultTooLong"));
        assert_eq!(value["maxLength"], json!(20));
        assert_eq!(err.kind(), "DefaultTooLong");
    }

    #[test]
    fn test_unit_variant_serializes_kind() {
        let value = serde_json::to_value(ConstraintError::EmptyOptions).unwrap();
        assert_eq!(value, json!({"kind": "EmptyOptions"}));
    }

    #[test]
    fn test_type_mismatch_names_json_type() {
        let err = ConstraintError::type_mismatch("boolean", &json!([1, 2]));
        assert_eq!(
            err,
            ConstraintError::TypeMismatch {
                expected: "boolean".into(),
                found: "array".into()
            }
        );
    }

    #[test]
    fn test_severity() {
        assert_eq!(ConstraintError::EmptyOptions.severity(), ErrorSeverity::Error);
        let err = FieldsError::InvalidDefaults {
            section: "number",
            source: ConstraintError::EmptyOptions,
        };
        assert!(err.is_critical());
    }
}
