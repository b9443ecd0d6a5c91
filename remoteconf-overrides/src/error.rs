//! Error types for override resolution

use remoteconf_common::{ErrorSeverity, Severity};
use remoteconf_fields::{ConstraintError, TemplateType};
use thiserror::Error;

/// Result type for override operations
pub type Result<T> = std::result::Result<T, OverridesError>;

/// Errors that can occur when writing, resolving or copying overrides
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverridesError {
    /// The written value breaks the field's constraints. Nothing was changed.
    #[error("validation failed for field '{field}': {reason}")]
    ValidationFailed {
        field: String,
        #[source]
        reason: ConstraintError,
    },

    /// The template has no field with this key
    #[error("unknown field: {key}")]
    UnknownField { key: String },

    /// Copy refused: the target already has a record and overwrite was not requested
    #[error("{template_type} overrides for '{identifier}' already exist in environment '{environment_id}'")]
    TargetExists {
        identifier: String,
        template_type: TemplateType,
        environment_id: String,
    },

    /// No override record for this identifier
    #[error("identifier not found: {identifier}")]
    IdentifierNotFound { identifier: String },

    /// Identifiers must be non-empty
    #[error("identifier cannot be empty")]
    EmptyIdentifier,

    /// No template of this type in the environment
    #[error("no {template_type} template in environment '{environment_id}'")]
    TemplateNotFound {
        environment_id: String,
        template_type: TemplateType,
    },

    /// A template of one type was used against overrides of the other
    #[error("expected a {expected} template, got {found}")]
    TemplateTypeMismatch {
        expected: TemplateType,
        found: TemplateType,
    },

    /// The persistence collaborator failed
    #[error("override store error: {message}")]
    Store { message: String },
}

impl OverridesError {
    /// Wrap a constraint violation for `field`.
    pub fn validation_failed(field: impl Into<String>, reason: ConstraintError) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            reason,
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Discriminant name, matching the failure names callers branch on.
    pub fn kind(&self) -> &'static str {
        match self {
            OverridesError::ValidationFailed { .. } => "ValidationFailed",
            OverridesError::UnknownField { .. } => "UnknownField",
            OverridesError::TargetExists { .. } => "TargetExists",
            OverridesError::IdentifierNotFound { .. } => "IdentifierNotFound",
            OverridesError::EmptyIdentifier => "EmptyIdentifier",
            OverridesError::TemplateNotFound { .. } => "TemplateNotFound",
            OverridesError::TemplateTypeMismatch { .. } => "TemplateTypeMismatch",
            OverridesError::Store { .. } => "Store",
        }
    }

    /// The constraint violation behind a `ValidationFailed`.
    pub fn reason(&self) -> Option<&ConstraintError> {
        match self {
            OverridesError::ValidationFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl Severity for OverridesError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            OverridesError::TargetExists { .. } => ErrorSeverity::Warning,
            OverridesError::Store { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}
