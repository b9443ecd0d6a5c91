//! Error severity classification
//!
//! Every RemoteConf error type implements [`Severity`] so callers can pick a
//! log level and decide whether a failure is something to show next to a
//! form field or something to page an operator about.

/// Severity levels for error classification
///
/// - **Warning**: The request was refused but nothing is wrong with the
///   system. A caller branch is expected (e.g. a copy target already exists).
/// - **Error**: The input was invalid. The operation did not happen and the
///   caller should surface a message to whoever supplied the input.
/// - **Critical**: A collaborator (such as the persistence layer) failed.
///
/// # Examples
///
/// ```rust
/// use remoteconf_common::ErrorSeverity;
///
/// let refused = ErrorSeverity::Warning;
/// let invalid = ErrorSeverity::Error;
/// assert_ne!(refused, invalid);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Operation refused, caller should branch
    Warning,

    /// Invalid input, operation did not happen
    Error,

    /// A collaborator failed
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Trait for error types that have severity levels
///
/// # Example
///
/// ```rust
/// use remoteconf_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum MyError {
///     StoreDown,
///     BadInput,
///     AlreadyThere,
/// }
///
/// impl Severity for MyError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             MyError::StoreDown => ErrorSeverity::Critical,
///             MyError::BadInput => ErrorSeverity::Error,
///             MyError::AlreadyThere => ErrorSeverity::Warning,
///         }
///     }
/// }
///
/// assert_eq!(MyError::BadInput.severity(), ErrorSeverity::Error);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;

    /// True when the failure came from outside the engine.
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Refused;

    impl Severity for Refused {
        fn severity(&self) -> ErrorSeverity {
            ErrorSeverity::Warning
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_is_critical_default() {
        assert!(!Refused.is_critical());
    }
}
