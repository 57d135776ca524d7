//! Validation error types
//!
//! A failed rule is not an error: it lands in the report. Errors are the
//! outcomes that make a report meaningless:
//! - Configuration errors (non-retryable): the schema is wrong
//! - Record errors (non-retryable): a value does not have its declared kind
//! - Provider errors (retryable): a collaborator could not answer

use thiserror::Error;

use crate::providers::ProviderError;
use crate::rules::RuleKind;
use crate::schema::ValueKind;

/// Result type for validation calls
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Error families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Programmer or schema error
    Configuration,
    /// Record does not match the schema's value kinds
    Record,
    /// Collaborator unavailable
    Provider,
}

/// Errors that abort a validation call
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A rule argument does not parse as its rule requires
    #[error("field '{field}': invalid argument '{argument}' for rule '{rule}': {reason}")]
    InvalidArgument {
        field: String,
        rule: RuleKind,
        argument: String,
        reason: String,
    },

    /// A rule met a value kind it has no semantics for
    #[error("field '{field}': rule '{rule}' cannot apply to a {kind} value")]
    IncompatibleKind {
        field: String,
        rule: RuleKind,
        kind: ValueKind,
    },

    /// A field holds a value of another type than declared
    #[error("field '{field}': expected {expected} value, found {found}")]
    TypeMismatch {
        field: String,
        expected: ValueKind,
        found: &'static str,
    },

    /// A provider failed to answer
    #[error("field '{field}': rule '{rule}': {source}")]
    ProviderUnavailable {
        field: String,
        rule: RuleKind,
        #[source]
        source: ProviderError,
    },
}

impl ValidationError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidArgument { .. } => "FG_INVALID_ARGUMENT",
            ValidationError::IncompatibleKind { .. } => "FG_INCOMPATIBLE_KIND",
            ValidationError::TypeMismatch { .. } => "FG_TYPE_MISMATCH",
            ValidationError::ProviderUnavailable { .. } => "FG_PROVIDER_UNAVAILABLE",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::ProviderUnavailable { .. } => ErrorKind::Provider,
            ValidationError::TypeMismatch { .. } => ErrorKind::Record,
            _ => ErrorKind::Configuration,
        }
    }

    /// Only provider failures are worth retrying
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Provider
    }

    /// Field the error was raised on
    pub fn field(&self) -> &str {
        match self {
            ValidationError::InvalidArgument { field, .. }
            | ValidationError::IncompatibleKind { field, .. }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::ProviderUnavailable { field, .. } => field,
        }
    }
}
