//! Schema error types
//!
//! All schema errors are configuration errors, raised while a schema is
//! built or loaded and never while a record is validated.

use thiserror::Error;

use crate::rules::{RuleError, RuleKind};

use super::types::ValueKind;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while building or loading a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The field's annotation does not parse
    #[error("field '{field}': {source}")]
    Rule {
        field: String,
        #[source]
        source: RuleError,
    },

    /// The rule cannot apply to the field's value kind
    #[error("field '{field}': rule '{rule}' cannot apply to a {kind} field")]
    IncompatibleKind {
        field: String,
        rule: RuleKind,
        kind: ValueKind,
    },

    /// Two fields share a name
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    /// Schema file could not be read or decoded
    #[error("malformed schema file '{path}': {reason}")]
    Malformed { path: String, reason: String },
}

impl SchemaError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Rule { source, .. } => source.code(),
            SchemaError::IncompatibleKind { .. } => "FG_INCOMPATIBLE_KIND",
            SchemaError::DuplicateField(_) => "FG_DUPLICATE_FIELD",
            SchemaError::Malformed { .. } => "FG_MALFORMED_SCHEMA",
        }
    }

    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
