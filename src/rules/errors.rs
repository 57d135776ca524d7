//! Grammar error types
//!
//! Every grammar error is a configuration error: the annotation itself is
//! wrong, not the record being validated.

use thiserror::Error;

/// Result type for grammar operations
pub type RuleResult<T> = Result<T, RuleError>;

/// Errors raised while parsing a rule annotation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Rule name outside the recognized set
    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    /// Empty segment between commas (e.g. `required,,email`)
    #[error("empty rule at position {0}")]
    EmptyRule(usize),

    /// Rule requires an argument (`min`, `max`, `req_domain`)
    #[error("rule '{0}' requires an argument ('{0}=<value>')")]
    MissingArgument(&'static str),

    /// Rule takes no argument but one was given
    #[error("rule '{rule}' takes no argument, got '{argument}'")]
    UnexpectedArgument {
        rule: &'static str,
        argument: String,
    },
}

impl RuleError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            RuleError::UnknownRule(_) => "FG_UNKNOWN_RULE",
            RuleError::EmptyRule(_) => "FG_EMPTY_RULE",
            RuleError::MissingArgument(_) => "FG_MISSING_ARGUMENT",
            RuleError::UnexpectedArgument { .. } => "FG_UNEXPECTED_ARGUMENT",
        }
    }
}
