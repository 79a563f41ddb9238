//! Formula error types.

use std::fmt;
use thiserror::Error;

/// Reasons a formula string is rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("formula is empty")]
    Empty,

    #[error("unrecognised token '{0}'")]
    InvalidToken(String),

    #[error("numeric literal '{0}' is out of range")]
    NumberOutOfRange(String),

    #[error("formula cannot start with '{0}'")]
    InvalidStart(String),

    #[error("formula cannot end with '{0}'")]
    InvalidEnd(String),

    #[error("'{found}' cannot follow '{after}'")]
    UnexpectedToken { after: String, found: String },

    #[error("unbalanced parentheses")]
    UnbalancedParens,

    #[error("variable '{variable}' normalizes to '{normalized}', which is not a legal variable")]
    IllegalNormalization { variable: String, normalized: String },

    #[error("variable '{0}' was rejected by the validator")]
    RejectedVariable(String),
}

/// The outcome of a formula that could not be evaluated.
///
/// This is a value, not a failure of the engine: it is stored as the value of
/// the cell that owns the formula.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormulaError {
    reason: String,
}

impl FormulaError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#ERR: {}", self.reason)
    }
}

impl std::error::Error for FormulaError {}
