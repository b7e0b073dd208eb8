//! Expression-engine error types.

use thiserror::Error;

/// Errors that can occur while parsing or evaluating an expression.
///
/// The `Display` text is meant to be shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Unrecognized input '{fragment}' at position {position}")]
    Lex { fragment: String, position: usize },

    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Dataset length mismatch: {left} points vs {right} points")]
    LengthMismatch { left: usize, right: usize },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Invalid symbolic operation: {0}")]
    SymbolicOperation(String),

    #[error("Internal evaluation error: {0} values left on the stack (expected 1)")]
    Arity(usize),
}

pub type ExpressionResult<T> = std::result::Result<T, ExpressionError>;
