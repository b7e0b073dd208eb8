//! Error handling for the DataPlot-RS crate
//!
//! This module defines the crate-level error type and a Result alias. The
//! expression engine has its own error type in [`crate::expression::ExpressionError`]
//! which converts into [`DataPlotError`].

use crate::expression::ExpressionError;
use thiserror::Error;

/// Main error type for DataPlot-RS operations
#[derive(Error, Debug)]
pub enum DataPlotError {
    /// Errors raised while solving a math-channel expression
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// Errors related to dataset construction
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DataPlotError>,
    },
}

impl DataPlotError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DataPlotError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for DataPlotError {
    fn from(err: serde_json::Error) -> Self {
        DataPlotError::Serialization(err.to_string())
    }
}

/// Result type alias for DataPlot-RS operations
pub type Result<T> = std::result::Result<T, DataPlotError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<DataPlotError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
