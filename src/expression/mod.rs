//! Math-channel expression engine
//!
//! Turns user-typed infix expressions into either a new dataset or a
//! simplified polynomial string.
//!
//! # Pipeline
//!
//! 1. [`lexer`] classifies the input into [`Token`]s
//! 2. [`parser`] reorders them into postfix with a shunting yard, inserting
//!    implicit multiplication between adjacent operands
//! 3. [`numeric`] evaluates the postfix queue over scalars and datasets, or
//!    [`symbolic`] evaluates it over polynomial strings
//! 4. [`polynomial`] collects like terms of the symbolic result
//!
//! # Main Types
//!
//! - [`ExpressionTree`] - Entry point; borrows a dataset registry
//! - [`ExpressionError`] - Everything that can go wrong, with user-facing messages
//!
//! # Example
//!
//! ```
//! use dataplot_rs::expression::ExpressionTree;
//! use dataplot_rs::types::Dataset2D;
//!
//! let sets = vec![Dataset2D::from_points([(0.0, 1.0), (1.0, 2.0)])];
//! let tree = ExpressionTree::with_datasets(&sets);
//!
//! let doubled = tree.solve("2s1", 1.0).unwrap();
//! assert_eq!(doubled.y(), &[2.0, 4.0]);
//!
//! assert_eq!(tree.solve_symbolic("(x+1)^2").unwrap(), "x^2+2*x+1");
//! ```

pub mod error;
pub mod lexer;
pub mod numeric;
pub mod parser;
pub mod polynomial;
pub mod symbolic;
pub mod token;

pub use error::{ExpressionError, ExpressionResult};
pub use numeric::Value;
pub use polynomial::{break_apart_terms, find_powers_and_coefficients};
pub use token::{Function, Operator, Token};

use crate::config::{EngineConfig, ScalarResultPolicy};
use crate::types::{Dataset2D, DatasetRegistry};
use numeric::NumericEvaluator;
use symbolic::SymbolicEvaluator;

/// Parses and evaluates expressions against an optional dataset registry
///
/// Holds no state between solves besides the borrowed registry and the
/// engine settings.
pub struct ExpressionTree<'a> {
    datasets: Option<&'a dyn DatasetRegistry>,
    config: EngineConfig,
}

impl<'a> ExpressionTree<'a> {
    /// Create an engine; without a registry every dataset reference fails
    pub fn new(datasets: Option<&'a dyn DatasetRegistry>) -> Self {
        Self {
            datasets,
            config: EngineConfig::default(),
        }
    }

    /// Create an engine that resolves `sN` through `datasets`
    pub fn with_datasets(datasets: &'a dyn DatasetRegistry) -> Self {
        Self::new(Some(datasets))
    }

    /// Replace the engine settings
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate `expression` numerically
    ///
    /// Dataset X values are multiplied by `x_axis_factor` as they are read.
    /// A scalar result is handled according to
    /// [`EngineConfig::scalar_result`].
    pub fn solve(&self, expression: &str, x_axis_factor: f64) -> ExpressionResult<Dataset2D> {
        let postfix = parser::parse(expression, self.config.variable)?;
        tracing::debug!(
            "Solving '{}' ({} postfix tokens, x factor {})",
            expression,
            postfix.len(),
            x_axis_factor
        );

        let evaluator = NumericEvaluator::new(self.datasets, x_axis_factor, &self.config);
        match evaluator.evaluate(&postfix)? {
            Value::Series(result) => {
                tracing::debug!("'{}' produced {} points", expression, result.len());
                Ok(result)
            }
            Value::Scalar(value) => self.scalar_result(expression, value, x_axis_factor),
        }
    }

    /// Simplify `expression` to a polynomial in the configured variable
    pub fn solve_symbolic(&self, expression: &str) -> ExpressionResult<String> {
        let postfix = parser::parse(expression, self.config.variable)?;
        tracing::debug!(
            "Simplifying '{}' in {} ({} postfix tokens)",
            expression,
            self.config.variable,
            postfix.len()
        );

        let simplified = SymbolicEvaluator::new(self.config.variable, self.config.precision)
            .evaluate(&postfix)?;
        tracing::debug!("'{}' simplified to '{}'", expression, simplified);
        Ok(simplified)
    }

    fn scalar_result(
        &self,
        expression: &str,
        value: f64,
        x_axis_factor: f64,
    ) -> ExpressionResult<Dataset2D> {
        if self.config.scalar_result == ScalarResultPolicy::Reject {
            return Err(ExpressionError::TypeMismatch(format!(
                "'{}' evaluates to the number {}, not a dataset",
                expression, value
            )));
        }

        let template = self
            .datasets
            .and_then(|registry| registry.get(1))
            .map(|set| set.scaled_x(x_axis_factor));
        let result = match template {
            Some(set) => Dataset2D::constant(set.x(), value),
            None => Dataset2D::from_points([(0.0, value)]),
        };
        tracing::debug!(
            "'{}' is the scalar {}, broadcast over {} points",
            expression,
            value,
            result.len()
        );
        Ok(result)
    }
}
