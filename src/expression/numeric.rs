//! Postfix evaluation over numbers and datasets.
//!
//! Every stack slot is a [`Value`]: either a scalar or a dataset. Binary
//! operators broadcast scalars across datasets; two datasets combine
//! element-wise and must have the same length.

use super::error::{ExpressionError, ExpressionResult};
use super::lexer::Lexeme;
use super::token::{Function, FunctionKernel, Operator, Token};
use crate::analysis::{fft, signals};
use crate::config::EngineConfig;
use crate::types::{Dataset2D, DatasetRegistry};

/// A value on the evaluation stack
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Series(Dataset2D),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "number",
            Value::Series(_) => "dataset",
        }
    }
}

/// Evaluates postfix lexemes against an optional dataset registry
pub struct NumericEvaluator<'a> {
    datasets: Option<&'a dyn DatasetRegistry>,
    x_axis_factor: f64,
    config: &'a EngineConfig,
}

impl<'a> NumericEvaluator<'a> {
    pub fn new(
        datasets: Option<&'a dyn DatasetRegistry>,
        x_axis_factor: f64,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            datasets,
            x_axis_factor,
            config,
        }
    }

    /// Evaluate a postfix queue to a single value
    pub fn evaluate(&self, postfix: &[Lexeme]) -> ExpressionResult<Value> {
        let mut stack: Vec<Value> = Vec::with_capacity(postfix.len());

        for lexeme in postfix {
            tracing::trace!("evaluate {} (stack depth {})", lexeme.token, stack.len());
            let value = match lexeme.token {
                Token::Number(v) => Value::Scalar(v),
                Token::Dataset(index) => Value::Series(self.dataset(index)?),
                Token::Variable => {
                    return Err(ExpressionError::TypeMismatch(format!(
                        "free variable at position {} is only valid when simplifying",
                        lexeme.position
                    )))
                }
                Token::Function(function) => {
                    let operand = pop(&mut stack)?;
                    self.apply_function(function, operand)?
                }
                Token::Negate => negate(pop(&mut stack)?),
                Token::Operator(op) => {
                    let right = pop(&mut stack)?;
                    let left = pop(&mut stack)?;
                    apply_operator(op, left, right)?
                }
                Token::OpenParen | Token::CloseParen => {
                    return Err(ExpressionError::Syntax(format!(
                        "stray parenthesis at position {}",
                        lexeme.position
                    )))
                }
            };
            stack.push(value);
        }

        if stack.len() != 1 {
            return Err(ExpressionError::Arity(stack.len()));
        }
        stack.pop().ok_or(ExpressionError::Arity(0))
    }

    /// Copy of dataset `index` with X scaled into display units
    fn dataset(&self, index: usize) -> ExpressionResult<Dataset2D> {
        let registry = self.datasets.ok_or_else(|| {
            ExpressionError::UnknownDataset(format!("s{} (no datasets are available)", index))
        })?;

        registry
            .get(index)
            .map(|set| set.scaled_x(self.x_axis_factor))
            .ok_or_else(|| {
                ExpressionError::UnknownDataset(format!(
                    "s{} (valid references are s1 to s{})",
                    index,
                    registry.count()
                ))
            })
    }

    fn apply_function(&self, function: Function, operand: Value) -> ExpressionResult<Value> {
        match (function.kernel(), operand) {
            (FunctionKernel::Elementwise(f), Value::Scalar(v)) => Ok(Value::Scalar(f(v))),
            (FunctionKernel::Elementwise(f), Value::Series(set)) => Ok(Value::Series(set.map_y(f))),
            (FunctionKernel::SeriesOnly, Value::Scalar(_)) => Err(ExpressionError::TypeMismatch(
                format!("function '{}' requires a dataset argument", function),
            )),
            (FunctionKernel::SeriesOnly, Value::Series(set)) => {
                self.apply_series_function(function, &set).map(Value::Series)
            }
        }
    }

    fn apply_series_function(&self, function: Function, set: &Dataset2D) -> ExpressionResult<Dataset2D> {
        match function {
            Function::Integral => Ok(signals::integral(set)),
            Function::Derivative => Ok(signals::derivative(set)),
            Function::Rms => Ok(signals::rms(set)),
            Function::Fft => fft::amplitude_spectrum(set, &self.config.fft_config()).ok_or_else(|| {
                ExpressionError::TypeMismatch(
                    "function 'fft' requires at least two points with increasing X values"
                        .to_string(),
                )
            }),
            other => Err(ExpressionError::TypeMismatch(format!(
                "function '{}' is not a dataset transform",
                other
            ))),
        }
    }
}

fn pop(stack: &mut Vec<Value>) -> ExpressionResult<Value> {
    stack.pop().ok_or(ExpressionError::Arity(0))
}

/// Negate a number, or the Y values of a dataset
fn negate(value: Value) -> Value {
    match value {
        Value::Scalar(v) => Value::Scalar(-v),
        Value::Series(mut set) => {
            set.y_mut().iter_mut().for_each(|v| *v = -*v);
            Value::Series(set)
        }
    }
}

/// Combine two operands, broadcasting scalars over datasets
pub fn apply_operator(op: Operator, left: Value, right: Value) -> ExpressionResult<Value> {
    tracing::trace!("{} {} {}", left.kind(), op.symbol(), right.kind());
    match (left, right) {
        (Value::Scalar(l), Value::Scalar(r)) => Ok(Value::Scalar(op.apply(l, r))),
        (Value::Series(l), Value::Scalar(r)) => Ok(Value::Series(l.map_y(|v| op.apply(v, r)))),
        (Value::Scalar(l), Value::Series(r)) => Ok(Value::Series(r.map_y(|v| op.apply(l, v)))),
        (Value::Series(l), Value::Series(r)) => l
            .zip_y(&r, |a, b| op.apply(a, b))
            .map(Value::Series)
            .ok_or(ExpressionError::LengthMismatch {
                left: l.len(),
                right: r.len(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parser::parse;
    use proptest::prelude::*;

    fn ramp(n: usize) -> Dataset2D {
        Dataset2D::from_points((0..n).map(|i| (i as f64, i as f64 * 2.0)))
    }

    fn eval(expression: &str, datasets: &Vec<Dataset2D>) -> ExpressionResult<Value> {
        let config = EngineConfig::default();
        let postfix = parse(expression, config.variable)?;
        NumericEvaluator::new(Some(datasets), 1.0, &config).evaluate(&postfix)
    }

    fn scalar(expression: &str) -> f64 {
        match eval(expression, &Vec::new()).unwrap() {
            Value::Scalar(v) => v,
            other => panic!("expected scalar, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_arithmetic() {
        assert_eq!(scalar("3+4"), 7.0);
        assert_eq!(scalar("2^10"), 1024.0);
        assert_eq!(scalar("((1+2)*3)"), 9.0);
        assert_eq!(scalar("10-4-3"), 3.0);
        assert_eq!(scalar("2^3^2"), 512.0);
        assert_eq!(scalar("-2^2"), 4.0);
        assert_eq!(scalar("7%4"), 3.0);
        assert_eq!(scalar("2(3+1)"), 8.0);
    }

    #[test]
    fn test_scalar_functions() {
        assert!(scalar("sin(0)").abs() < 1e-12);
        assert_eq!(scalar("abs(-5)"), 5.0);
        assert_eq!(scalar("sqrt(16)"), 4.0);
        assert!((scalar("ln(exp(2))") - 2.0).abs() < 1e-12);
        assert!((scalar("log10(1000)") - 3.0).abs() < 1e-12);
        assert_eq!(scalar("-abs(-3)"), -3.0);
    }

    #[test]
    fn test_series_broadcast() {
        let sets = vec![ramp(4)];
        let Value::Series(result) = eval("s1*3 + 1", &sets).unwrap() else {
            panic!("expected series");
        };
        assert_eq!(result.x(), sets[0].x());
        assert_eq!(result.y(), &[1.0, 7.0, 13.0, 19.0]);

        let Value::Series(result) = eval("10 - s1", &sets).unwrap() else {
            panic!("expected series");
        };
        assert_eq!(result.y(), &[10.0, 8.0, 6.0, 4.0]);
    }

    #[test]
    fn test_series_series() {
        let sets = vec![ramp(3), Dataset2D::from_points([(5.0, 1.0), (6.0, 1.0), (7.0, 1.0)])];
        let Value::Series(result) = eval("s1 + s2", &sets).unwrap() else {
            panic!("expected series");
        };
        assert_eq!(result.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(result.y(), &[1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let sets = vec![ramp(5), ramp(7)];
        assert_eq!(
            eval("s1*s2", &sets).unwrap_err(),
            ExpressionError::LengthMismatch { left: 5, right: 7 }
        );
    }

    #[test]
    fn test_negate_series_keeps_x() {
        let sets = vec![ramp(3)];
        let Value::Series(result) = eval("-s1", &sets).unwrap() else {
            panic!("expected series");
        };
        assert_eq!(result.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(result.y(), &[0.0, -2.0, -4.0]);
    }

    #[test]
    fn test_unknown_dataset() {
        let sets = vec![ramp(3)];
        let err = eval("s99", &sets).unwrap_err();
        assert!(matches!(err, ExpressionError::UnknownDataset(_)));
        assert!(err.to_string().contains("s99"));

        assert!(matches!(
            eval("s0 + 1", &sets),
            Err(ExpressionError::UnknownDataset(_))
        ));

        let config = EngineConfig::default();
        let postfix = parse("s1", 'x').unwrap();
        let err = NumericEvaluator::new(None, 1.0, &config)
            .evaluate(&postfix)
            .unwrap_err();
        assert!(matches!(err, ExpressionError::UnknownDataset(_)));
    }

    #[test]
    fn test_series_only_functions() {
        let sets = vec![ramp(3)];
        assert!(matches!(
            eval("int(4)", &sets),
            Err(ExpressionError::TypeMismatch(_))
        ));

        let Value::Series(result) = eval("diff(s1)", &sets).unwrap() else {
            panic!("expected series");
        };
        assert_eq!(result.y(), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_variable_rejected() {
        assert!(matches!(
            eval("x+1", &Vec::new()),
            Err(ExpressionError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_x_axis_factor_scales_dataset() {
        let sets = vec![ramp(3)];
        let config = EngineConfig::default();
        let postfix = parse("s1", 'x').unwrap();
        let Value::Series(result) = NumericEvaluator::new(Some(&sets), 0.5, &config)
            .evaluate(&postfix)
            .unwrap()
        else {
            panic!("expected series");
        };
        assert_eq!(result.x(), &[0.0, 0.5, 1.0]);
        assert_eq!(result.y(), sets[0].y());
    }

    #[test]
    fn test_malformed_postfix_is_arity_error() {
        let config = EngineConfig::default();
        let postfix = vec![
            Lexeme {
                token: Token::Number(1.0),
                position: 0,
            },
            Lexeme {
                token: Token::Number(2.0),
                position: 1,
            },
        ];
        assert_eq!(
            NumericEvaluator::new(None, 1.0, &config).evaluate(&postfix),
            Err(ExpressionError::Arity(2))
        );
    }

    proptest! {
        #[test]
        fn test_literal_binary_ops_match_direct_evaluation(
            a in -1000.0f64..1000.0,
            b in 0.5f64..1000.0,
            op in prop::sample::select(vec!['+', '-', '*', '/']),
        ) {
            let expression = format!("{}{}{}", a, op, b);
            let expected = Operator::from_char(op).unwrap().apply(a, b);
            prop_assert_eq!(scalar(&expression), expected);
        }

        #[test]
        fn test_series_times_scalar(
            ys in prop::collection::vec(-100.0f64..100.0, 1..40),
            k in -50.0f64..50.0,
        ) {
            let set = Dataset2D::from_points(ys.iter().enumerate().map(|(i, &y)| (i as f64, y)));
            let sets = vec![set.clone()];
            let Value::Series(result) = eval(&format!("s1*{}", k), &sets).unwrap() else {
                panic!("expected series");
            };
            prop_assert_eq!(result.x(), set.x());
            for (r, y) in result.y().iter().zip(set.y()) {
                prop_assert_eq!(*r, y * k);
            }
        }
    }
}
