//! Postfix evaluation over polynomial strings in one free variable.
//!
//! Stack slots hold either a number or a polynomial fragment such as
//! `3*x^2-1`. Operators that involve a polynomial rebuild the fragment from
//! its collected terms, so every string on the stack is already in
//! canonical form.
//!
//! # Supported combinations
//!
//! | Operator | Allowed operands (`P` polynomial, `k` number) |
//! |----------|-----------------------------------------------|
//! | `+ - *`  | `P⊕k`, `k⊕P`, `P⊕P` |
//! | `/`      | `P/k`, `k/P`, `P/P` when the divisor is a single term |
//! | `^`      | `P^k` with integer `k`; negative `k` only for a single term |
//! | `%`      | numbers only |

use super::error::{ExpressionError, ExpressionResult};
use super::lexer::Lexeme;
use super::polynomial::{
    break_apart_terms, collect_terms, find_powers_and_coefficients, format_coefficient,
    normalize, to_expression_string,
};
use super::token::{Function, FunctionKernel, Operator, Token};
use std::collections::BTreeMap;

/// Largest exponent a multi-term polynomial may be raised to
const MAX_EXPANDED_POWER: i32 = 256;

/// A value on the symbolic evaluation stack
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Number(f64),
    Polynomial(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Number,
    Polynomial,
}

impl Symbol {
    fn kind(&self) -> Kind {
        match self {
            Symbol::Number(_) => Kind::Number,
            Symbol::Polynomial(_) => Kind::Polynomial,
        }
    }
}

impl Kind {
    fn describe(self) -> &'static str {
        match self {
            Kind::Number => "number",
            Kind::Polynomial => "polynomial",
        }
    }
}

/// Operator and operand kinds that can be combined into a polynomial
const VALID_OPERATIONS: &[(Operator, Kind, Kind)] = &[
    (Operator::Add, Kind::Polynomial, Kind::Number),
    (Operator::Add, Kind::Number, Kind::Polynomial),
    (Operator::Add, Kind::Polynomial, Kind::Polynomial),
    (Operator::Subtract, Kind::Polynomial, Kind::Number),
    (Operator::Subtract, Kind::Number, Kind::Polynomial),
    (Operator::Subtract, Kind::Polynomial, Kind::Polynomial),
    (Operator::Multiply, Kind::Polynomial, Kind::Number),
    (Operator::Multiply, Kind::Number, Kind::Polynomial),
    (Operator::Multiply, Kind::Polynomial, Kind::Polynomial),
    (Operator::Divide, Kind::Polynomial, Kind::Number),
    (Operator::Divide, Kind::Number, Kind::Polynomial),
    (Operator::Divide, Kind::Polynomial, Kind::Polynomial),
    (Operator::Power, Kind::Polynomial, Kind::Number),
];

fn set_operator_valid(op: Operator, left: Kind, right: Kind) -> bool {
    VALID_OPERATIONS.contains(&(op, left, right))
}

type Terms = BTreeMap<i32, f64>;

/// Evaluates postfix lexemes to a simplified polynomial string
pub struct SymbolicEvaluator {
    variable: char,
    precision: usize,
}

impl SymbolicEvaluator {
    pub fn new(variable: char, precision: usize) -> Self {
        Self {
            variable,
            precision,
        }
    }

    /// Evaluate a postfix queue and normalize the result
    pub fn evaluate(&self, postfix: &[Lexeme]) -> ExpressionResult<String> {
        let mut stack: Vec<Symbol> = Vec::with_capacity(postfix.len());

        for lexeme in postfix {
            tracing::trace!("simplify {} (stack depth {})", lexeme.token, stack.len());
            let symbol = match lexeme.token {
                Token::Number(v) => Symbol::Number(v),
                Token::Variable => Symbol::Polynomial(self.variable.to_string()),
                Token::Dataset(index) => {
                    return Err(ExpressionError::SymbolicOperation(format!(
                        "dataset reference s{} cannot be simplified",
                        index
                    )))
                }
                Token::Function(function) => apply_function(function, pop(&mut stack)?)?,
                Token::Negate => match pop(&mut stack)? {
                    Symbol::Number(v) => Symbol::Number(-v),
                    poly => self.apply_operator(Operator::Multiply, Symbol::Number(-1.0), poly)?,
                },
                Token::Operator(op) => {
                    let right = pop(&mut stack)?;
                    let left = pop(&mut stack)?;
                    self.apply_operator(op, left, right)?
                }
                Token::OpenParen | Token::CloseParen => {
                    return Err(ExpressionError::Syntax(format!(
                        "stray parenthesis at position {}",
                        lexeme.position
                    )))
                }
            };
            stack.push(symbol);
        }

        if stack.len() != 1 {
            return Err(ExpressionError::Arity(stack.len()));
        }
        match stack.pop() {
            Some(Symbol::Number(v)) if !v.is_finite() => Err(ExpressionError::SymbolicOperation(
                format!("result {} is not finite", v),
            )),
            Some(Symbol::Number(v)) => Ok(format_coefficient(v, self.precision)),
            Some(Symbol::Polynomial(s)) => normalize(&s, self.variable, self.precision),
            None => Err(ExpressionError::Arity(0)),
        }
    }

    fn apply_operator(&self, op: Operator, left: Symbol, right: Symbol) -> ExpressionResult<Symbol> {
        let (left_kind, right_kind) = (left.kind(), right.kind());
        if let (Symbol::Number(l), Symbol::Number(r)) = (&left, &right) {
            return Ok(Symbol::Number(op.apply(*l, *r)));
        }
        let invalid = || {
            ExpressionError::SymbolicOperation(format!(
                "cannot apply '{}' to a {} and a {}",
                op.symbol(),
                left_kind.describe(),
                right_kind.describe()
            ))
        };
        if !set_operator_valid(op, left_kind, right_kind) {
            return Err(invalid());
        }

        let left = terms_of(&left)?;
        let result = match (op, &right) {
            (Operator::Add, _) => string_add(&left, &terms_of(&right)?)?,
            (Operator::Subtract, _) => string_subtract(&left, &terms_of(&right)?)?,
            (Operator::Multiply, _) => string_multiply(&left, &terms_of(&right)?)?,
            (Operator::Divide, _) => string_divide(&left, &terms_of(&right)?)?,
            (Operator::Power, Symbol::Number(exponent)) => string_power(&left, *exponent)?,
            _ => return Err(invalid()),
        };

        Ok(Symbol::Polynomial(to_expression_string(
            &result,
            self.variable,
            self.precision,
        )))
    }
}

fn pop(stack: &mut Vec<Symbol>) -> ExpressionResult<Symbol> {
    stack.pop().ok_or(ExpressionError::Arity(0))
}

fn apply_function(function: Function, operand: Symbol) -> ExpressionResult<Symbol> {
    match (function.kernel(), operand) {
        (FunctionKernel::Elementwise(f), Symbol::Number(v)) => Ok(Symbol::Number(f(v))),
        (FunctionKernel::SeriesOnly, Symbol::Number(_)) => Err(ExpressionError::TypeMismatch(
            format!("function '{}' requires a dataset argument", function),
        )),
        (_, Symbol::Polynomial(p)) => Err(ExpressionError::SymbolicOperation(format!(
            "function '{}' cannot be applied to the polynomial '{}'",
            function, p
        ))),
    }
}

fn terms_of(symbol: &Symbol) -> ExpressionResult<Terms> {
    match symbol {
        Symbol::Number(v) => collect_terms([(0, *v)]),
        Symbol::Polynomial(s) => collect_terms(find_powers_and_coefficients(&break_apart_terms(s))?),
    }
}

fn power_overflow(left: i32, right: i32) -> ExpressionError {
    ExpressionError::SymbolicOperation(format!(
        "power {} combined with {} is out of range",
        left, right
    ))
}

fn string_add(left: &Terms, right: &Terms) -> ExpressionResult<Terms> {
    collect_terms(left.iter().chain(right.iter()).map(|(&p, &c)| (p, c)))
}

fn string_subtract(left: &Terms, right: &Terms) -> ExpressionResult<Terms> {
    collect_terms(
        left.iter()
            .map(|(&p, &c)| (p, c))
            .chain(right.iter().map(|(&p, &c)| (p, -c))),
    )
}

fn string_multiply(left: &Terms, right: &Terms) -> ExpressionResult<Terms> {
    let mut products = Vec::with_capacity(left.len() * right.len());
    for (&p1, &c1) in left {
        for (&p2, &c2) in right {
            let power = p1.checked_add(p2).ok_or_else(|| power_overflow(p1, p2))?;
            products.push((power, c1 * c2));
        }
    }
    collect_terms(products)
}

fn string_divide(dividend: &Terms, divisor: &Terms) -> ExpressionResult<Terms> {
    let mut divisor_terms = divisor.iter();
    let (&power, &coefficient) = match (divisor_terms.next(), divisor_terms.next()) {
        (Some(term), None) => term,
        (None, _) => {
            return Err(ExpressionError::SymbolicOperation(
                "division by zero".to_string(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(ExpressionError::SymbolicOperation(
                "divisor must be a single term".to_string(),
            ))
        }
    };

    let mut quotients = Vec::with_capacity(dividend.len());
    for (&p, &c) in dividend {
        let p = p.checked_sub(power).ok_or_else(|| power_overflow(p, -power))?;
        quotients.push((p, c / coefficient));
    }
    collect_terms(quotients)
}

fn string_power(base: &Terms, exponent: f64) -> ExpressionResult<Terms> {
    if !exponent.is_finite() || exponent.fract() != 0.0 || exponent.abs() > i32::MAX as f64 {
        return Err(ExpressionError::SymbolicOperation(format!(
            "exponent {} is not an integer",
            exponent
        )));
    }
    let exponent = exponent as i32;

    if base.len() == 1 {
        let (&power, &coefficient) = base
            .iter()
            .next()
            .ok_or_else(|| ExpressionError::SymbolicOperation("empty base".to_string()))?;
        let power = power.checked_mul(exponent).ok_or_else(|| {
            ExpressionError::SymbolicOperation(format!("exponent {} is too large", exponent))
        })?;
        return collect_terms([(power, coefficient.powi(exponent))]);
    }

    if exponent < 0 {
        return Err(ExpressionError::SymbolicOperation(
            "only a single term can be raised to a negative power".to_string(),
        ));
    }
    if exponent > MAX_EXPANDED_POWER {
        return Err(ExpressionError::SymbolicOperation(format!(
            "exponent {} is too large to expand (limit {})",
            exponent, MAX_EXPANDED_POWER
        )));
    }

    let mut result = collect_terms([(0, 1.0)])?;
    for _ in 0..exponent {
        result = string_multiply(&result, base)?;
    }
    Ok(result)
}
