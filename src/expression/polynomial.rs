//! Polynomial term handling for symbolic simplification.
//!
//! A polynomial string is a sum of terms `c*x^p` in a single free variable.
//! These helpers split such a string into terms, recover each term's
//! `(power, coefficient)` pair, and re-serialize collected terms in
//! descending power order.

use super::error::{ExpressionError, ExpressionResult};
use std::collections::BTreeMap;
use std::fmt::Write;

/// A summed coefficient at or below this fraction of the largest coefficient
/// added into the same power is treated as cancelled
const NEGLIGIBLE_RATIO: f64 = 1e-12;

/// Split an expression into additive terms, keeping each term's sign
///
/// Splits on `+`/`-` outside parentheses, except where the sign belongs to
/// an exponent (`x^-1`), a factor (`2*-x`) or a number in scientific
/// notation (`1e-5`).
pub fn break_apart_terms(s: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut depth: usize = 0;
    let mut previous: Option<char> = None;
    let mut before_previous: Option<char> = None;

    for c in s.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }

        let splits = matches!(c, '+' | '-')
            && depth == 0
            && previous.is_some_and(|p| !matches!(p, '^' | '*' | '/' | '(' | '+' | '-'))
            && !is_exponent_marker(previous, before_previous);

        if splits {
            if !current.is_empty() {
                terms.push(std::mem::take(&mut current));
            }
            if c == '-' {
                current.push('-');
            }
        } else {
            current.push(c);
        }

        before_previous = previous;
        previous = Some(c);
    }

    if !current.is_empty() {
        terms.push(current);
    }
    terms
}

fn is_exponent_marker(previous: Option<char>, before_previous: Option<char>) -> bool {
    matches!(previous, Some('e' | 'E'))
        && before_previous.is_some_and(|c| c.is_ascii_digit() || c == '.')
}

/// Extract `(power, coefficient)` for every term
pub fn find_powers_and_coefficients<S: AsRef<str>>(terms: &[S]) -> ExpressionResult<Vec<(i32, f64)>> {
    terms.iter().map(|t| parse_term(t.as_ref())).collect()
}

/// Parse one term such as `-3*x^2`, `x`, `2.5` or `4*s^-1`
fn parse_term(term: &str) -> ExpressionResult<(i32, f64)> {
    let malformed = || ExpressionError::SymbolicOperation(format!("cannot interpret term '{}'", term));

    let mut rest = term.trim();
    let mut coefficient = 1.0;
    while let Some(stripped) = rest.strip_prefix(['+', '-']) {
        if rest.starts_with('-') {
            coefficient = -coefficient;
        }
        rest = stripped;
    }
    if rest.is_empty() {
        return Err(malformed());
    }

    let mut power: i32 = 0;
    for factor in rest.split('*') {
        if let Ok(value) = factor.parse::<f64>() {
            coefficient *= value;
            continue;
        }

        let (numeric, symbolic) = split_factor(factor).ok_or_else(malformed)?;
        if !numeric.is_empty() {
            coefficient *= numeric.parse::<f64>().map_err(|_| malformed())?;
        }
        power = term_power(symbolic)
            .and_then(|p| power.checked_add(p))
            .ok_or_else(malformed)?;
    }

    Ok((power, coefficient))
}

/// Split `2x^3` into (`2`, `x^3`) at the first letter
fn split_factor(factor: &str) -> Option<(&str, &str)> {
    let start = factor.find(|c: char| c.is_alphabetic())?;
    Some(factor.split_at(start))
}

/// Power of a variable factor: `x` is 1, `x^n` is n
fn term_power(symbolic: &str) -> Option<i32> {
    let mut chars = symbolic.chars();
    chars.next().filter(|c| c.is_alphabetic())?;
    let rest = chars.as_str();
    if rest.is_empty() {
        return Some(1);
    }
    rest.strip_prefix('^')?.parse::<i32>().ok()
}

/// Sum coefficients by power, dropping the ones that cancel
///
/// A power cancels when its sum is zero or negligible next to the largest
/// coefficient that contributed to that same power. Non-finite coefficients
/// are an error.
pub fn collect_terms(
    terms: impl IntoIterator<Item = (i32, f64)>,
) -> ExpressionResult<BTreeMap<i32, f64>> {
    let mut sums: BTreeMap<i32, (f64, f64)> = BTreeMap::new();
    for (power, coefficient) in terms {
        if !coefficient.is_finite() {
            return Err(ExpressionError::SymbolicOperation(format!(
                "coefficient of {} for power {} is not finite",
                coefficient, power
            )));
        }
        let (sum, scale) = sums.entry(power).or_insert((0.0, 0.0));
        *sum += coefficient;
        *scale = scale.max(coefficient.abs());
    }

    let mut collected = BTreeMap::new();
    for (power, (sum, scale)) in sums {
        if !sum.is_finite() {
            return Err(ExpressionError::SymbolicOperation(format!(
                "coefficient for power {} overflowed",
                power
            )));
        }
        if sum != 0.0 && sum.abs() > scale * NEGLIGIBLE_RATIO {
            collected.insert(power, sum);
        }
    }
    Ok(collected)
}

/// Round to `precision` significant digits and print in plain decimal
pub fn format_coefficient(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = precision.clamp(1, 17) as i32;
    let magnitude = value.abs().log10().floor() as i32;
    let shift = digits - 1 - magnitude;
    let rounded = if shift >= 0 {
        let scale = 10f64.powi(shift);
        if scale.is_finite() {
            (value * scale).round() / scale
        } else {
            value
        }
    } else {
        let scale = 10f64.powi(-shift);
        (value / scale).round() * scale
    };
    rounded.to_string()
}

/// Append one `coefficient*variable^power` term to `expression`
///
/// Zero coefficients are skipped; unit coefficients and powers 0 and 1 are
/// abbreviated, except a leading `-1` on a raised variable, which is written
/// `-1*x^p` so the output parses back to the same polynomial.
pub fn add_to_expression_string(
    expression: &mut String,
    coefficient: f64,
    power: i32,
    variable: char,
    precision: usize,
) {
    let magnitude = format_coefficient(coefficient.abs(), precision);
    if magnitude == "0" {
        return;
    }

    let leading = expression.is_empty();
    if coefficient < 0.0 {
        expression.push('-');
    } else if !leading {
        expression.push('+');
    }

    if power == 0 {
        expression.push_str(&magnitude);
        return;
    }

    // A leading `-x^p` would re-parse as `(-x)^p`
    let keep_unit = leading && coefficient < 0.0 && power != 1;
    if magnitude != "1" || keep_unit {
        expression.push_str(&magnitude);
        expression.push('*');
    }
    expression.push(variable);
    if power != 1 {
        let _ = write!(expression, "^{}", power);
    }
}

/// Serialize terms in descending power order; an empty polynomial is `0`
pub fn to_expression_string(
    terms: &BTreeMap<i32, f64>,
    variable: char,
    precision: usize,
) -> String {
    let mut expression = String::new();
    for (&power, &coefficient) in terms.iter().rev() {
        add_to_expression_string(&mut expression, coefficient, power, variable, precision);
    }
    if expression.is_empty() {
        expression.push('0');
    }
    expression
}

/// Collect like terms of a polynomial string and re-serialize it
pub fn normalize(expression: &str, variable: char, precision: usize) -> ExpressionResult<String> {
    let terms = find_powers_and_coefficients(&break_apart_terms(expression))?;
    Ok(to_expression_string(&collect_terms(terms)?, variable, precision))
}
