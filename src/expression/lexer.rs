//! Tokenizer for math-channel expressions.
//!
//! Each `next_is_*` predicate inspects the unconsumed remainder of the input
//! and reports how many bytes the next token would occupy. Whether the
//! previous token was an operator decides if a leading `+`/`-` is a numeric
//! sign, a unary operator, or a binary operator.

use super::error::{ExpressionError, ExpressionResult};
use super::token::{Function, Operator, Token};

/// A token along with the byte offset where it starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub position: usize,
}

/// Length of the numeric literal at the start of `s`, if there is one
///
/// A sign is only part of the number when the previous token was an
/// operator (or this is the start of the expression).
pub fn next_is_number(s: &str, last_was_operator: bool) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;

    if last_was_operator && matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }

    let mantissa_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - mantissa_start;

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let fraction_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        digits += i - fraction_start;
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when digits follow, so `2exp(1)` stays `2 * exp(1)`
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        if bytes.get(j).is_some_and(u8::is_ascii_digit) {
            while bytes.get(j).is_some_and(u8::is_ascii_digit) {
                j += 1;
            }
            i = j;
        }
    }

    Some(i)
}

/// Dataset reference `s<digits>` at the start of `s`: (length, digits)
pub fn next_is_dataset(s: &str) -> Option<(usize, &str)> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b's') || !bytes.get(1).is_some_and(u8::is_ascii_digit) {
        return None;
    }

    let end = 1 + bytes[1..].iter().take_while(|b| b.is_ascii_digit()).count();
    Some((end, &s[1..end]))
}

/// Function name at the start of `s` that is followed by `(`
pub fn next_is_function(s: &str) -> Option<(Function, usize)> {
    let (function, len) = Function::longest_prefix(s)?;
    s[len..]
        .trim_start()
        .starts_with('(')
        .then_some((function, len))
}

/// Operator or parenthesis at the start of `s`
///
/// A `-` following an operator is unary minus; a `+` there is a no-op and
/// reported as `None` for the token.
pub fn next_is_operator(s: &str, last_was_operator: bool) -> Option<Option<Token>> {
    let c = s.chars().next()?;
    match c {
        '(' => Some(Some(Token::OpenParen)),
        ')' => Some(Some(Token::CloseParen)),
        '-' if last_was_operator => Some(Some(Token::Negate)),
        '+' if last_was_operator => Some(None),
        _ => Operator::from_char(c).map(|op| Some(Token::Operator(op))),
    }
}

/// The free variable at the start of `s`
///
/// Rejected when immediately followed by a letter or digit, which makes it
/// part of some other word (or, for `s`, a dataset reference).
pub fn next_is_variable(s: &str, variable: char) -> bool {
    let mut chars = s.chars();
    chars.next() == Some(variable) && !chars.next().is_some_and(char::is_alphanumeric)
}

/// Split `expression` into lexemes
pub fn tokenize(expression: &str, variable: char) -> ExpressionResult<Vec<Lexeme>> {
    let mut lexemes = Vec::new();
    let mut last_was_operator = true;
    let mut position = 0;

    while position < expression.len() {
        let rest = &expression[position..];

        let Some(c) = rest.chars().next() else {
            break;
        };
        if c.is_whitespace() {
            position += c.len_utf8();
            continue;
        }

        let (token, advance) = if let Some(len) = next_is_number(rest, last_was_operator) {
            let value = rest[..len].parse::<f64>().map_err(|_| ExpressionError::Lex {
                fragment: rest[..len].to_string(),
                position,
            })?;
            (Some(Token::Number(value)), len)
        } else if let Some((function, len)) = next_is_function(rest) {
            (Some(Token::Function(function)), len)
        } else if let Some((len, digits)) = next_is_dataset(rest) {
            // Indices too large for usize can never resolve; saturate so the
            // evaluator reports them as unknown datasets
            let index = digits.parse::<usize>().unwrap_or(usize::MAX);
            (Some(Token::Dataset(index)), len)
        } else if next_is_variable(rest, variable) {
            (Some(Token::Variable), variable.len_utf8())
        } else if let Some(token) = next_is_operator(rest, last_was_operator) {
            (token, 1)
        } else {
            return Err(ExpressionError::Lex {
                fragment: offending_fragment(rest),
                position,
            });
        };

        if let Some(token) = token {
            last_was_operator = matches!(
                token,
                Token::Operator(_) | Token::Negate | Token::OpenParen | Token::Function(_)
            );
            lexemes.push(Lexeme { token, position });
        }
        position += advance;
    }

    Ok(lexemes)
}

/// The word (or single character) that failed to tokenize
fn offending_fragment(rest: &str) -> String {
    let word: String = rest.chars().take_while(|c| c.is_alphanumeric()).collect();
    if word.is_empty() {
        rest.chars().take(1).collect()
    } else {
        word
    }
}
