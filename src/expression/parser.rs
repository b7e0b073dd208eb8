//! Shunting-yard conversion from infix lexemes to a postfix queue.
//!
//! Precedence, from tightest: unary minus, `^` (right associative),
//! `* / %`, `+ -`. Two adjacent operands with nothing between them are
//! multiplied, so `2s1` parses as `2*s1` and `(1)(2)` as `(1)*(2)`.

use super::error::{ExpressionError, ExpressionResult};
use super::lexer::{tokenize, Lexeme};
use super::token::{Operator, Token, NEGATE_PRECEDENCE};

/// True when every `)` closes an earlier `(` and none are left open
pub fn parentheses_balanced(expression: &str) -> bool {
    let mut depth: usize = 0;
    for c in expression.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Tokenize and convert `expression` to postfix order
pub fn parse(expression: &str, variable: char) -> ExpressionResult<Vec<Lexeme>> {
    if !parentheses_balanced(expression) {
        return Err(ExpressionError::Syntax("unbalanced parentheses".to_string()));
    }

    let lexemes = tokenize(expression, variable)?;
    if lexemes.is_empty() {
        return Err(ExpressionError::Syntax("empty expression".to_string()));
    }

    to_postfix(&lexemes)
}

/// Reorder infix lexemes into postfix (reverse Polish) order
pub fn to_postfix(lexemes: &[Lexeme]) -> ExpressionResult<Vec<Lexeme>> {
    let mut output: Vec<Lexeme> = Vec::with_capacity(lexemes.len());
    let mut operators: Vec<Lexeme> = Vec::new();
    let mut expect_operand = true;

    for &lexeme in lexemes {
        if lexeme.token.starts_operand() && !expect_operand {
            let implicit = Lexeme {
                token: Token::Operator(Operator::Multiply),
                position: lexeme.position,
            };
            push_operator(&mut operators, &mut output, implicit, Operator::Multiply);
            expect_operand = true;
        }

        match lexeme.token {
            Token::Number(_) | Token::Dataset(_) | Token::Variable => {
                output.push(lexeme);
                expect_operand = false;
            }
            Token::Function(_) | Token::Negate | Token::OpenParen => {
                operators.push(lexeme);
                expect_operand = true;
            }
            Token::Operator(op) => {
                if expect_operand {
                    return Err(ExpressionError::Syntax(format!(
                        "operator '{}' at position {} is missing its left operand",
                        op.symbol(),
                        lexeme.position
                    )));
                }
                push_operator(&mut operators, &mut output, lexeme, op);
                expect_operand = true;
            }
            Token::CloseParen => {
                if expect_operand {
                    return Err(ExpressionError::Syntax(format!(
                        "missing operand before ')' at position {}",
                        lexeme.position
                    )));
                }
                close_parenthesis(&mut operators, &mut output, lexeme.position)?;
            }
        }
    }

    if expect_operand {
        return Err(ExpressionError::Syntax(
            "expression ends without an operand".to_string(),
        ));
    }

    while let Some(lexeme) = operators.pop() {
        if lexeme.token == Token::OpenParen {
            return Err(ExpressionError::Syntax(format!(
                "unmatched '(' at position {}",
                lexeme.position
            )));
        }
        output.push(lexeme);
    }

    Ok(output)
}

/// Pop operators that bind at least as tightly as `op`, then push `op`
fn push_operator(
    operators: &mut Vec<Lexeme>,
    output: &mut Vec<Lexeme>,
    lexeme: Lexeme,
    op: Operator,
) {
    while let Some(top) = operators.last() {
        let should_pop = match top.token {
            Token::Negate => NEGATE_PRECEDENCE >= op.precedence(),
            Token::Operator(top_op) => operator_shift(top_op, op),
            _ => false,
        };
        if !should_pop {
            break;
        }
        if let Some(top) = operators.pop() {
            output.push(top);
        }
    }
    operators.push(lexeme);
}

/// Whether `stacked` must be output before `incoming` is pushed
fn operator_shift(stacked: Operator, incoming: Operator) -> bool {
    if incoming.is_left_associative() {
        stacked.precedence() >= incoming.precedence()
    } else {
        stacked.precedence() > incoming.precedence()
    }
}

/// Pop to the matching `(` and discard it, emitting a waiting function
fn close_parenthesis(
    operators: &mut Vec<Lexeme>,
    output: &mut Vec<Lexeme>,
    position: usize,
) -> ExpressionResult<()> {
    loop {
        match operators.pop() {
            Some(Lexeme {
                token: Token::OpenParen,
                ..
            }) => break,
            Some(lexeme) => output.push(lexeme),
            None => {
                return Err(ExpressionError::Syntax(format!(
                    "unmatched ')' at position {}",
                    position
                )))
            }
        }
    }

    if let Some(&top) = operators.last() {
        if matches!(top.token, Token::Function(_)) {
            operators.pop();
            output.push(top);
        }
    }
    Ok(())
}
