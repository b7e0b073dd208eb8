//! Token types produced by the lexer and consumed by the parser and evaluators.

use std::fmt;

/// A classified fragment of an expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric literal, including a sign folded in after an operator
    Number(f64),
    /// Dataset reference `s<N>` (1-based)
    Dataset(usize),
    /// Function name; always followed by an opening parenthesis
    Function(Function),
    /// Binary operator
    Operator(Operator),
    /// Unary minus
    Negate,
    OpenParen,
    CloseParen,
    /// The free variable of symbolic mode (`x`, or `s` for transfer functions)
    Variable,
}

impl Token {
    /// True for tokens that can begin an operand
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_)
                | Token::Dataset(_)
                | Token::Function(_)
                | Token::Negate
                | Token::OpenParen
                | Token::Variable
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(v) => write!(f, "{}", v),
            Token::Dataset(i) => write!(f, "s{}", i),
            Token::Function(func) => write!(f, "{}", func.name()),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::Negate => write!(f, "-"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Variable => write!(f, "<variable>"),
        }
    }
}

/// Precedence of unary minus; binds tighter than every binary operator
pub const NEGATE_PRECEDENCE: u8 = 4;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    /// Floating-point remainder
    Modulo,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            '^' => Some(Self::Power),
            '%' => Some(Self::Modulo),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Power => '^',
            Self::Modulo => '%',
        }
    }

    /// Higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 1,
            Self::Multiply | Self::Divide | Self::Modulo => 2,
            Self::Power => 3,
        }
    }

    pub fn is_left_associative(&self) -> bool {
        !matches!(self, Self::Power)
    }

    /// Apply to two numbers
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
            Self::Divide => left / right,
            Self::Power => left.powf(right),
            Self::Modulo => left % right,
        }
    }
}

/// Functions callable from expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log,
    Log10,
    Abs,
    Sqrt,
    Floor,
    Ceil,
    Round,
    /// Running trapezoidal integral
    Integral,
    /// Backward-difference derivative
    Derivative,
    /// Running root-mean-square
    Rms,
    /// Single-sided amplitude spectrum
    Fft,
}

/// How a function is evaluated
#[derive(Clone, Copy)]
pub enum FunctionKernel {
    /// Applied to a number, or to every Y value of a dataset
    Elementwise(fn(f64) -> f64),
    /// Needs the whole dataset (X and Y); rejects plain numbers
    SeriesOnly,
}

struct FunctionEntry {
    name: &'static str,
    function: Function,
    kernel: FunctionKernel,
}

const fn elementwise(name: &'static str, function: Function, f: fn(f64) -> f64) -> FunctionEntry {
    FunctionEntry {
        name,
        function,
        kernel: FunctionKernel::Elementwise(f),
    }
}

const fn series_only(name: &'static str, function: Function) -> FunctionEntry {
    FunctionEntry {
        name,
        function,
        kernel: FunctionKernel::SeriesOnly,
    }
}

static FUNCTIONS: &[FunctionEntry] = &[
    elementwise("sin", Function::Sin, f64::sin),
    elementwise("cos", Function::Cos, f64::cos),
    elementwise("tan", Function::Tan, f64::tan),
    elementwise("asin", Function::Asin, f64::asin),
    elementwise("acos", Function::Acos, f64::acos),
    elementwise("atan", Function::Atan, f64::atan),
    elementwise("sinh", Function::Sinh, f64::sinh),
    elementwise("cosh", Function::Cosh, f64::cosh),
    elementwise("tanh", Function::Tanh, f64::tanh),
    elementwise("exp", Function::Exp, f64::exp),
    elementwise("ln", Function::Ln, f64::ln),
    elementwise("log", Function::Log, f64::ln),
    elementwise("log10", Function::Log10, f64::log10),
    elementwise("abs", Function::Abs, f64::abs),
    elementwise("sqrt", Function::Sqrt, f64::sqrt),
    elementwise("floor", Function::Floor, f64::floor),
    elementwise("ceil", Function::Ceil, f64::ceil),
    elementwise("round", Function::Round, f64::round),
    series_only("int", Function::Integral),
    series_only("diff", Function::Derivative),
    series_only("rms", Function::Rms),
    series_only("fft", Function::Fft),
];

impl Function {
    // FUNCTIONS is laid out in declaration order of the enum
    fn entry(&self) -> &'static FunctionEntry {
        &FUNCTIONS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    pub fn kernel(&self) -> FunctionKernel {
        self.entry().kernel
    }

    pub fn requires_series(&self) -> bool {
        matches!(self.kernel(), FunctionKernel::SeriesOnly)
    }

    /// Longest case-insensitive function name at the start of `s`
    ///
    /// Returns the function and the number of bytes its name occupies.
    pub fn longest_prefix(s: &str) -> Option<(Function, usize)> {
        FUNCTIONS
            .iter()
            .filter(|e| {
                s.len() >= e.name.len()
                    && s.as_bytes()[..e.name.len()].eq_ignore_ascii_case(e.name.as_bytes())
            })
            .max_by_key(|e| e.name.len())
            .map(|e| (e.function, e.name.len()))
    }

    /// All registered function names
    pub fn names() -> impl Iterator<Item = &'static str> {
        FUNCTIONS.iter().map(|e| e.name)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_precedence() {
        assert!(Operator::Power.precedence() > Operator::Multiply.precedence());
        assert!(Operator::Multiply.precedence() > Operator::Add.precedence());
        assert_eq!(Operator::Divide.precedence(), Operator::Modulo.precedence());
        assert!(NEGATE_PRECEDENCE > Operator::Power.precedence());
        assert!(!Operator::Power.is_left_associative());
        assert!(Operator::Subtract.is_left_associative());
    }

    #[test]
    fn test_operator_apply() {
        assert_eq!(Operator::Add.apply(3.0, 4.0), 7.0);
        assert_eq!(Operator::Power.apply(2.0, 10.0), 1024.0);
        assert_eq!(Operator::Modulo.apply(7.5, 2.0), 1.5);
        assert_eq!(Operator::from_char('/'), Some(Operator::Divide));
        assert_eq!(Operator::from_char('&'), None);
    }

    #[test]
    fn test_longest_prefix_prefers_longer_names() {
        assert_eq!(Function::longest_prefix("sinh(1)"), Some((Function::Sinh, 4)));
        assert_eq!(Function::longest_prefix("sin(1)"), Some((Function::Sin, 3)));
        assert_eq!(Function::longest_prefix("log10(5)"), Some((Function::Log10, 5)));
        assert_eq!(Function::longest_prefix("SQRT(4)"), Some((Function::Sqrt, 4)));
        assert_eq!(Function::longest_prefix("s1"), None);
    }

    #[test]
    fn test_every_function_has_an_entry() {
        for (i, entry) in FUNCTIONS.iter().enumerate() {
            assert_eq!(entry.function as usize, i, "table out of order at {}", entry.name);
            let f = entry.function;
            assert_eq!(Function::longest_prefix(f.name()).map(|(g, _)| g), Some(f));
        }
        assert!(Function::Integral.requires_series());
        assert!(!Function::Abs.requires_series());
        assert_eq!(Function::names().count(), 22);
    }
}
