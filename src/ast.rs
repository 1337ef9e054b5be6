use crate::error::Error;
use crate::lexer::is_variable;
use crate::token::{Op, Token};
use crate::util::{function, Func};
use std::f64::consts::PI;
use std::fmt::{self, Display, Formatter};

/// Ast nodes for the expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// A symbol, to be resolved later
    Variable(String),
    /// A constant value
    Value(f64),
    /// <left> + <right>
    Add(Box<Ast>, Box<Ast>),
    /// <left> - <right>
    Sub(Box<Ast>, Box<Ast>),
    /// <left> * <right>
    Mul(Box<Ast>, Box<Ast>),
    /// <left> / <right>
    Div(Box<Ast>, Box<Ast>),
    /// <left> ** <right>
    Exp(Box<Ast>, Box<Ast>),
    /// -<arg>
    Neg(Box<Ast>),
    /// fn(<arg>)
    Function(Func, Box<Ast>),
}

impl Ast {
    /// Construct the AST for a vector of tokens in reverse polish notation.
    /// This function eats the tokens as it uses them
    pub fn from_tokens(tokens: &mut Vec<Token>, context: &str) -> Result<Self, Error> {
        Self::from_tokens_internal(tokens, context).map(Self::optimize)
    }

    fn from_tokens_internal(tokens: &mut Vec<Token>, context: &str) -> Result<Self, Error> {
        if let Some(token) = tokens.pop() {
            match token {
                Token::Value(value) => {
                    if let Some(func) = function(&value) {
                        let arg = Self::from_tokens_internal(tokens, " in function call")?;
                        Ok(Self::Function(func, Box::new(arg)))
                    } else if value == "pi" {
                        Ok(Self::Value(PI))
                    } else if let Ok(number) = value.parse() {
                        Ok(Self::Value(number))
                    } else if is_variable(&value) {
                        Ok(Self::Variable(value))
                    } else {
                        Err(Error::parse(format!("invalid value {}", value)))
                    }
                }
                Token::Op(op) => {
                    let right = Box::new(Self::from_tokens_internal(tokens, " after operator")?);
                    let node: fn(Box<Ast>, Box<Ast>) -> Ast = match op {
                        Op::Neg => return Ok(Self::Neg(right)),
                        Op::Plus => Self::Add,
                        Op::Minus => Self::Sub,
                        Op::Mul => Self::Mul,
                        Op::Div => Self::Div,
                        Op::Exp => Self::Exp,
                    };
                    let left = Box::new(Self::from_tokens_internal(tokens, " before operator")?);
                    Ok(node(left, right))
                }
                other => Err(Error::parse(format!(
                    "unexpected {:?} after shunting yard",
                    other
                ))),
            }
        } else {
            Err(Error::parse(format!("empty expression{}", context)))
        }
    }

    /// If the AST node correspond to a constant, get `Some(constant)`. Else,
    /// get `None`
    pub fn value(&self) -> Option<f64> {
        if let Self::Value(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    fn is_value(&self, expected: f64) -> bool {
        self.value().map_or(false, |v| v == expected)
    }

    /// Does the symbol `name` appear anywhere in this tree?
    pub fn contains(&self, name: &str) -> bool {
        self.occurrences(name) > 0
    }

    /// Count how many times the symbol `name` appears in this tree
    pub fn occurrences(&self, name: &str) -> usize {
        match self {
            Self::Variable(v) => usize::from(v == name),
            Self::Value(_) => 0,
            Self::Neg(arg) | Self::Function(_, arg) => arg.occurrences(name),
            Self::Add(left, right)
            | Self::Sub(left, right)
            | Self::Mul(left, right)
            | Self::Div(left, right)
            | Self::Exp(left, right) => left.occurrences(name) + right.occurrences(name),
        }
    }

    /// Replace every occurrence of the symbol `name` by `with`
    #[must_use]
    pub fn substitute(&self, name: &str, with: &Ast) -> Self {
        let sub = |ast: &Ast| Box::new(ast.substitute(name, with));
        match self {
            Self::Variable(v) if v == name => with.clone(),
            Self::Variable(_) | Self::Value(_) => self.clone(),
            Self::Add(l, r) => Self::Add(sub(l), sub(r)),
            Self::Sub(l, r) => Self::Sub(sub(l), sub(r)),
            Self::Mul(l, r) => Self::Mul(sub(l), sub(r)),
            Self::Div(l, r) => Self::Div(sub(l), sub(r)),
            Self::Exp(l, r) => Self::Exp(sub(l), sub(r)),
            Self::Neg(arg) => Self::Neg(sub(arg)),
            Self::Function(func, arg) => Self::Function(*func, sub(arg)),
        }
    }

    /// Optimize the AST by doing constants propagation, dropping neutral
    /// elements and cancelling `a - a` and `a / a`
    #[must_use]
    pub fn optimize(self) -> Self {
        match self {
            Self::Variable(_) | Self::Value(_) => self,
            Self::Function(func, arg) => {
                let arg = arg.optimize();
                if let Some(arg) = arg.value() {
                    return Self::Value((func.apply)(arg));
                }
                Self::Function(func, Box::new(arg))
            }
            Self::Neg(arg) => match arg.optimize() {
                Self::Value(value) => Self::Value(-value),
                Self::Neg(inner) => *inner,
                arg => Self::Neg(Box::new(arg)),
            },
            Self::Add(left, right) => {
                let left = left.optimize();
                let right = right.optimize();
                if let (Some(l), Some(r)) = (left.value(), right.value()) {
                    return Self::Value(l + r);
                }
                if left.is_value(0.0) {
                    return right;
                }
                if right.is_value(0.0) {
                    return left;
                }
                Self::Add(Box::new(left), Box::new(right))
            }
            Self::Sub(left, right) => {
                let left = left.optimize();
                let right = right.optimize();
                if let (Some(l), Some(r)) = (left.value(), right.value()) {
                    return Self::Value(l - r);
                }
                if right.is_value(0.0) {
                    return left;
                }
                if left.is_value(0.0) {
                    return Self::Neg(Box::new(right)).optimize();
                }
                if left == right {
                    return Self::Value(0.0);
                }
                Self::Sub(Box::new(left), Box::new(right))
            }
            Self::Mul(left, right) => {
                let left = left.optimize();
                let right = right.optimize();
                if let (Some(l), Some(r)) = (left.value(), right.value()) {
                    return Self::Value(l * r);
                }
                if left.is_value(0.0) || right.is_value(0.0) {
                    return Self::Value(0.0);
                }
                if left.is_value(1.0) {
                    return right;
                }
                if right.is_value(1.0) {
                    return left;
                }
                Self::Mul(Box::new(left), Box::new(right))
            }
            Self::Div(left, right) => {
                let left = left.optimize();
                let right = right.optimize();
                if let (Some(l), Some(r)) = (left.value(), right.value()) {
                    return Self::Value(l / r);
                }
                if right.is_value(1.0) {
                    return left;
                }
                if left.is_value(0.0) {
                    return Self::Value(0.0);
                }
                if left == right {
                    return Self::Value(1.0);
                }
                Self::Div(Box::new(left), Box::new(right))
            }
            Self::Exp(left, right) => {
                let left = left.optimize();
                let right = right.optimize();
                if let (Some(l), Some(r)) = (left.value(), right.value()) {
                    return Self::Value(l.powf(r));
                }
                if right.is_value(1.0) {
                    return left;
                }
                Self::Exp(Box::new(left), Box::new(right))
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Add(..) | Self::Sub(..) => 1,
            Self::Mul(..) | Self::Div(..) => 2,
            Self::Neg(_) => 3,
            Self::Value(v) if v.is_sign_negative() => 3,
            Self::Exp(..) => 4,
            Self::Variable(_) | Self::Value(_) | Self::Function(..) => 5,
        }
    }

    fn fmt_operand(&self, f: &mut Formatter, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    pub(crate) fn add(left: Ast, right: Ast) -> Self {
        Self::Add(Box::new(left), Box::new(right))
    }

    pub(crate) fn sub(left: Ast, right: Ast) -> Self {
        Self::Sub(Box::new(left), Box::new(right))
    }

    pub(crate) fn mul(left: Ast, right: Ast) -> Self {
        Self::Mul(Box::new(left), Box::new(right))
    }

    pub(crate) fn div(left: Ast, right: Ast) -> Self {
        Self::Div(Box::new(left), Box::new(right))
    }

    pub(crate) fn pow(base: Ast, exponent: Ast) -> Self {
        Self::Exp(Box::new(base), Box::new(exponent))
    }

    pub(crate) fn neg(arg: Ast) -> Self {
        Self::Neg(Box::new(arg))
    }

    /// Apply the named function to `arg`; `name` must be a known function
    pub(crate) fn call(name: &str, arg: Ast) -> Option<Self> {
        function(name).map(|func| Self::Function(func, Box::new(arg)))
    }
}

impl Display for Ast {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Variable(name) => write!(f, "{}", name),
            Self::Value(value) => write!(f, "{}", value),
            Self::Add(l, r) => {
                l.fmt_operand(f, 1)?;
                write!(f, " + ")?;
                r.fmt_operand(f, 1)
            }
            Self::Sub(l, r) => {
                l.fmt_operand(f, 1)?;
                write!(f, " - ")?;
                r.fmt_operand(f, 2)
            }
            Self::Mul(l, r) => {
                l.fmt_operand(f, 2)?;
                write!(f, "*")?;
                r.fmt_operand(f, 3)
            }
            Self::Div(l, r) => {
                l.fmt_operand(f, 2)?;
                write!(f, "/")?;
                r.fmt_operand(f, 3)
            }
            Self::Exp(l, r) => {
                l.fmt_operand(f, 5)?;
                write!(f, "**")?;
                r.fmt_operand(f, 4)
            }
            Self::Neg(arg) => {
                write!(f, "-")?;
                arg.fmt_operand(f, 4)
            }
            Self::Function(func, arg) => write!(f, "{}({})", func.name, arg),
        }
    }
}
