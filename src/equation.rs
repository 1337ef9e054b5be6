use crate::ast::Ast;
use crate::error::Error;
use crate::expr::Expr;
use std::fmt::{self, Display, Formatter};

/// A parsed `lhs = rhs` equality and its free symbols
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    lhs: Expr,
    rhs: Expr,
    free_symbols: Vec<String>,
}

impl Equation {
    /// Split `text` on its single `=` and parse both sides.
    ///
    /// Free symbols are ordered by first appearance, left side first.
    ///
    /// # Examples
    /// ```
    /// # use calq::Equation;
    /// let equation = Equation::build("F = m*g_0 + F_0").unwrap();
    /// assert_eq!(equation.free_symbols(), ["F", "m", "g_0", "F_0"]);
    ///
    /// assert!(Equation::build("a = b = c").is_err());
    /// ```
    pub fn build(text: &str) -> Result<Self, Error> {
        let sides: Vec<&str> = text.split('=').collect();
        let (left, right) = match sides.as_slice() {
            [left, right] => (*left, *right),
            _ => return Err(Error::FormulaSyntaxError(sides.len() - 1)),
        };
        let lhs = Expr::parse(left)?;
        let rhs = Expr::parse(right)?;

        let mut free_symbols: Vec<String> = Vec::new();
        for name in lhs.variables().into_iter().chain(rhs.variables()) {
            if !free_symbols.iter().any(|s| s == name) {
                free_symbols.push(name.to_string());
            }
        }
        Ok(Self {
            lhs,
            rhs,
            free_symbols,
        })
    }

    /// Left side, optimized
    pub fn lhs(&self) -> &Ast {
        self.lhs.ast()
    }

    /// Right side, optimized
    pub fn rhs(&self) -> &Ast {
        self.rhs.ast()
    }

    /// Symbols that were not replaced by a number during preprocessing
    pub fn free_symbols(&self) -> &[String] {
        &self.free_symbols
    }

    /// `lhs - rhs`, the expression whose zeros solve the equation
    pub fn difference(&self) -> Ast {
        Ast::sub(self.lhs().clone(), self.rhs().clone()).optimize()
    }
}

impl Display for Equation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
