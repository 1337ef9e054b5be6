#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::float_cmp,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

//! calq, a formula solving calculator.
//!
//! A formula is an equality such as `v**2 = u**2 + 2*a*s`. calq solves it
//! for every free symbol and prints the real roots with a configurable
//! number of decimals. The easiest way to use this crate is with the
//! [`solve`](fn.solve.html) function:
//!
//! ```
//! use calq::{solve, SymbolTable};
//!
//! let memory = SymbolTable::new();
//! assert_eq!(solve("x^2 = 4", &memory, 2), Ok("x = -2.00, 2.00".into()));
//! ```
//!
//! A formula without `=` is given the left hand side `a = `, so the
//! calculator can be used for plain arithmetic:
//!
//! ```
//! # use calq::{solve, SymbolTable};
//! # let memory = SymbolTable::new();
//! assert_eq!(solve("2*3 + 1", &memory, 0), Ok("a = 7".into()));
//! ```
//!
//! Results can be saved to a variable memory, and physical constants read
//! from a built-in table. Both are referenced with a backslash: `\V1`,
//! `\c`, `\hbar`. The [`Calculator`](struct.Calculator.html) type keeps
//! this state across formulas:
//!
//! ```
//! use calq::{Calculator, Settings};
//!
//! let mut calculator = Calculator::new(Settings::default());
//! calculator.solve("E = 1 * \\c^2");
//! assert_eq!(calculator.save_to_memory(), Ok("V1".into()));
//! assert_eq!(calculator.solve("\\V1 / \\c^2"), "a = 1.000000");
//! ```
//!
//! The expression parser can also be used on its own, with an explicit
//! context for the variables:
//!
//! ```
//! use std::collections::HashMap;
//! use calq::Expr;
//!
//! let expr = Expr::parse("3 / c + b").unwrap();
//! let mut context :HashMap<String,f64> = HashMap::new();
//! context.insert("c".into(), 1.0);
//! context.insert("b".into(), 5.0);
//! assert_eq!(expr.eval(&context), Ok(8.0));
//! ```
//!
//! # Language definition
//!
//! Formulas can contain the following elements:
//!
//! - float literal values: `-12.456`, `+0.0045e78`, ...;
//! - left and right parenthesis;
//! - mathematical operators: `+` for addition, `-` for subtraction,
//!   `*` for multiplication, `/` for division and `^` or `**` for
//!   exponentiation. A number or a closing parenthesis directly followed by
//!   a symbol, a number or an opening parenthesis is multiplied: `2x(y+1)`;
//! - symbols. Names are ASCII only, start with a letter or `_`, and can
//!   contain letters, digits and `_`. `pi` is always 3.14159...;
//! - function calls: `sin(a)`, `atan(22.0)`. The available functions are
//!   `sqrt`, `cbrt`, `sin`, `cos`, `tan`, `asin`, `acos`, `atan`, `sinh`,
//!   `cosh`, `tanh`, `asinh`, `acosh`, `atanh`, `floor`, `ceil`, `abs`,
//!   `sign`, `exp`, `ln`, `log` (natural), `log2`, `log10`, `erf` and
//!   `gamma`;
//! - exactly one `=`.
//!
//! # Technical details
//!
//! Both sides of a formula go through a Shunting-Yard parser into an AST
//! with constant propagation. Each symbol is solved by isolating it when it
//! appears once, by collecting a polynomial, or by a numeric scan, and the
//! roots are evaluated as `f64`.

#[macro_use]
extern crate lazy_static;

mod ast;
mod calculator;
mod constants;
mod equation;
mod error;
mod expr;
mod format;
mod lexer;
mod numeric;
mod poly;
mod preprocess;
mod settings;
mod solve;
mod symbols;
mod token;
mod util;

pub use ast::Ast;
pub use calculator::{Calculator, MEMORY_CLEARED};
pub use constants::{scientific, Constant, ConstantTable, CONSTANTS};
pub use equation::Equation;
pub use error::Error;
pub use expr::{eval, Expr};
pub use format::{format_root, last_value, render};
pub use lexer::is_variable;
pub use preprocess::{literal, preprocess, IMPLICIT_LHS};
pub use settings::{Settings, DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};
pub use solve::{real_roots, solve_all, SymbolSolution};
pub use symbols::{SymbolTable, Variables};
pub use util::FUNCTIONS;

/// Preprocess, build, solve and render `raw` in one call.
///
/// # Examples
/// ```
/// # use calq::{solve, Error, SymbolTable};
/// let memory = SymbolTable::new();
/// assert_eq!(solve("3.14159", &memory, 0), Ok("a = 3".into()));
/// assert_eq!(solve("a = b = c", &memory, 6), Err(Error::FormulaSyntaxError(2)));
/// ```
pub fn solve(raw: &str, symbols: &SymbolTable, decimal_places: u8) -> Result<String, Error> {
    let formula = preprocess(raw, symbols.variables(), symbols.constants());
    let equation = Equation::build(&formula)?;
    let solutions = solve_all(&equation, symbols.constants(), decimal_places)?;
    Ok(render(&solutions))
}
