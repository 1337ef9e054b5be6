//! Solving an [`Equation`] for each of its free symbols.
//!
//! Each symbol is tried against the following strategies, first match
//! wins:
//!
//! 1. isolation, when the symbol appears exactly once: the operations
//!    around it are undone one by one, branching where the inverse is not
//!    unique (`x**2`, `sin`, `abs`, ...);
//! 2. polynomial collection of `lhs - rhs`, solved in closed form up to
//!    degree two and numerically above;
//! 3. a numeric scan, when the symbol is the only unknown left.
//!
//! Every root is then evaluated with the constants table as context, so a
//! root still depending on an unknown symbol is an error.

use crate::ast::Ast;
use crate::constants::ConstantTable;
use crate::equation::Equation;
use crate::error::Error;
use crate::expr::Expr;
use crate::format::format_root;
use crate::numeric;
use crate::poly::Polynomial;
use std::f64::consts::PI;
use std::fmt::{self, Display, Formatter};

/// A scan finding more roots than this is looking at a periodic function
const MAX_SCAN_ROOTS: usize = 32;

/// The formatted roots found for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSolution {
    /// The symbol solved for
    pub symbol: String,
    /// Roots in ascending order, formatted with the requested precision
    pub roots: Vec<String>,
}

impl SymbolSolution {
    /// An empty root list is a valid answer, not an error
    pub fn no_solution_found(&self) -> bool {
        self.roots.is_empty()
    }
}

impl Display for SymbolSolution {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.symbol, self.roots.join(", "))
    }
}

/// Solve `equation` for every free symbol, in order.
///
/// The first error aborts the whole solve.
///
/// # Examples
/// ```
/// # use calq::{solve_all, ConstantTable, Equation};
/// let equation = Equation::build("x**2 = 4").unwrap();
/// let solutions = solve_all(&equation, &ConstantTable::default(), 2).unwrap();
/// assert_eq!(solutions[0].to_string(), "x = -2.00, 2.00");
/// ```
pub fn solve_all(
    equation: &Equation,
    constants: &ConstantTable,
    decimal_places: u8,
) -> Result<Vec<SymbolSolution>, Error> {
    equation
        .free_symbols()
        .iter()
        .map(|symbol| {
            let roots = real_roots(equation, symbol, constants)?;
            Ok(SymbolSolution {
                symbol: symbol.clone(),
                roots: roots
                    .into_iter()
                    .map(|root| format_root(root, decimal_places))
                    .collect(),
            })
        })
        .collect()
}

/// Real roots of `equation` for `symbol`, ascending and without
/// duplicates.
pub fn real_roots(
    equation: &Equation,
    symbol: &str,
    constants: &ConstantTable,
) -> Result<Vec<f64>, Error> {
    let candidates = candidates(equation, symbol, constants)?;
    let mut values = Vec::with_capacity(candidates.roots.len());
    for root in &candidates.roots {
        let value = evaluate(root, symbol, constants)?;
        if value.is_infinite() {
            // 1/x = 0 and exp(x) = 0 isolate to an infinite x
            if candidates.verify {
                log::debug!("Discarding infinite root {} = {}", symbol, root);
                continue;
            }
            return Err(Error::NumericEvaluationError {
                symbol: symbol.to_string(),
                root: root.to_string(),
                reason: "the result is infinite".into(),
            });
        }
        if candidates.verify && !satisfies(equation, symbol, value, constants) {
            log::debug!("Discarding extraneous root {} = {}", symbol, value);
            continue;
        }
        // -0 prints as "-0.000"
        values.push(if value == 0.0 { 0.0 } else { value });
    }
    numeric::dedup(&mut values);
    log::debug!("Roots for {}: {:?}", symbol, values);
    Ok(values)
}

/// Root expressions for one symbol, before evaluation
struct Candidates {
    roots: Vec<Ast>,
    /// Branching inverses can produce roots of a different equation
    verify: bool,
}

fn candidates(
    equation: &Equation,
    symbol: &str,
    constants: &ConstantTable,
) -> Result<Candidates, Error> {
    let (lhs, rhs) = (equation.lhs(), equation.rhs());
    if lhs.occurrences(symbol) + rhs.occurrences(symbol) == 1 {
        let (side, other) = if lhs.contains(symbol) {
            (lhs, rhs)
        } else {
            (rhs, lhs)
        };
        if let Some(roots) = isolate(side, other.clone(), symbol) {
            log::debug!("Solving for {} by isolation", symbol);
            return Ok(Candidates {
                roots: roots.into_iter().map(Ast::optimize).collect(),
                verify: true,
            });
        }
    }

    let difference = equation.difference();
    if let Some(polynomial) = Polynomial::collect(&difference, symbol) {
        log::debug!(
            "Solving for {} as a polynomial of degree {}",
            symbol,
            polynomial.degree()
        );
        return polynomial_roots(&polynomial, &difference, symbol, constants);
    }

    scan(&difference, symbol, constants)
}

/// Undo the operations around the single occurrence of `symbol` in `side`,
/// applying their inverses to `other`. `None` when some operation cannot
/// be inverted.
fn isolate(side: &Ast, other: Ast, symbol: &str) -> Option<Vec<Ast>> {
    match side {
        Ast::Variable(name) if name == symbol => Some(vec![other]),
        Ast::Neg(arg) => isolate(arg, Ast::neg(other), symbol),
        Ast::Add(left, right) => {
            if left.contains(symbol) {
                isolate(left, Ast::sub(other, (**right).clone()), symbol)
            } else {
                isolate(right, Ast::sub(other, (**left).clone()), symbol)
            }
        }
        Ast::Sub(left, right) => {
            if left.contains(symbol) {
                isolate(left, Ast::add(other, (**right).clone()), symbol)
            } else {
                isolate(right, Ast::sub((**left).clone(), other), symbol)
            }
        }
        Ast::Mul(left, right) => {
            if left.contains(symbol) {
                isolate(left, Ast::div(other, (**right).clone()), symbol)
            } else {
                isolate(right, Ast::div(other, (**left).clone()), symbol)
            }
        }
        Ast::Div(left, right) => {
            if left.contains(symbol) {
                isolate(left, Ast::mul(other, (**right).clone()), symbol)
            } else {
                isolate(right, Ast::div((**left).clone(), other), symbol)
            }
        }
        Ast::Exp(base, exponent) if base.contains(symbol) => {
            // x**-n = r is x**n = 1/r
            let (other, exponent) = match exponent.value() {
                Some(n) if n < 0.0 && n.fract() == 0.0 => {
                    (Ast::div(Ast::Value(1.0), other), Ast::Value(-n))
                }
                _ => (other, (**exponent).clone()),
            };
            let roots = match exponent.value() {
                Some(n) if n == 0.0 => return None,
                Some(n) if n.fract() == 0.0 && n % 2.0 == 0.0 => {
                    let root = Ast::pow(other, Ast::Value(1.0 / n));
                    vec![Ast::neg(root.clone()), root]
                }
                // real odd root, defined for negative values too
                Some(n) if n.fract() == 0.0 => {
                    let magnitude =
                        Ast::pow(Ast::call("abs", other.clone())?, Ast::Value(1.0 / n));
                    vec![Ast::mul(Ast::call("sign", other)?, magnitude)]
                }
                _ => vec![Ast::pow(other, Ast::div(Ast::Value(1.0), exponent))],
            };
            branches(base, roots, symbol)
        }
        Ast::Exp(base, exponent) => {
            let root = Ast::div(Ast::call("ln", other)?, Ast::call("ln", (**base).clone())?);
            isolate(exponent, root, symbol)
        }
        Ast::Function(func, arg) => branches(arg, inverse(func.name, other)?, symbol),
        Ast::Variable(_) | Ast::Value(_) => None,
    }
}

fn branches(side: &Ast, others: Vec<Ast>, symbol: &str) -> Option<Vec<Ast>> {
    let mut roots = Vec::new();
    for other in others {
        roots.extend(isolate(side, other, symbol)?);
    }
    Some(roots)
}

/// Every argument for which the function `name` takes the value `value`,
/// up to periodicity
fn inverse(name: &str, value: Ast) -> Option<Vec<Ast>> {
    let call = |name: &str| Ast::call(name, value.clone());
    let roots = match name {
        "sin" => vec![call("asin")?, Ast::sub(Ast::Value(PI), call("asin")?)],
        "cos" => vec![call("acos")?, Ast::sub(Ast::Value(2.0 * PI), call("acos")?)],
        "tan" => vec![call("atan")?],
        "asin" => vec![call("sin")?],
        "acos" => vec![call("cos")?],
        "atan" => vec![call("tan")?],
        "sinh" => vec![call("asinh")?],
        "cosh" => vec![Ast::neg(call("acosh")?), call("acosh")?],
        "tanh" => vec![call("atanh")?],
        "asinh" => vec![call("sinh")?],
        "acosh" => vec![call("cosh")?],
        "atanh" => vec![call("tanh")?],
        "exp" => vec![call("ln")?],
        "ln" | "log" => vec![call("exp")?],
        "log2" => vec![Ast::pow(Ast::Value(2.0), value)],
        "log10" => vec![Ast::pow(Ast::Value(10.0), value)],
        "sqrt" => vec![Ast::pow(value, Ast::Value(2.0))],
        "cbrt" => vec![Ast::pow(value, Ast::Value(3.0))],
        "abs" => vec![Ast::neg(value.clone()), value],
        _ => return None,
    };
    Some(roots)
}

fn polynomial_roots(
    polynomial: &Polynomial,
    difference: &Ast,
    symbol: &str,
    constants: &ConstantTable,
) -> Result<Candidates, Error> {
    let exact = |roots| {
        Ok(Candidates {
            roots,
            verify: false,
        })
    };
    if polynomial.degree() == 0 {
        return exact(Vec::new());
    }

    if let Some(coefficients) = polynomial.numeric(constants.context()) {
        return match numeric::polynomial_roots(&coefficients) {
            Ok(roots) => exact(roots.into_iter().map(Ast::Value).collect()),
            Err(numeric::ComplexRoots) => Err(Error::NumericEvaluationError {
                symbol: symbol.to_string(),
                root: format!("root of {}", difference),
                reason: "some roots are complex".into(),
            }),
        };
    }

    let c = polynomial.coefficients();
    match polynomial.degree() {
        1 => exact(vec![Ast::neg(Ast::div(c[0].clone(), c[1].clone())).optimize()]),
        2 => {
            let (a, b) = (c[2].clone(), c[1].clone());
            let discriminant = Ast::sub(
                Ast::pow(b.clone(), Ast::Value(2.0)),
                Ast::mul(Ast::mul(Ast::Value(4.0), a.clone()), c[0].clone()),
            );
            let root = |sqrt: Ast| {
                Ast::div(Ast::add(Ast::neg(b.clone()), sqrt), Ast::mul(Ast::Value(2.0), a.clone()))
                    .optimize()
            };
            let sqrt = Ast::call("sqrt", discriminant)
                .ok_or_else(|| Error::Unsolvable(symbol.to_string()))?;
            exact(vec![root(Ast::neg(sqrt.clone())), root(sqrt)])
        }
        _ => Err(Error::Unsolvable(symbol.to_string())),
    }
}

/// Look for roots numerically, when nothing else is unknown
fn scan(difference: &Ast, symbol: &str, constants: &ConstantTable) -> Result<Candidates, Error> {
    let expr = Expr::from(difference.clone());
    let unknown = expr
        .variables()
        .into_iter()
        .any(|name| name != symbol && constants.get(name).is_none());
    if unknown {
        return Err(Error::Unsolvable(symbol.to_string()));
    }

    log::debug!("Scanning {} = 0 for {}", difference, symbol);
    let mut context = constants.context().clone();
    context.insert(symbol.to_string(), 0.0);
    let roots = numeric::scan_roots(|t| {
        if let Some(slot) = context.get_mut(symbol) {
            *slot = t;
        }
        expr.eval(&context).unwrap_or(f64::NAN)
    })
    .ok_or_else(|| Error::Unsolvable(symbol.to_string()))?;
    if roots.len() > MAX_SCAN_ROOTS {
        log::debug!("{} roots found for {}, giving up", roots.len(), symbol);
        return Err(Error::Unsolvable(symbol.to_string()));
    }
    Ok(Candidates {
        roots: roots.into_iter().map(Ast::Value).collect(),
        verify: false,
    })
}

fn evaluate(root: &Ast, symbol: &str, constants: &ConstantTable) -> Result<f64, Error> {
    let failure = |reason: String| Error::NumericEvaluationError {
        symbol: symbol.to_string(),
        root: root.to_string(),
        reason,
    };
    let value = Expr::from(root.clone())
        .eval(constants.context())
        .map_err(|err| failure(err.to_string()))?;
    if value.is_nan() {
        Err(failure("the result is not real".into()))
    } else {
        Ok(value)
    }
}

/// Does `symbol = value` satisfy the equation? Roots that cannot be checked
/// because other symbols are unknown are kept.
fn satisfies(equation: &Equation, symbol: &str, value: f64, constants: &ConstantTable) -> bool {
    let mut context = constants.context().clone();
    context.insert(symbol.to_string(), value);
    let side = |ast: &Ast| Expr::from(ast.clone()).eval(&context);
    match (side(equation.lhs()), side(equation.rhs())) {
        (Ok(lhs), Ok(rhs)) => {
            if !lhs.is_finite() || !rhs.is_finite() {
                return false;
            }
            let residual = (lhs - rhs).abs();
            residual <= 1e-7 * lhs.abs().max(rhs.abs()) || residual <= 1e-12 * value.abs().max(1.0)
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn roots(text: &str) -> Vec<String> {
        let equation = Equation::build(text).unwrap();
        solve_all(&equation, &ConstantTable::default(), 6)
            .unwrap()
            .into_iter()
            .map(|solution| solution.to_string())
            .collect()
    }

    fn error(text: &str) -> Error {
        let equation = Equation::build(text).unwrap();
        solve_all(&equation, &ConstantTable::default(), 6).unwrap_err()
    }

    #[test_case("a = 2*3+1" => vec!["a = 7.000000"] ; "implicit left side")]
    #[test_case("2*x + 3 = 7" => vec!["x = 2.000000"] ; "linear")]
    #[test_case("x/4 - 1 = 0" => vec!["x = 4.000000"] ; "division")]
    #[test_case("10/x = 4" => vec!["x = 2.500000"] ; "symbol in denominator")]
    #[test_case("5 - x = 1" => vec!["x = 4.000000"] ; "subtracted symbol")]
    #[test_case("-x = 3" => vec!["x = -3.000000"] ; "negated symbol")]
    fn isolation(text: &str) -> Vec<String> {
        roots(text)
    }

    #[test_case("x**2 = 4" => vec!["x = -2.000000, 2.000000"] ; "even power")]
    #[test_case("(x - 1)**2 = 4" => vec!["x = -1.000000, 3.000000"] ; "shifted even power")]
    #[test_case("x**3 = -8" => vec!["x = -2.000000"] ; "odd power of negative")]
    #[test_case("2**x = 8" => vec!["x = 3.000000"] ; "symbol in exponent")]
    #[test_case("sqrt(x) = 3" => vec!["x = 9.000000"] ; "square root")]
    #[test_case("sin(x) = 0.5" => vec!["x = 0.523599, 2.617994"] ; "sine branches")]
    #[test_case("cos(x) = 1" => vec!["x = 0.000000, 6.283185"] ; "cosine branches")]
    #[test_case("exp(x) = 1" => vec!["x = 0.000000"] ; "exponential")]
    #[test_case("ln(x) = 0" => vec!["x = 1.000000"] ; "logarithm")]
    #[test_case("log10(x) = 2" => vec!["x = 100.000000"] ; "decimal logarithm")]
    #[test_case("abs(x) = 3" => vec!["x = -3.000000, 3.000000"] ; "absolute value")]
    fn inverses(text: &str) -> Vec<String> {
        roots(text)
    }

    #[test_case("sqrt(x) = -2" ; "negative square root")]
    #[test_case("abs(x) = -1" ; "negative absolute value")]
    fn extraneous_roots_are_dropped(text: &str) {
        assert_eq!(roots(text), vec!["x = "]);
    }

    #[test_case("1/x = 0" ; "reciprocal")]
    #[test_case("exp(x) = 0" ; "exponential")]
    #[test_case("2**x = 0" ; "symbol in exponent")]
    #[test_case("tanh(x) = 1" ; "hyperbolic tangent asymptote")]
    #[test_case("x**-1 = 0" ; "negative power")]
    fn infinite_isolations_have_no_solution(text: &str) {
        assert_eq!(roots(text), vec!["x = "]);
    }

    #[test_case("x**-2 = 4" => vec!["x = -0.500000, 0.500000"] ; "even negative power")]
    #[test_case("x**-1 = 8" => vec!["x = 0.125000"] ; "reciprocal power")]
    #[test_case("x**-3 = -8" => vec!["x = -0.500000"] ; "odd negative power")]
    fn negative_powers(text: &str) -> Vec<String> {
        roots(text)
    }

    #[test]
    fn cancelled_symbols_are_not_solved_for() {
        assert!(roots("x/x = 1").is_empty());
    }

    fn values(text: &str, constants: &ConstantTable) -> Vec<f64> {
        let equation = Equation::build(text).unwrap();
        real_roots(&equation, "x", constants).unwrap()
    }

    fn assert_symmetric(roots: &[f64], magnitude: f64) {
        assert_eq!(roots.len(), 2, "{:?}", roots);
        assert!((roots[0] + magnitude).abs() <= 1e-9 * magnitude, "{:?}", roots);
        assert!((roots[1] - magnitude).abs() <= 1e-9 * magnitude, "{:?}", roots);
    }

    #[test]
    fn tiny_roots_keep_both_signs() {
        let h = 6.626_070_15e-34;
        let constants: ConstantTable = vec![("h", h)].into_iter().collect();
        assert_symmetric(&values("x**2 = h", &constants), h.sqrt());
        assert_symmetric(&values("x**2 = 1e-20", &constants), 1e-10);
        assert_symmetric(&values("abs(x) = 1e-12", &constants), 1e-12);
        assert_symmetric(&values("x*x = 1e-20", &constants), 1e-10);
    }

    #[test]
    fn polynomials_with_mixed_scales() {
        let m_e = 9.109_383_701_5e-31;
        let constants: ConstantTable = vec![("m_e", m_e)].into_iter().collect();

        let roots = values("x**2 + 1e6*x = 1", &constants);
        assert_eq!(roots.len(), 2);
        assert!((roots[1] - 1e-6).abs() < 1e-12, "{:?}", roots);

        let roots = values("x**3 = 1e9*x", &constants);
        assert_eq!(roots.len(), 3);
        assert_eq!(roots[1], 0.0);
        assert!((roots[2] - 1e9f64.sqrt()).abs() < 1e-9, "{:?}", roots);

        let roots = values("m_e*x**2 + x = 1", &constants);
        assert_eq!(roots.len(), 2);
        assert!((roots[1] - 1.0).abs() < 1e-12, "{:?}", roots);

        let roots = values("x**2 + x = 1e-12", &constants);
        assert_eq!(roots.len(), 2);
        assert!((roots[1] - 1e-12).abs() < 1e-21, "{:?}", roots);
    }

    #[test]
    fn scan_finds_roots_beyond_a_million() {
        let roots = values("x = 1e7 + sin(x)", &ConstantTable::default());
        assert_eq!(roots.len(), 1, "{:?}", roots);
        assert!((roots[0] - 1e7).abs() < 1.0, "{:?}", roots);
    }

    #[test_case("x**2 - 5*x + 6 = 0" => vec!["x = 2.000000, 3.000000"] ; "quadratic")]
    #[test_case("x**2 = 2*x - 1" => vec!["x = 1.000000"] ; "double root")]
    #[test_case("x**3 - 6x**2 + 11x = 6" => vec!["x = 1.000000, 2.000000, 3.000000"] ; "cubic")]
    #[test_case("x*(x + 1) = x + 4" => vec!["x = -2.000000, 2.000000"] ; "expanded product")]
    #[test_case("x = x + 1" => vec!["x = "] ; "contradiction")]
    fn polynomials(text: &str) -> Vec<String> {
        roots(text)
    }

    #[test]
    fn numeric_scan() {
        assert_eq!(roots("x*exp(x) = 1"), vec!["x = 0.567143"]);
        assert_eq!(roots("x + sin(x) = 1"), vec!["x = 0.510973"]);
    }

    #[test]
    fn each_free_symbol_gets_a_line() {
        let equation = Equation::build("a = 2*3+1").unwrap();
        let solutions = solve_all(&equation, &ConstantTable::default(), 2).unwrap();
        assert_eq!(solutions.len(), 1);
        assert!(!solutions[0].no_solution_found());
    }

    #[test]
    fn constants_are_known_during_evaluation() {
        let constants: ConstantTable = vec![("g", 9.8)].into_iter().collect();
        let equation = Equation::build("x = 2*g").unwrap();
        assert_eq!(real_roots(&equation, "x", &constants), Ok(vec![19.6]));

        let equation = Equation::build("x**3 = g*x").unwrap();
        let roots = real_roots(&equation, "x", &constants).unwrap();
        assert_eq!(roots.len(), 3);
        assert!((roots[2] - 9.8f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn negative_zero_is_normalized() {
        assert_eq!(roots("-x = 0"), vec!["x = 0.000000"]);
    }

    #[test]
    fn unknown_symbols_cannot_be_evaluated() {
        let err = error("F = m*g_0");
        assert!(matches!(err, Error::NumericEvaluationError { ref symbol, .. } if symbol == "F"));
        assert!(err.to_string().contains("name 'm' is not defined"), "{}", err);
    }

    #[test_case("x**2 = -4" ; "complex isolation")]
    #[test_case("x**2 + x + 1 = 0" ; "complex polynomial")]
    #[test_case("cosh(x) = 0.5" ; "outside the range")]
    fn non_real_roots(text: &str) {
        assert!(matches!(error(text), Error::NumericEvaluationError { .. }));
    }

    #[test]
    fn unsolvable() {
        assert_eq!(error("x + sin(x) = y"), Error::Unsolvable("x".into()));
        assert_eq!(error("floor(x) = 2"), Error::Unsolvable("x".into()));
    }
}
