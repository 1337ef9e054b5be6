use crate::ast::Ast;
use std::collections::HashMap;

/// Highest power expanded when collecting `(...)**n`
const MAX_DEGREE: usize = 16;

/// An expression rewritten as a polynomial in one symbol. The coefficients
/// may still hold other symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    /// Lowest power first, without trailing zeros
    coefficients: Vec<Ast>,
}

impl Polynomial {
    /// Collect `ast` as a polynomial in `symbol`.
    ///
    /// Returns `None` when `symbol` appears somewhere a polynomial cannot
    /// hold it: in a denominator, an exponent, a function argument, or
    /// under a power that is not a small non-negative integer.
    pub fn collect(ast: &Ast, symbol: &str) -> Option<Self> {
        let mut coefficients = collect(ast, symbol)?;
        while coefficients.last().map_or(false, |c| c.value() == Some(0.0)) {
            coefficients.pop();
        }
        Some(Self { coefficients })
    }

    pub fn coefficients(&self) -> &[Ast] {
        &self.coefficients
    }

    /// Degree of the polynomial; the zero polynomial has degree 0
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Numeric coefficients, when every coefficient evaluates to a finite
    /// number in `context`
    pub fn numeric(&self, context: &HashMap<String, f64>) -> Option<Vec<f64>> {
        self.coefficients
            .iter()
            .map(|c| {
                crate::Expr::from(c.clone())
                    .eval(context)
                    .ok()
                    .filter(|v| v.is_finite())
            })
            .collect()
    }
}

fn collect(ast: &Ast, symbol: &str) -> Option<Vec<Ast>> {
    if !ast.contains(symbol) {
        return Some(vec![ast.clone()]);
    }
    let coefficients = match ast {
        Ast::Variable(_) => vec![Ast::Value(0.0), Ast::Value(1.0)],
        Ast::Neg(arg) => collect(arg, symbol)?.into_iter().map(Ast::neg).collect(),
        Ast::Add(left, right) => combine(collect(left, symbol)?, collect(right, symbol)?, Ast::add),
        Ast::Sub(left, right) => combine(collect(left, symbol)?, collect(right, symbol)?, Ast::sub),
        Ast::Mul(left, right) => product(&collect(left, symbol)?, &collect(right, symbol)?),
        Ast::Div(left, right) if !right.contains(symbol) => collect(left, symbol)?
            .into_iter()
            .map(|c| Ast::div(c, (**right).clone()))
            .collect(),
        Ast::Exp(base, exponent) => {
            let power = exponent.value()?;
            if power < 0.0 || power.fract() != 0.0 || power > MAX_DEGREE as f64 {
                return None;
            }
            let base = collect(base, symbol)?;
            let mut result = vec![Ast::Value(1.0)];
            for _ in 0..power as usize {
                result = product(&result, &base);
            }
            result
        }
        Ast::Div(..) | Ast::Function(..) | Ast::Value(_) => return None,
    };
    Some(coefficients.into_iter().map(Ast::optimize).collect())
}

/// Combine coefficient lists term by term, padding the shorter with zeros
fn combine(left: Vec<Ast>, right: Vec<Ast>, op: fn(Ast, Ast) -> Ast) -> Vec<Ast> {
    let len = left.len().max(right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();
    (0..len)
        .map(|_| {
            op(
                left.next().unwrap_or(Ast::Value(0.0)),
                right.next().unwrap_or(Ast::Value(0.0)),
            )
            .optimize()
        })
        .collect()
}

fn product(left: &[Ast], right: &[Ast]) -> Vec<Ast> {
    let mut result = vec![Ast::Value(0.0); left.len() + right.len() - 1];
    for (i, l) in left.iter().enumerate() {
        for (j, r) in right.iter().enumerate() {
            let term = Ast::mul(l.clone(), r.clone());
            result[i + j] = Ast::add(result[i + j].clone(), term).optimize();
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Expr;
    use test_case::test_case;

    fn polynomial(input: &str, symbol: &str) -> Option<Polynomial> {
        Polynomial::collect(Expr::parse(input).unwrap().ast(), symbol)
    }

    fn coefficients(input: &str) -> Vec<String> {
        polynomial(input, "x")
            .unwrap()
            .coefficients()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn linear_and_quadratic() {
        assert_eq!(coefficients("2*x + 3"), ["3", "2"]);
        assert_eq!(coefficients("x**2 - 4"), ["-4", "0", "1"]);
        assert_eq!(coefficients("(x + 1)*(x - 1)"), ["-1", "0", "1"]);
        assert_eq!(coefficients("(x + 1)**2"), ["1", "2", "1"]);
    }

    #[test]
    fn symbolic_coefficients() {
        assert_eq!(coefficients("a*x**2 + b*x + c"), ["c", "b", "a"]);
        assert_eq!(coefficients("x/m - v"), ["-v", "1/m"]);
    }

    #[test]
    fn cancelling_terms_lower_the_degree() {
        let poly = polynomial("x**2 + x - x**2", "x").unwrap();
        assert_eq!(poly.degree(), 1);
        assert_eq!(polynomial("x - x", "x").unwrap().degree(), 0);
    }

    #[test_case("1/x" ; "symbol in denominator")]
    #[test_case("2**x" ; "symbol in exponent")]
    #[test_case("sin(x) + x" ; "symbol in function")]
    #[test_case("x**0.5" ; "fractional power")]
    #[test_case("x**-1" ; "negative power")]
    fn not_polynomial(input: &str) {
        assert_eq!(polynomial(input, "x"), None);
    }

    #[test]
    fn numeric_coefficients() {
        let mut context = HashMap::new();
        context.insert("g".to_string(), 2.0);
        let poly = polynomial("g*x**3 - x", "x").unwrap();
        assert_eq!(poly.degree(), 3);
        assert_eq!(poly.numeric(&context), Some(vec![0.0, -1.0, 0.0, 2.0]));
        assert_eq!(poly.numeric(&HashMap::new()), None);
    }
}
