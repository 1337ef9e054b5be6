use crate::ast::Ast;
use crate::lexer::Lexer;
use crate::Error;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Evaluate a single expression from `input`.
///
/// Returns `Ok(result)` if the evaluation is successful, or `Err(cause)` if
/// parsing or evaluating the expression failed.
///
/// # Example
///
/// ```
/// # use std::collections::HashMap;
/// # use calq::eval;
///
/// assert_eq!(eval("45 - 2**3", &HashMap::new()), Ok(37.0));
///
/// let mut context :HashMap<String,f64> = HashMap::new();
/// context.insert("a".into(), -5.0);
/// assert_eq!(eval("3a", &context), Ok(-15.0));
/// ```
pub fn eval<'a, C>(input: &str, context: C) -> Result<f64, Error>
where
    C: Into<&'a HashMap<String, f64>>,
{
    Expr::parse(input).and_then(|expr| expr.eval(context))
}

/// A parsed and optimized mathematical expression.
///
/// # Examples
/// ```
/// # use calq::Expr;
/// # use std::collections::HashMap;
/// let expr = Expr::parse("3 + 5 * 2").unwrap();
/// assert_eq!(expr.eval(&HashMap::new()), Ok(13.0));
///
/// let mut context :HashMap<String,f64> = HashMap::new();
/// context.insert("a".into(), 42.0);
/// let expr = Expr::parse("-2 * a").unwrap();
/// assert_eq!(expr.eval(&context), Ok(-84.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    ast: Ast,
}

impl Expr {
    /// Parse the given mathematical `expression` into an `Expr`.
    ///
    /// # Examples
    /// ```
    /// # use calq::Expr;
    /// // A valid expression
    /// assert!(Expr::parse("3 + 5 * 2").is_ok());
    /// // an invalid expression
    /// assert!(Expr::parse("3 + * 2").is_err());
    /// ```
    pub fn parse(expression: &str) -> Result<Self, Error> {
        let mut lexer = Lexer::new(expression);
        let ast = Ast::from_tokens(&mut lexer.parse()?, "")?;
        Ok(Self { ast })
    }

    /// Evaluate the expression in a given `context`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use calq::Expr;
    /// # use std::collections::HashMap;
    /// let expr = Expr::parse("3 + a").unwrap();
    ///
    /// let mut context :HashMap<String,f64> = HashMap::new();
    /// context.insert("a".into(), -5.0);
    /// assert_eq!(expr.eval(&context), Ok(-2.0));
    /// context.insert("a".into(), 2.0);
    /// assert_eq!(expr.eval(&context), Ok(5.0));
    /// ```
    pub fn eval<'a, C>(&self, context: C) -> Result<f64, Error>
    where
        C: Into<&'a HashMap<String, f64>>,
    {
        Self::inner_eval(&self.ast, context.into())
    }

    fn inner_eval(ast: &Ast, context: &HashMap<String, f64>) -> Result<f64, Error> {
        match *ast {
            Ast::Variable(ref name) =>
            // if the context has a value for the variable name, use the value
            {
                context
                    .get(name)
                    .copied()
                    // Otherwise, we return an error
                    .ok_or_else(|| Error::NameError(format!("name '{}' is not defined", name)))
            }
            Ast::Value(number) => Ok(number),
            Ast::Add(ref left, ref right) => {
                Ok(Self::inner_eval(left, context)? + Self::inner_eval(right, context)?)
            }
            Ast::Sub(ref left, ref right) => {
                Ok(Self::inner_eval(left, context)? - Self::inner_eval(right, context)?)
            }
            Ast::Mul(ref left, ref right) => {
                Ok(Self::inner_eval(left, context)? * Self::inner_eval(right, context)?)
            }
            Ast::Div(ref left, ref right) => {
                Ok(Self::inner_eval(left, context)? / Self::inner_eval(right, context)?)
            }
            Ast::Exp(ref left, ref right) => {
                Ok(Self::inner_eval(left, context)?.powf(Self::inner_eval(right, context)?))
            }
            Ast::Neg(ref arg) => Ok(-Self::inner_eval(arg, context)?),
            Ast::Function(func, ref arg) => Ok((func.apply)(Self::inner_eval(arg, context)?)),
        }
    }

    /// Get the free symbols of this expression, in order of first
    /// appearance.
    ///
    /// # Examples
    /// ```
    /// # use calq::Expr;
    /// let expr = Expr::parse("3 + 5 * 2").unwrap();
    /// assert!(expr.variables().is_empty());
    ///
    /// let expr = Expr::parse("b * a + b").unwrap();
    /// assert_eq!(expr.variables(), vec!["b", "a"]);
    /// ```
    pub fn variables(&self) -> Vec<&str> {
        let mut variables = Vec::new();
        Self::inner_variables(&self.ast, &mut variables);
        variables
    }

    /// The optimized syntax tree
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    fn inner_variables<'a>(ast: &'a Ast, variables: &mut Vec<&'a str>) {
        match *ast {
            Ast::Variable(ref name) => {
                if !variables.contains(&name.as_str()) {
                    variables.push(name);
                }
            }
            Ast::Value(_number) => {}
            Ast::Add(ref left, ref right)
            | Ast::Sub(ref left, ref right)
            | Ast::Mul(ref left, ref right)
            | Ast::Div(ref left, ref right)
            | Ast::Exp(ref left, ref right) => {
                Self::inner_variables(left, variables);
                Self::inner_variables(right, variables);
            }
            Ast::Neg(ref arg) | Ast::Function(_, ref arg) => {
                Self::inner_variables(arg, variables);
            }
        }
    }
}

impl From<Ast> for Expr {
    fn from(ast: Ast) -> Self {
        Self { ast }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.ast, f)
    }
}
