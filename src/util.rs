use hashbrown::HashMap;
use std::fmt;

/// A named single-argument function usable in formulas
#[derive(Clone, Copy)]
pub struct Func {
    /// Name used in formulas
    pub name: &'static str,
    /// Numeric implementation
    pub apply: fn(f64) -> f64,
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Func({})", self.name)
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

fn erf(x: f64) -> f64 {
    libm::erf(x)
}

fn gamma(x: f64) -> f64 {
    libm::tgamma(x)
}

/// `-1`, `0` or `1`; unlike `f64::signum`, zero maps to zero
fn sign(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x.signum()
    }
}

lazy_static! {
    pub static ref FUNCTIONS: HashMap<&'static str, Func> = {
        let table: [(&'static str, fn(f64) -> f64); 25] = [
            ("sqrt", f64::sqrt),
            ("cbrt", f64::cbrt),
            ("sin", f64::sin),
            ("cos", f64::cos),
            ("tan", f64::tan),
            ("asin", f64::asin),
            ("acos", f64::acos),
            ("atan", f64::atan),
            ("sinh", f64::sinh),
            ("cosh", f64::cosh),
            ("tanh", f64::tanh),
            ("asinh", f64::asinh),
            ("acosh", f64::acosh),
            ("atanh", f64::atanh),
            ("floor", f64::floor),
            ("ceil", f64::ceil),
            ("abs", f64::abs),
            ("sign", sign),
            ("exp", f64::exp),
            // both spellings are the natural logarithm
            ("ln", f64::ln),
            ("log", f64::ln),
            ("log2", f64::log2),
            ("log10", f64::log10),
            ("erf", erf),
            ("gamma", gamma),
        ];
        let mut map = HashMap::with_capacity(table.len());
        for &(name, apply) in table.iter() {
            map.insert(name, Func { name, apply });
        }
        map.shrink_to_fit();
        map
    };
}

/// Look up a function by name
pub fn function(name: &str) -> Option<Func> {
    FUNCTIONS.get(name).copied()
}
