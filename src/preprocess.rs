//! Text rewriting done before parsing: `\name` references become literal
//! numbers, `^` becomes `**`, and a bare expression gets an implicit
//! `a = ` left hand side.

use crate::constants::ConstantTable;
use crate::symbols::Variables;
use regex::{NoExpand, Regex};

/// Left hand side given to formulas typed without `=`
pub const IMPLICIT_LHS: &str = "a = ";

/// Run every preprocessing step on `raw`.
///
/// The result always contains at least one `=`.
///
/// # Examples
/// ```
/// # use calq::{preprocess, ConstantTable};
/// let variables = vec![("V1".to_string(), "4.000000".to_string())];
/// let text = preprocess("\\V1^2 + x", &variables, &ConstantTable::default());
/// assert_eq!(text, "a = 4.000000**2 + x");
/// ```
pub fn preprocess(raw: &str, variables: &Variables, constants: &ConstantTable) -> String {
    log::debug!("Original formula: {}", raw);
    let formula = substitute(raw, variables, constants);
    let formula = formula.replace('^', "**");
    log::debug!("Final formula for solving: {}", formula);

    if formula.contains('=') {
        formula
    } else {
        let formula = format!("{}{}", IMPLICIT_LHS, formula);
        log::debug!("Modified formula: {}", formula);
        formula
    }
}

/// Replace `\name` references: variables first, in creation order, then
/// constants, in table order.
pub fn substitute(raw: &str, variables: &Variables, constants: &ConstantTable) -> String {
    let mut formula = raw.to_string();
    for (name, value) in variables {
        formula = replace_reference(&formula, name, value);
    }
    log::debug!("Formula after variable substitution: {}", formula);

    for constant in constants {
        formula = replace_reference(&formula, &constant.name, &literal(constant.value));
    }
    formula
}

/// Replace every whole-word `\name` in `text` by `value`
fn replace_reference(text: &str, name: &str, value: &str) -> String {
    let needle = format!("\\{}", name);
    if !text.contains(&needle) {
        return text.to_string();
    }
    let pattern = format!(r"\\{}\b", regex::escape(name));
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(text, NoExpand(value)).into_owned(),
        Err(err) => {
            log::warn!("cannot substitute \\{}: {}", name, err);
            text.to_string()
        }
    }
}

/// Shortest text that reads back as exactly `value`
pub fn literal(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || (1e-4..1e16).contains(&magnitude) {
        format!("{}", value)
    } else {
        format!("{:e}", value)
    }
}
