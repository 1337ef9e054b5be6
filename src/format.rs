use crate::error::Error;
use crate::solve::SymbolSolution;

/// Format a root with exactly `decimal_places` digits after the point.
///
/// # Examples
/// ```
/// # use calq::format_root;
/// assert_eq!(format_root(3.14159, 0), "3");
/// assert_eq!(format_root(3.14159, 10), "3.1415900000");
/// assert_eq!(format_root(-0.0, 2), "0.00");
/// ```
pub fn format_root(value: f64, decimal_places: u8) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", usize::from(decimal_places), value)
}

/// One `name = root, root` line per symbol
pub fn render(solutions: &[SymbolSolution]) -> String {
    solutions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The text after the first `=` of the first line of a rendered result.
///
/// Other lines are ignored, so only the first symbol of a multi-symbol
/// result can be saved.
pub fn last_value(text: &str) -> Result<&str, Error> {
    let first = text.lines().next().map(str::trim).unwrap_or_default();
    if first.is_empty() {
        return Err(Error::NothingToSave);
    }
    first
        .split_once('=')
        .map(|(_, value)| value.trim())
        .ok_or(Error::InvalidSaveFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(3.14159, 0 => "3" ; "no decimals")]
    #[test_case(3.14159, 10 => "3.1415900000" ; "ten decimals")]
    #[test_case(2.0, 6 => "2.000000" ; "default precision")]
    #[test_case(-0.0, 3 => "0.000" ; "negative zero")]
    #[test_case(-2.5, 1 => "-2.5" ; "negative")]
    fn formatting(value: f64, places: u8) -> String {
        format_root(value, places)
    }

    #[test]
    fn render_lines() {
        let solutions = vec![
            SymbolSolution {
                symbol: "x".into(),
                roots: vec!["-2.00".into(), "2.00".into()],
            },
            SymbolSolution {
                symbol: "y".into(),
                roots: Vec::new(),
            },
        ];
        assert_eq!(render(&solutions), "x = -2.00, 2.00\ny = ");
        assert_eq!(render(&[]), "");
    }

    #[test_case("x = 4.000000" => Ok("4.000000") ; "single root")]
    #[test_case("x = -2.00, 2.00" => Ok("-2.00, 2.00") ; "several roots")]
    #[test_case("a = 1.5\nb = 2.5" => Ok("1.5") ; "first line only")]
    #[test_case("x = 1 = 2" => Ok("1 = 2") ; "first equals sign")]
    #[test_case("x = " => Ok("") ; "no roots")]
    #[test_case("No solution" => Err(Error::InvalidSaveFormat) ; "no equals sign")]
    #[test_case("" => Err(Error::NothingToSave) ; "empty")]
    #[test_case("  \n" => Err(Error::NothingToSave) ; "blank")]
    fn extract(text: &str) -> Result<&str, Error> {
        last_value(text)
    }
}
