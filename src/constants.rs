//! Named physical and mathematical constants that formulas can reference
//! as `\name`.
//!
//! The table mirrors the floating point constants of SciPy's
//! `scipy.constants` module (CODATA 2018 values), plus `euler` for
//! Euler's number. It is built once per process and never changes.

use std::collections::HashMap;
use std::f64::consts::{E, PI};

/// A single named constant
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    /// Name used after the backslash in formulas
    pub name: String,
    /// Full precision value
    pub value: f64,
}

impl Constant {
    /// Line shown in the constants legend, e.g. `c (c): 2.997925e+08`
    pub fn legend_line(&self) -> String {
        format!("{} ({}): {}", self.name, self.name, scientific(self.value))
    }

    fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query) || scientific(self.value).contains(query)
    }
}

/// An ordered, immutable name to value table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantTable {
    entries: Vec<Constant>,
    context: HashMap<String, f64>,
}

lazy_static! {
    /// The process wide physical constants table
    pub static ref CONSTANTS: ConstantTable = ConstantTable::physical();
}

impl ConstantTable {
    /// Build the full physical constants table
    pub fn physical() -> Self {
        let golden = (1.0 + 5f64.sqrt()) / 2.0;

        let c = 299_792_458.0;
        let mu_0 = 1.256_637_062_12e-6;
        let h = 6.626_070_15e-34;
        let g = 9.806_65;
        let elementary_charge = 1.602_176_634e-19;
        let avogadro = 6.022_140_76e23;
        let boltzmann = 1.380_649e-23;

        let gram = 1e-3;
        let grain = 64.798_91e-6;
        let pound = 7000.0 * grain;
        let blob = pound * g / 0.0254;
        let troy_ounce = 480.0 * grain;
        let atomic_mass = 1.660_539_066_60e-27;

        let degree = PI / 180.0;
        let arcmin = degree / 60.0;
        let arcsec = arcmin / 60.0;

        let minute = 60.0;
        let hour = 60.0 * minute;
        let day = 24.0 * hour;
        let julian_year = 365.25 * day;

        let inch = 0.0254;
        let foot = 12.0 * inch;
        let yard = 3.0 * foot;
        let mile = 1760.0 * yard;
        let point = inch / 72.0;
        let survey_foot = 1200.0 / 3937.0;
        let nautical_mile = 1852.0;
        let au = 149_597_870_700.0;

        let atm = 101_325.0;
        let gallon_us = 231.0 * inch * inch * inch;
        let gallon_imp = 4.546_09e-3;

        let degree_fahrenheit = 1.0 / 1.8;
        let calorie_th = 4.184;
        let calorie_it = 4.1868;

        let table: Vec<(&str, f64)> = vec![
            // mathematics
            ("pi", PI),
            ("golden", golden),
            ("golden_ratio", golden),
            // SI prefixes
            ("quetta", 1e30),
            ("ronna", 1e27),
            ("yotta", 1e24),
            ("zetta", 1e21),
            ("exa", 1e18),
            ("peta", 1e15),
            ("tera", 1e12),
            ("giga", 1e9),
            ("mega", 1e6),
            ("kilo", 1e3),
            ("hecto", 1e2),
            ("deka", 1e1),
            ("deci", 1e-1),
            ("centi", 1e-2),
            ("milli", 1e-3),
            ("micro", 1e-6),
            ("nano", 1e-9),
            ("pico", 1e-12),
            ("femto", 1e-15),
            ("atto", 1e-18),
            ("zepto", 1e-21),
            ("yocto", 1e-24),
            ("ronto", 1e-27),
            ("quecto", 1e-30),
            // physical constants
            ("c", c),
            ("speed_of_light", c),
            ("mu_0", mu_0),
            ("epsilon_0", 1.0 / (mu_0 * c * c)),
            ("h", h),
            ("Planck", h),
            ("hbar", h / (2.0 * PI)),
            ("G", 6.6743e-11),
            ("gravitational_constant", 6.6743e-11),
            ("g", g),
            ("e", elementary_charge),
            ("elementary_charge", elementary_charge),
            ("R", avogadro * boltzmann),
            ("gas_constant", avogadro * boltzmann),
            ("alpha", 7.297_352_569_3e-3),
            ("fine_structure", 7.297_352_569_3e-3),
            ("N_A", avogadro),
            ("Avogadro", avogadro),
            ("k", boltzmann),
            ("Boltzmann", boltzmann),
            ("sigma", 5.670_374_419e-8),
            ("Stefan_Boltzmann", 5.670_374_419e-8),
            ("Wien", 2.897_771_955e-3),
            ("Rydberg", 10_973_731.568_160),
            ("m_e", 9.109_383_701_5e-31),
            ("electron_mass", 9.109_383_701_5e-31),
            ("m_p", 1.672_621_923_69e-27),
            ("proton_mass", 1.672_621_923_69e-27),
            ("m_n", 1.674_927_498_04e-27),
            ("neutron_mass", 1.674_927_498_04e-27),
            // mass
            ("gram", gram),
            ("metric_ton", 1e3),
            ("grain", grain),
            ("lb", pound),
            ("pound", pound),
            ("blob", blob),
            ("slinch", blob),
            ("slug", blob / 12.0),
            ("oz", pound / 16.0),
            ("ounce", pound / 16.0),
            ("stone", 14.0 * pound),
            ("long_ton", 2240.0 * pound),
            ("short_ton", 2000.0 * pound),
            ("troy_ounce", troy_ounce),
            ("troy_pound", 12.0 * troy_ounce),
            ("carat", 200e-6),
            ("m_u", atomic_mass),
            ("u", atomic_mass),
            ("atomic_mass", atomic_mass),
            // angle
            ("degree", degree),
            ("arcmin", arcmin),
            ("arcminute", arcmin),
            ("arcsec", arcsec),
            ("arcsecond", arcsec),
            // time
            ("minute", minute),
            ("hour", hour),
            ("day", day),
            ("week", 7.0 * day),
            ("year", 365.0 * day),
            ("Julian_year", julian_year),
            // length
            ("inch", inch),
            ("foot", foot),
            ("yard", yard),
            ("mile", mile),
            ("mil", inch / 1000.0),
            ("pt", point),
            ("point", point),
            ("survey_foot", survey_foot),
            ("survey_mile", 5280.0 * survey_foot),
            ("nautical_mile", nautical_mile),
            ("fermi", 1e-15),
            ("angstrom", 1e-10),
            ("micron", 1e-6),
            ("au", au),
            ("astronomical_unit", au),
            ("light_year", julian_year * c),
            ("parsec", au / arcsec),
            // pressure
            ("atm", atm),
            ("atmosphere", atm),
            ("bar", 1e5),
            ("torr", atm / 760.0),
            ("mmHg", atm / 760.0),
            ("psi", pound * g / (inch * inch)),
            // area
            ("hectare", 1e4),
            ("acre", 43_560.0 * foot * foot),
            // volume
            ("liter", 1e-3),
            ("litre", 1e-3),
            ("gallon", gallon_us),
            ("gallon_US", gallon_us),
            ("gallon_imp", gallon_imp),
            ("fluid_ounce", gallon_us / 128.0),
            ("fluid_ounce_US", gallon_us / 128.0),
            ("fluid_ounce_imp", gallon_imp / 160.0),
            ("bbl", 42.0 * gallon_us),
            ("barrel", 42.0 * gallon_us),
            // speed
            ("kmh", 1e3 / hour),
            ("mph", mile / hour),
            ("mach", 340.5),
            ("speed_of_sound", 340.5),
            ("knot", nautical_mile / hour),
            // temperature
            ("zero_Celsius", 273.15),
            ("degree_Fahrenheit", degree_fahrenheit),
            // energy
            ("eV", elementary_charge),
            ("electron_volt", elementary_charge),
            ("calorie", calorie_th),
            ("calorie_th", calorie_th),
            ("calorie_IT", calorie_it),
            ("erg", 1e-7),
            ("Btu", pound * degree_fahrenheit * calorie_it / gram),
            ("Btu_IT", pound * degree_fahrenheit * calorie_it / gram),
            ("Btu_th", pound * degree_fahrenheit * calorie_th / gram),
            ("ton_TNT", 1e9 * calorie_th),
            // power
            ("hp", 550.0 * foot * pound * g),
            ("horsepower", 550.0 * foot * pound * g),
            // force
            ("dyn", 1e-5),
            ("dyne", 1e-5),
            ("lbf", pound * g),
            ("pound_force", pound * g),
            ("kgf", g),
            ("kilogram_force", g),
            // not part of scipy.constants, `e` is the elementary charge there
            ("euler", E),
        ];
        table.into_iter().collect()
    }

    /// Get the value of the constant `name`, if any
    pub fn get(&self, name: &str) -> Option<f64> {
        self.context.get(name).copied()
    }

    /// Iterate over the constants in table order
    pub fn iter(&self) -> std::slice::Iter<'_, Constant> {
        self.entries.iter()
    }

    /// Number of constants
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the table has no constants
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The table as an evaluation context for [`Expr::eval`](crate::Expr::eval)
    pub fn context(&self) -> &HashMap<String, f64> {
        &self.context
    }

    /// Constants whose name or displayed value contains `query`, ignoring
    /// case. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Constant> {
        let query = query.to_lowercase();
        self.entries.iter().filter(|c| c.matches(&query)).collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ConstantTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (name, value) in iter {
            let name = name.into();
            if let Some(previous) = table.context.insert(name.clone(), value) {
                log::warn!("constant {} declared twice, {} replaced", name, previous);
                if let Some(entry) = table.entries.iter_mut().find(|c| c.name == name) {
                    entry.value = value;
                }
            } else {
                table.entries.push(Constant { name, value });
            }
        }
        table
    }
}

impl<'a> IntoIterator for &'a ConstantTable {
    type Item = &'a Constant;
    type IntoIter = std::slice::Iter<'a, Constant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Render `value` with six decimals in scientific notation and a signed,
/// two digit exponent: `2.997925e+08`.
pub fn scientific(value: f64) -> String {
    let rendered = format!("{:.6e}", value);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => {
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            }
            Err(_) => rendered,
        },
        None => rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(299_792_458.0 => "2.997925e+08" ; "speed of light")]
    #[test_case(6.626_070_15e-34 => "6.626070e-34" ; "planck")]
    #[test_case(1.0 => "1.000000e+00" ; "unit")]
    #[test_case(-2.5e-3 => "-2.500000e-03" ; "negative")]
    #[test_case(1e100 => "1.000000e+100" ; "three digit exponent")]
    fn scientific_notation(value: f64) -> String {
        scientific(value)
    }

    #[test]
    fn physical_table() {
        let table = ConstantTable::physical();
        assert_eq!(table.get("c"), Some(299_792_458.0));
        assert_eq!(table.get("euler"), Some(std::f64::consts::E));
        assert_eq!(table.get("e"), Some(1.602_176_634e-19));
        assert_eq!(table.get("unknown"), None);
        assert_eq!(table.iter().last().map(|c| c.name.as_str()), Some("euler"));
        assert_eq!(table.len(), table.context().len());

        let hbar = table.get("hbar").unwrap();
        assert!((hbar - 1.054_571_817e-34).abs() < 1e-43);
        let r = table.get("R").unwrap();
        assert!((r - 8.314_462_618).abs() < 1e-9);
        let lb = table.get("lb").unwrap();
        assert!((lb - 0.453_592_37).abs() < 1e-15);
    }

    #[test]
    fn names_are_symbols() {
        for constant in CONSTANTS.iter() {
            assert!(crate::is_variable(&constant.name), "{}", constant.name);
        }
    }

    #[test]
    fn search() {
        let table: ConstantTable = vec![("speed_of_light", 299_792_458.0), ("Planck", 6.626_070_15e-34)]
            .into_iter()
            .collect();
        let names = |query: &str| -> Vec<String> {
            table.search(query).into_iter().map(|c| c.name.clone()).collect()
        };
        assert_eq!(names("LIGHT"), vec!["speed_of_light"]);
        assert_eq!(names("planck"), vec!["Planck"]);
        assert_eq!(names("e-34"), vec!["Planck"]);
        assert_eq!(names(""), vec!["speed_of_light", "Planck"]);
        assert!(names("nothing").is_empty());
    }

    #[test]
    fn legend_line() {
        let constant = Constant {
            name: "c".into(),
            value: 299_792_458.0,
        };
        assert_eq!(constant.legend_line(), "c (c): 2.997925e+08");
    }

    #[test]
    fn duplicates_replace() {
        let table: ConstantTable = vec![("x", 1.0), ("y", 2.0), ("x", 3.0)].into_iter().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("x"), Some(3.0));
        assert_eq!(table.iter().next().map(|c| c.value), Some(3.0));
    }
}
