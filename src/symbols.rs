//! Variable memory (`V1`, `V2`, ...) and the constants formulas can refer
//! to.

use crate::constants::{ConstantTable, CONSTANTS};
use crate::error::Error;

/// Saved values, in creation order. Values are kept as the text that was
/// saved so substitution reproduces exactly what the user saw.
pub type Variables = Vec<(String, String)>;

/// The two tables read by the preprocessor: variable memory and constants
#[derive(Debug, Clone)]
pub struct SymbolTable {
    variables: Variables,
    constants: ConstantTable,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::with_constants(CONSTANTS.clone())
    }
}

impl SymbolTable {
    /// Create an empty memory backed by the physical constants table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty memory backed by a custom constants table
    pub fn with_constants(constants: ConstantTable) -> Self {
        Self {
            variables: Vec::new(),
            constants,
        }
    }

    /// Saved values, oldest first
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// The constants table substituted after the variables
    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    /// Look up a saved value by name
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Store `value` under the next free `V<n>` name and return that name.
    ///
    /// Nothing is allocated when `value` is not a number.
    ///
    /// # Examples
    /// ```
    /// # use calq::SymbolTable;
    /// let mut memory = SymbolTable::new();
    /// assert_eq!(memory.save("9.8").unwrap(), "V1");
    /// assert!(memory.save("x").is_err());
    /// assert_eq!(memory.save("4.000000").unwrap(), "V2");
    /// ```
    pub fn save(&mut self, value: &str) -> Result<String, Error> {
        let value = value.trim();
        if value.parse::<f64>().is_err() {
            return Err(Error::FormatError(value.to_string()));
        }
        let name = format!("V{}", self.variables.len() + 1);
        self.variables.push((name.clone(), value.to_string()));
        log::info!("Saved to memory: {} = {}", name, value);
        Ok(name)
    }

    /// Forget every saved value. Constants are untouched.
    pub fn clear(&mut self) {
        self.variables.clear();
        log::info!("Variable memory cleared.");
    }

    /// One `V1: 9.8` line per saved value
    pub fn memory_display(&self) -> String {
        self.variables
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
