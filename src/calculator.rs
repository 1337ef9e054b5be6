use crate::error::Error;
use crate::format::last_value;
use crate::settings::Settings;
use crate::symbols::SymbolTable;

/// Text shown after the variable memory is cleared
pub const MEMORY_CLEARED: &str = "Variable memory cleared.";

/// A calculator session: variable memory, settings and the last displayed
/// result.
///
/// Mutating operations take `&mut self`; share a session between threads
/// by wrapping it in a `Mutex`.
///
/// # Examples
/// ```
/// # use calq::{Calculator, Settings};
/// let mut calculator = Calculator::new(Settings::new(2).unwrap());
/// assert_eq!(calculator.solve("x^2 = 4"), "x = -2.00, 2.00");
///
/// calculator.solve("3 + 1");
/// assert_eq!(calculator.save_to_memory().unwrap(), "V1");
/// assert_eq!(calculator.solve("\\V1 * 2"), "a = 8.00");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    symbols: SymbolTable,
    settings: Settings,
    display: String,
}

impl Calculator {
    /// A session with empty memory and the physical constants
    pub fn new(settings: Settings) -> Self {
        Self::with_symbols(SymbolTable::new(), settings)
    }

    /// A session over an existing memory
    pub fn with_symbols(symbols: SymbolTable, settings: Settings) -> Self {
        Self {
            symbols,
            settings,
            display: String::new(),
        }
    }

    /// Solve `raw` and display the result, or `Error: <message>`. Returns
    /// the displayed text.
    pub fn solve(&mut self, raw: &str) -> &str {
        self.display = match self.evaluate(raw) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("Solving {:?} failed: {}", raw, err);
                format!("Error: {}", err)
            }
        };
        &self.display
    }

    /// Run the whole pipeline on `raw` without touching the display
    pub fn evaluate(&self, raw: &str) -> Result<String, Error> {
        crate::solve(raw, &self.symbols, self.settings.decimal_places())
    }

    /// Save the value shown on the first line of the display under a new
    /// `V<n>` name. Memory is left untouched on failure.
    pub fn save_to_memory(&mut self) -> Result<String, Error> {
        let value = last_value(&self.display)?;
        self.symbols.save(value)
    }

    /// Forget every saved value
    pub fn clear_memory(&mut self) {
        self.symbols.clear();
        self.display = MEMORY_CLEARED.to_string();
    }

    /// One `V1: 9.8` line per saved value
    pub fn memory_display(&self) -> String {
        self.symbols.memory_display()
    }

    /// The last displayed text
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Variable memory and constants
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings, for changing the precision
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}
