use thiserror::Error;

/// Error type for the calq crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A value being saved to memory is not a valid number
    #[error("Unable to save. Make sure the result is a number (got '{0}').")]
    FormatError(String),
    /// The formula does not contain exactly one `=`
    #[error("FormulaSyntaxError: expected exactly one '=' in the formula, found {0}")]
    FormulaSyntaxError(usize),
    /// Error while parsing one side of an equation
    #[error("ParseError: {0}")]
    ParseError(String),
    /// Unknown variable during evaluation
    #[error("NameError: {0}")]
    NameError(String),
    /// A root could not be turned into a real, finite number
    #[error("NumericEvaluationError: cannot evaluate {symbol} = {root} as a real number ({reason})")]
    NumericEvaluationError {
        /// The symbol being solved for
        symbol: String,
        /// The root expression, as far as it could be simplified
        root: String,
        /// What went wrong
        reason: String,
    },
    /// None of the solving strategies applies to this symbol
    #[error("unable to solve for {0}")]
    Unsolvable(String),
    /// Save requested while no result is displayed
    #[error("No solution to save!")]
    NothingToSave,
    /// Save requested on a result that has no `name = value` shape
    #[error("Invalid solution format. Unable to save.")]
    InvalidSaveFormat,
    /// Loading or storing the settings failed
    #[error("settings: {0}")]
    Settings(String),
}

impl Error {
    /// Build a `ParseError` with a formatted message
    pub(crate) fn parse<S: Into<String>>(message: S) -> Self {
        Self::ParseError(message.into())
    }
}
