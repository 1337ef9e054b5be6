use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Precision used when no settings file says otherwise
pub const DEFAULT_DECIMAL_PLACES: u8 = 6;
/// Highest accepted precision
pub const MAX_DECIMAL_PLACES: u8 = 10;

/// User preferences, stored as TOML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Digits after the decimal point in displayed roots
    #[serde(default = "default_decimal_places")]
    decimal_places: u8,
}

fn default_decimal_places() -> u8 {
    DEFAULT_DECIMAL_PLACES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl Settings {
    /// Settings with the given precision, which must be at most
    /// [`MAX_DECIMAL_PLACES`].
    ///
    /// # Examples
    /// ```
    /// # use calq::Settings;
    /// assert_eq!(Settings::new(2).unwrap().decimal_places(), 2);
    /// assert!(Settings::new(11).is_err());
    /// ```
    pub fn new(decimal_places: u8) -> Result<Self, Error> {
        let settings = Self { decimal_places };
        settings.validate()?;
        Ok(settings)
    }

    /// Digits shown after the decimal point
    pub fn decimal_places(&self) -> u8 {
        self.decimal_places
    }

    /// Change the precision, rejecting values above [`MAX_DECIMAL_PLACES`]
    pub fn set_decimal_places(&mut self, decimal_places: u8) -> Result<(), Error> {
        *self = Self::new(decimal_places)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), Error> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(Error::Settings(format!(
                "decimal_places must be between 0 and {}, got {}",
                MAX_DECIMAL_PLACES, self.decimal_places
            )));
        }
        Ok(())
    }

    /// Read and validate the settings stored at `path`
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Settings(format!("cannot read {}: {}", path.display(), e)))?;
        let settings: Self = toml::from_str(&content)
            .map_err(|e| Error::Settings(format!("cannot parse {}: {}", path.display(), e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Settings from `path`, or the defaults when the file is missing or
    /// unusable
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{}. Using defaults.", err);
                Self::default()
            }
        }
    }

    /// Write the settings to `path` as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Settings(format!("cannot serialize settings: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| Error::Settings(format!("cannot write {}: {}", path.display(), e)))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn defaults() {
        assert_eq!(Settings::default().decimal_places(), 6);
    }

    #[test_case(0 => true ; "lower bound")]
    #[test_case(10 => true ; "upper bound")]
    #[test_case(11 => false ; "above range")]
    fn range(places: u8) -> bool {
        Settings::new(places).is_ok()
    }

    #[test]
    fn rejected_update_keeps_value() {
        let mut settings = Settings::new(3).unwrap();
        assert!(settings.set_decimal_places(42).is_err());
        assert_eq!(settings.decimal_places(), 3);
        settings.set_decimal_places(0).unwrap();
        assert_eq!(settings.decimal_places(), 0);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calq.toml");
        let settings = Settings::new(2).unwrap();
        settings.save_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "decimal_places = 2");
        assert_eq!(Settings::load_from_file(&path).unwrap(), settings);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Settings::load_from_file(&path).is_err());
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn missing_key_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calq.toml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(Settings::load_from_file(&path).unwrap(), Settings::default());
    }

    #[test_case("decimal_places = 12" ; "out of range")]
    #[test_case("decimal_places = -1" ; "negative")]
    #[test_case("decimal_places = \"six\"" ; "wrong type")]
    #[test_case("decimal_places = " ; "invalid toml")]
    fn invalid_files(content: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calq.toml");
        std::fs::write(&path, content).unwrap();
        assert!(matches!(Settings::load_from_file(&path), Err(Error::Settings(_))));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
