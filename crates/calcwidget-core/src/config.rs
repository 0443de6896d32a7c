use crate::error::{CalcWidgetError, CalcWidgetResult};
use calcwidget_calculator::{DEFAULT_FRACTION_DIGITS, ResultFormat};
use calcwidget_types::{ButtonToken, is_operator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CALCWIDGET_CONFIG_PATH";
/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "calcwidget.toml";

/// Replaced with the copied text in [`EngineConfig::copy_confirmation`].
pub const RESULT_PLACEHOLDER: &str = "{result}";

// f64 carries at most 17 significant decimal digits
const MAX_FRACTION_DIGITS_LIMIT: usize = 17;

/// Engine settings. Every field is optional in the TOML file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Digits kept after the decimal point when showing a result.
    pub max_fraction_digits: usize,
    /// Stored and shown in place of a result when evaluation fails.
    pub error_label: String,
    /// Label attached to clipboard entries.
    pub copy_label: String,
    /// Transient message shown after a copy. `{result}` is replaced with the
    /// copied text.
    pub copy_confirmation: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_fraction_digits: DEFAULT_FRACTION_DIGITS,
            error_label: "undefined".to_string(),
            copy_label: "result".to_string(),
            copy_confirmation: format!("Copied {RESULT_PLACEHOLDER}"),
        }
    }
}

impl EngineConfig {
    /// Loads the file named by `CALCWIDGET_CONFIG_PATH` (or `calcwidget.toml`)
    /// and applies environment overrides. A missing file means defaults.
    pub fn load() -> CalcWidgetResult<Self> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    /// Like [`EngineConfig::load`] with an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> CalcWidgetResult<Self> {
        let path = path.as_ref();
        let config = match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents)?,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                warn!(
                    "Configuration file '{}' not found. Using default configuration.",
                    path.display()
                );
                Self::default()
            }
            Err(source) => {
                return Err(CalcWidgetError::ConfigIo { path: path.to_path_buf(), source });
            }
        };

        let config = config.apply_env_overrides();
        config.validate()?;
        info!(
            max_fraction_digits = config.max_fraction_digits,
            error_label = %config.error_label,
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> CalcWidgetResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `CALCWIDGET_*` environment variable overrides.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(digits) = std::env::var("CALCWIDGET_MAX_FRACTION_DIGITS") {
            match digits.parse::<usize>() {
                Ok(digits) => self.max_fraction_digits = digits,
                Err(_) => warn!(value = %digits, "Ignoring non-numeric CALCWIDGET_MAX_FRACTION_DIGITS"),
            }
        }
        if let Ok(label) = std::env::var("CALCWIDGET_ERROR_LABEL") {
            self.error_label = label;
        }
        if let Ok(label) = std::env::var("CALCWIDGET_COPY_LABEL") {
            self.copy_label = label;
        }
        if let Ok(message) = std::env::var("CALCWIDGET_COPY_CONFIRMATION") {
            self.copy_confirmation = message;
        }
        self
    }

    /// Rejects settings the engine cannot honor.
    pub fn validate(&self) -> CalcWidgetResult<()> {
        if self.max_fraction_digits > MAX_FRACTION_DIGITS_LIMIT {
            return Err(CalcWidgetError::configuration(
                "max_fraction_digits",
                format!(
                    "{} exceeds the {MAX_FRACTION_DIGITS_LIMIT} digits an f64 can carry",
                    self.max_fraction_digits
                ),
            ));
        }
        if self.error_label.trim().is_empty() {
            return Err(CalcWidgetError::configuration("error_label", "must not be blank"));
        }
        // a numeric label would be indistinguishable from a real result
        if self.error_label.trim().parse::<f64>().is_ok_and(f64::is_finite) {
            return Err(CalcWidgetError::configuration(
                "error_label",
                format!("'{}' reads as a number", self.error_label),
            ));
        }
        // the label becomes the first operand when an operator follows a failure
        if is_operator(&self.error_label) {
            return Err(CalcWidgetError::configuration(
                "error_label",
                format!("'{}' is an operator glyph", self.error_label),
            ));
        }
        if self.error_label.contains(ButtonToken::DOT_GLYPH) {
            return Err(CalcWidgetError::configuration(
                "error_label",
                "must not contain a decimal point",
            ));
        }
        Ok(())
    }

    /// Display rule for stored results.
    pub fn result_format(&self) -> ResultFormat {
        ResultFormat::new(self.max_fraction_digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn defaults_match_the_widget() {
        let config = EngineConfig::default();
        assert_eq!(config.max_fraction_digits, 8);
        assert_eq!(config.error_label, "undefined");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = EngineConfig::from_toml_str("max_fraction_digits = 4\n").unwrap();
        assert_eq!(config.max_fraction_digits, 4);
        assert_eq!(config.copy_label, "result");
    }

    #[test]
    fn numeric_error_label_is_rejected() {
        let err = EngineConfig::from_toml_str("error_label = \"0\"\n").unwrap_err();
        assert_eq!(err.category(), "configuration");
    }

    #[test]
    fn operator_error_label_is_rejected() {
        for label in ["+", "×", "÷", "\u{2212}"] {
            let config = EngineConfig { error_label: label.to_string(), ..EngineConfig::default() };
            match config.validate().unwrap_err() {
                CalcWidgetError::Configuration { setting, .. } => {
                    assert_eq!(setting.as_deref(), Some("error_label"))
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn dotted_error_label_is_rejected() {
        let err = EngineConfig::from_toml_str("error_label = \"n.a.\"\n").unwrap_err();
        assert_eq!(err.category(), "configuration");

        let config = EngineConfig { error_label: ".".to_string(), ..EngineConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn word_labels_with_operator_characters_are_accepted() {
        let config = EngineConfig { error_label: "n/a+".to_string(), ..EngineConfig::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_fraction_digits_are_rejected() {
        assert!(EngineConfig::from_toml_str("max_fraction_digits = 40\n").is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("max_fraction_digits = \"lots\"").unwrap_err();
        assert!(matches!(err, CalcWidgetError::ConfigParse(_)));
    }

    #[test]
    #[serial]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    #[serial]
    fn file_then_environment_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "error_label = \"Error\"\nmax_fraction_digits = 3").unwrap();

        unsafe { std::env::set_var("CALCWIDGET_MAX_FRACTION_DIGITS", "5") };
        let config = EngineConfig::load_from(file.path());
        unsafe { std::env::remove_var("CALCWIDGET_MAX_FRACTION_DIGITS") };

        let config = config.unwrap();
        assert_eq!(config.error_label, "Error");
        assert_eq!(config.max_fraction_digits, 5);
    }

    #[test]
    #[serial]
    fn config_path_comes_from_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "copy_label = \"calc\"").unwrap();

        unsafe { std::env::set_var(CONFIG_PATH_ENV, file.path()) };
        let config = EngineConfig::load();
        unsafe { std::env::remove_var(CONFIG_PATH_ENV) };

        assert_eq!(config.unwrap().copy_label, "calc");
    }
}
