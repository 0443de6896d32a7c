//! Error handling for the calcwidget engine
//!
//! Evaluation problems never show up here: they are reported to the user as
//! the configured error label. These errors cover the host boundary, meaning
//! undecodable button events and configuration that cannot be loaded.

use calcwidget_types::TokenError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for calcwidget host-side operations
#[derive(Error, Debug)]
pub enum CalcWidgetError {
    /// A button event could not be decoded
    #[error("Button error: {0}")]
    Button(#[from] TokenError),

    /// Configuration file could not be read
    #[error("Configuration file {path} could not be read: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::EngineConfig`]
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds an unusable value
    #[error("Configuration error: {message}")]
    Configuration { message: String, setting: Option<String> },
}

impl CalcWidgetError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            CalcWidgetError::Button(_) => "button",
            CalcWidgetError::ConfigIo { .. }
            | CalcWidgetError::ConfigParse(_)
            | CalcWidgetError::Configuration { .. } => "configuration",
        }
    }

    /// Create an invalid-setting error
    pub fn configuration(setting: &str, message: impl Into<String>) -> Self {
        CalcWidgetError::Configuration {
            message: message.into(),
            setting: Some(setting.to_string()),
        }
    }
}

/// Result alias for calcwidget host-side operations
pub type CalcWidgetResult<T> = Result<T, CalcWidgetError>;
