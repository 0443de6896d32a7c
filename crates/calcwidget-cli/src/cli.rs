//! Command-line definition and button argument parsing.

use calcwidget_core::{ButtonToken, InstanceId, TokenError};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Drive calcwidget calculator instances from the terminal
#[derive(Parser, Debug)]
#[command(name = "calcwidget")]
#[command(about = "Home-screen calculator engine, driven from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to $CALCWIDGET_CONFIG_PATH or calcwidget.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Press a sequence of buttons on one instance and print the display
    Run {
        /// Widget instance to press on
        #[arg(short, long, default_value_t = 1)]
        instance: i32,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Buttons: glyphs such as `12+3=`, or names such as `del`, `clear`, `copy`
        #[arg(required = true, allow_hyphen_values = true)]
        buttons: Vec<String>,
    },

    /// Read button lines from stdin, one event batch per line
    Repl {
        /// Instance the session starts on
        #[arg(short, long, default_value_t = 1)]
        instance: i32,
    },

    /// Describe the calculator's behavior
    Explain,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Command {
    pub fn instance(&self) -> Option<InstanceId> {
        match self {
            Command::Run { instance, .. } | Command::Repl { instance } => {
                Some(InstanceId(*instance))
            }
            Command::Explain => None,
        }
    }
}

/// Turns command-line words into button presses.
///
/// A word that names a single button (`del`, `*`, `÷`) is one press; any other
/// word is read one character at a time, so `12+3=` is five presses.
pub fn parse_buttons<S: AsRef<str>>(words: &[S]) -> Result<Vec<ButtonToken>, TokenError> {
    let mut tokens = Vec::new();
    for word in words {
        let word = word.as_ref();
        if let Ok(token) = word.parse::<ButtonToken>() {
            tokens.push(token);
            continue;
        }
        for glyph in word.chars() {
            let mut buf = [0u8; 4];
            let token = glyph
                .encode_utf8(&mut buf)
                .parse::<ButtonToken>()
                .map_err(|_| TokenError::UnknownButton(word.to_string()))?;
            tokens.push(token);
        }
    }
    Ok(tokens)
}
