//! Result formatting.
//!
//! Finished results are shown fixed-point with at most
//! [`DEFAULT_FRACTION_DIGITS`] digits after the point; trailing zeros and a
//! bare trailing point are dropped. In-progress input is never reformatted.

use serde::{Deserialize, Serialize};

/// Fraction digits kept when displaying a result.
pub const DEFAULT_FRACTION_DIGITS: usize = 8;

/// Display rule for stored results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFormat {
    /// Upper bound on digits after the decimal point.
    pub max_fraction_digits: usize,
}

impl Default for ResultFormat {
    fn default() -> Self {
        Self { max_fraction_digits: DEFAULT_FRACTION_DIGITS }
    }
}

impl ResultFormat {
    /// Creates a format with the given fraction digit limit.
    pub fn new(max_fraction_digits: usize) -> Self {
        Self { max_fraction_digits }
    }

    /// Formats a stored result string. Anything that does not parse as a
    /// finite number (an error label, for instance) is returned unchanged.
    pub fn format(&self, raw: &str) -> String {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => format_number(value, self.max_fraction_digits),
            _ => raw.to_string(),
        }
    }
}

/// Fixed-point rendering with trailing zeros trimmed.
pub fn format_number(value: f64, max_fraction_digits: usize) -> String {
    let mut text = format!("{value:.max_fraction_digits$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}

/// The string stored as an instance's last result: the shortest text that
/// reads back to the same value, with negative zero folded into zero.
pub fn canonical_result(value: f64) -> String {
    if value == 0.0 { "0".to_string() } else { value.to_string() }
}
