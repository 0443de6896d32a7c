use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of one widget instance, as assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(
    /// Raw widget id.
    pub i32,
);

impl From<i32> for InstanceId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised while turning host input into a [`ButtonToken`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The host delivered a character that is not on the keypad.
    #[error("unknown button glyph {0:?}")]
    UnknownGlyph(char),

    /// A textual button name did not match any glyph or alias.
    #[error("unknown button '{0}'")]
    UnknownButton(String),

    /// A digit value above nine.
    #[error("digit {0} is out of range")]
    DigitOutOfRange(u8),
}

/// The four arithmetic operators on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    /// `÷`
    Divide,
    /// `×`
    Multiply,
    /// `−` (U+2212, not the ASCII hyphen)
    Subtract,
    /// `+`
    Add,
}

impl OperatorKind {
    /// All operators in keypad order.
    pub const ALL: [OperatorKind; 4] =
        [OperatorKind::Divide, OperatorKind::Multiply, OperatorKind::Subtract, OperatorKind::Add];

    /// The glyph the keypad shows and the input buffer stores.
    pub const fn glyph(self) -> char {
        match self {
            OperatorKind::Divide => '\u{00F7}',
            OperatorKind::Multiply => '\u{00D7}',
            OperatorKind::Subtract => '\u{2212}',
            OperatorKind::Add => '\u{002B}',
        }
    }

    /// Looks up an operator by its keypad glyph.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.glyph() == glyph)
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Keypad buttons that act on the expression instead of extending it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// Evaluate the buffer.
    Equals,
    /// Drop the last token.
    Delete,
    /// Reset the buffer and forget the last result.
    Clear,
    /// Copy the last result out to the host clipboard.
    Input,
}

impl ControlKind {
    /// All controls in keypad order.
    pub const ALL: [ControlKind; 4] =
        [ControlKind::Equals, ControlKind::Delete, ControlKind::Clear, ControlKind::Input];

    /// Character the host uses to encode this control in a button event.
    pub const fn glyph(self) -> char {
        match self {
            ControlKind::Equals => '\u{003D}',
            ControlKind::Delete => '\u{007F}',
            ControlKind::Clear => '\u{239A}',
            ControlKind::Input => '\u{2402}',
        }
    }

    /// Short printable name, used in logs and as a command-line alias.
    pub const fn name(self) -> &'static str {
        match self {
            ControlKind::Equals => "=",
            ControlKind::Delete => "del",
            ControlKind::Clear => "clear",
            ControlKind::Input => "copy",
        }
    }

    /// Looks up a control by its event glyph.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|control| control.glyph() == glyph)
    }
}

/// A single classified button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonToken {
    /// `0`-`9`, holding the digit value.
    Digit(u8),
    /// The decimal point.
    Dot,
    /// An arithmetic operator.
    Operator(OperatorKind),
    /// A control action.
    Control(ControlKind),
}

impl ButtonToken {
    /// Glyph of the decimal point button.
    pub const DOT_GLYPH: char = '.';

    /// Builds a digit token, rejecting values above nine.
    pub fn digit(value: u8) -> Result<Self, TokenError> {
        if value > 9 {
            return Err(TokenError::DigitOutOfRange(value));
        }
        Ok(ButtonToken::Digit(value))
    }

    /// Classifies a host glyph. This is the only place characters are
    /// compared against the keypad layout.
    pub fn from_glyph(glyph: char) -> Result<Self, TokenError> {
        if let Some(value) = glyph.to_digit(10) {
            return Ok(ButtonToken::Digit(value as u8));
        }
        if glyph == Self::DOT_GLYPH {
            return Ok(ButtonToken::Dot);
        }
        if let Some(op) = OperatorKind::from_glyph(glyph) {
            return Ok(ButtonToken::Operator(op));
        }
        if let Some(control) = ControlKind::from_glyph(glyph) {
            return Ok(ButtonToken::Control(control));
        }
        Err(TokenError::UnknownGlyph(glyph))
    }

    /// The glyph a host would put in the event for this button.
    pub fn glyph(self) -> char {
        match self {
            // values above nine have no glyph; the engine ignores such presses
            ButtonToken::Digit(value) => {
                char::from_digit(u32::from(value), 10).unwrap_or(char::REPLACEMENT_CHARACTER)
            }
            ButtonToken::Dot => Self::DOT_GLYPH,
            ButtonToken::Operator(op) => op.glyph(),
            ButtonToken::Control(control) => control.glyph(),
        }
    }

    /// False only for a `Digit` above nine, which `from_glyph` and `digit`
    /// never produce but a hand-built or deserialized token can carry.
    pub fn is_valid(self) -> bool {
        !matches!(self, ButtonToken::Digit(value) if value > 9)
    }

    /// Digits and the decimal point extend the current operand.
    pub fn is_operand(self) -> bool {
        matches!(self, ButtonToken::Digit(_) | ButtonToken::Dot)
    }
}

impl fmt::Display for ButtonToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonToken::Control(control) => f.write_str(control.name()),
            other => write!(f, "{}", other.glyph()),
        }
    }
}

impl FromStr for ButtonToken {
    type Err = TokenError;

    /// Accepts a keypad glyph or one of the ASCII aliases used on the
    /// command line (`*`, `x`, `/`, `-`, `del`, `clear`, `copy`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alias = match s.to_ascii_lowercase().as_str() {
            "*" | "x" => Some(ButtonToken::Operator(OperatorKind::Multiply)),
            "/" => Some(ButtonToken::Operator(OperatorKind::Divide)),
            "-" => Some(ButtonToken::Operator(OperatorKind::Subtract)),
            "eq" | "equals" => Some(ButtonToken::Control(ControlKind::Equals)),
            "del" | "delete" | "back" => Some(ButtonToken::Control(ControlKind::Delete)),
            "c" | "clear" => Some(ButtonToken::Control(ControlKind::Clear)),
            "copy" | "input" => Some(ButtonToken::Control(ControlKind::Input)),
            _ => None,
        };
        if let Some(token) = alias {
            return Ok(token);
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(glyph), None) => Self::from_glyph(glyph),
            _ => Err(TokenError::UnknownButton(s.to_string())),
        }
    }
}

/// True iff a buffer token is exactly one operator glyph. Multi-character
/// tokens (a carried-over result such as `-3` or `0.5`) are always operands.
pub fn is_operator(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(glyph), None) => OperatorKind::from_glyph(glyph).is_some(),
        _ => false,
    }
}
