//! Per-instance calculator state and the button-event rules.
//!
//! An [`InstanceState`] is the input buffer plus the last result of one widget.
//! Every press goes through [`InstanceState::press`], which either applies the
//! button or reports why it was ignored. The two buffer invariants hold after
//! every press: no two operator tokens are adjacent, and no operand run holds
//! more than one decimal point.

use crate::config::{EngineConfig, RESULT_PLACEHOLDER};
use calcwidget_calculator::{EvalError, ResultFormat, canonical_result, evaluate};
use calcwidget_types::{ButtonToken, ControlKind, OperatorKind, is_operator};
use serde::{Deserialize, Serialize};

/// Why a press left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Operator pressed on an empty buffer with no result to continue from.
    OperatorWithoutOperand,
    /// Operator pressed right after another operator.
    ConsecutiveOperator,
    /// The current number already has a decimal point.
    SecondDecimalPoint,
    /// Delete pressed on an empty buffer.
    NothingToDelete,
    /// Equals pressed on an empty buffer.
    NothingToEvaluate,
    /// Copy pressed before any result exists.
    NoResultToCopy,
    /// A digit token whose value is above nine.
    DigitOutOfRange,
}

/// What the host should place on the clipboard after a copy press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRequest {
    /// Clipboard entry label.
    pub label: String,
    /// The stored result, unformatted.
    pub text: String,
    /// Transient confirmation to show the user.
    pub confirmation: String,
}

/// Result of applying one button press.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PressOutcome {
    /// A digit, dot or operator was appended.
    Appended { token: String },
    /// Operator pressed after a result; the result became the first operand.
    Continued { result: String, operator: OperatorKind },
    /// The last token was removed.
    Removed { token: String },
    /// Buffer and result were reset.
    Cleared,
    /// The buffer evaluated to a number, now stored as the last result.
    Evaluated { result: String },
    /// Evaluation failed; the error label is stored as the last result.
    Failed { error: EvalError, label: String },
    /// The last result should be copied out by the host.
    CopyRequested(CopyRequest),
    /// The press was a no-op.
    Ignored { reason: IgnoreReason },
}

impl PressOutcome {
    /// True when the press changed the instance's state.
    pub fn changed_state(&self) -> bool {
        !matches!(self, PressOutcome::Ignored { .. } | PressOutcome::CopyRequested(_))
    }

    fn ignored(reason: IgnoreReason) -> Self {
        PressOutcome::Ignored { reason }
    }
}

/// Coarse state of an instance, derived from its buffer and result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing typed, no result.
    Empty,
    /// An expression is being typed.
    Accumulating,
    /// Buffer empty, a result is shown.
    HasResult,
}

/// Input buffer and last result of a single widget instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceState {
    buffer: Vec<String>,
    last_result: Option<String>,
}

impl InstanceState {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens typed so far, left to right.
    pub fn buffer(&self) -> &[String] {
        &self.buffer
    }

    /// Most recent result, if any.
    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> Phase {
        match (self.buffer.is_empty(), &self.last_result) {
            (false, _) => Phase::Accumulating,
            (true, Some(_)) => Phase::HasResult,
            (true, None) => Phase::Empty,
        }
    }

    /// Applies one button press.
    pub fn press(&mut self, token: ButtonToken, config: &EngineConfig) -> PressOutcome {
        match token {
            _ if !token.is_valid() => PressOutcome::ignored(IgnoreReason::DigitOutOfRange),
            ButtonToken::Digit(_) => self.append(token.glyph().to_string()),
            ButtonToken::Dot => {
                if self.trailing_run_has_dot() {
                    PressOutcome::ignored(IgnoreReason::SecondDecimalPoint)
                } else {
                    self.append(token.glyph().to_string())
                }
            }
            ButtonToken::Operator(operator) => self.push_operator(operator),
            ButtonToken::Control(ControlKind::Delete) => self.delete(),
            ButtonToken::Control(ControlKind::Clear) => self.clear(),
            ButtonToken::Control(ControlKind::Equals) => self.equals(config),
            ButtonToken::Control(ControlKind::Input) => self.copy(config),
        }
    }

    /// Text to show: the raw buffer while typing, otherwise the formatted
    /// last result, otherwise nothing.
    pub fn display(&self, format: &ResultFormat) -> String {
        if !self.buffer.is_empty() {
            return self.buffer.concat();
        }
        match &self.last_result {
            Some(result) => format.format(result),
            None => String::new(),
        }
    }

    fn append(&mut self, token: String) -> PressOutcome {
        self.buffer.push(token.clone());
        PressOutcome::Appended { token }
    }

    fn push_operator(&mut self, operator: OperatorKind) -> PressOutcome {
        if self.buffer.is_empty() {
            return match self.last_result.take() {
                Some(result) if !result.trim().is_empty() => {
                    self.buffer.push(result.clone());
                    self.buffer.push(operator.glyph().to_string());
                    PressOutcome::Continued { result, operator }
                }
                blank => {
                    self.last_result = blank;
                    PressOutcome::ignored(IgnoreReason::OperatorWithoutOperand)
                }
            };
        }

        if self.buffer.last().is_some_and(|last| is_operator(last)) {
            return PressOutcome::ignored(IgnoreReason::ConsecutiveOperator);
        }
        self.append(operator.glyph().to_string())
    }

    fn trailing_run_has_dot(&self) -> bool {
        self.buffer
            .iter()
            .rev()
            .take_while(|token| !is_operator(token))
            .any(|token| token.contains(ButtonToken::DOT_GLYPH))
    }

    fn delete(&mut self) -> PressOutcome {
        match self.buffer.pop() {
            Some(token) => PressOutcome::Removed { token },
            None => PressOutcome::ignored(IgnoreReason::NothingToDelete),
        }
    }

    fn clear(&mut self) -> PressOutcome {
        self.buffer.clear();
        self.last_result = None;
        PressOutcome::Cleared
    }

    fn equals(&mut self, config: &EngineConfig) -> PressOutcome {
        if self.buffer.is_empty() {
            return PressOutcome::ignored(IgnoreReason::NothingToEvaluate);
        }

        let outcome = match evaluate(&self.buffer) {
            Ok(value) => {
                let result = canonical_result(value);
                self.last_result = Some(result.clone());
                PressOutcome::Evaluated { result }
            }
            Err(error) => {
                let label = config.error_label.clone();
                self.last_result = Some(label.clone());
                PressOutcome::Failed { error, label }
            }
        };
        self.buffer.clear();
        outcome
    }

    fn copy(&self, config: &EngineConfig) -> PressOutcome {
        match &self.last_result {
            Some(result) => PressOutcome::CopyRequested(CopyRequest {
                label: config.copy_label.clone(),
                text: result.clone(),
                confirmation: config.copy_confirmation.replace(RESULT_PLACEHOLDER, result),
            }),
            None => PressOutcome::ignored(IgnoreReason::NoResultToCopy),
        }
    }
}
