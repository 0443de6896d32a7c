//! Evaluation failures.
//!
//! None of these escape the engine as a panic: a failed evaluation is stored
//! as the configured error label and shown to the user in place of a number.

use calcwidget_types::OperatorKind;
use serde::Serialize;
use thiserror::Error;

/// Why a token buffer could not be reduced to a finite number.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvalError {
    /// The buffer held no tokens.
    #[error("nothing to evaluate")]
    EmptyExpression,

    /// Right-hand operand of `÷` was zero.
    #[error("division by zero")]
    DivisionByZero,

    /// An operation produced infinity or NaN.
    #[error("result of {operator} is not a finite number")]
    NonFinite { operator: OperatorKind },

    /// An operand run did not parse as a decimal number, e.g. a lone `.`.
    #[error("'{text}' is not a number")]
    InvalidOperand { text: String },

    /// The expression ended on an operator.
    #[error("operator {operator} has no right-hand operand")]
    DanglingOperator { operator: OperatorKind },

    /// An operator appeared with nothing to its left.
    #[error("operator {operator} has no left-hand operand")]
    MissingOperand { operator: OperatorKind },

    /// Two operators with no operand between them.
    #[error("operators {first} and {second} are adjacent")]
    AdjacentOperators { first: OperatorKind, second: OperatorKind },
}
