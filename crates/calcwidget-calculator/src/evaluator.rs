//! Token buffer evaluator.
//!
//! Evaluation happens in two passes. [`partition`] glues consecutive operand
//! tokens into number strings, splitting at every single-glyph operator token.
//! [`evaluate`] then folds the resulting terms from the left, applying each
//! operator to the running result and the number that follows it.

use crate::error::EvalError;
use calcwidget_types::{OperatorKind, is_operator};
use tracing::trace;

/// One element of a partitioned buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Concatenated operand tokens, still in textual form.
    Number(String),
    /// A single operator.
    Operator(OperatorKind),
}

/// Splits a token buffer into numbers and operators, left to right.
///
/// Operand tokens are accumulated until an operator token is met, at which
/// point the run is flushed as one [`Term::Number`]. Empty runs produce no
/// term, so a leading or doubled operator shows up as adjacent operator terms.
pub fn partition<S: AsRef<str>>(tokens: &[S]) -> Vec<Term> {
    let mut terms = Vec::new();
    let mut run = String::new();

    for token in tokens {
        let token = token.as_ref();
        match operator_of(token) {
            Some(op) => {
                if !run.is_empty() {
                    terms.push(Term::Number(std::mem::take(&mut run)));
                }
                terms.push(Term::Operator(op));
            }
            None => run.push_str(token),
        }
    }

    if !run.is_empty() {
        terms.push(Term::Number(run));
    }
    terms
}

/// Evaluates a token buffer strictly left to right, with no precedence.
pub fn evaluate<S: AsRef<str>>(tokens: &[S]) -> Result<f64, EvalError> {
    let mut result: Option<f64> = None;
    let mut pending: Option<OperatorKind> = None;

    for term in partition(tokens) {
        match term {
            Term::Number(text) => {
                let value = parse_operand(&text)?;
                result = Some(match (result, pending.take()) {
                    (None, _) => value,
                    (Some(acc), Some(op)) => apply(op, acc, value)?,
                    // partition never yields two numbers in a row
                    (Some(_), None) => return Err(EvalError::InvalidOperand { text }),
                });
            }
            Term::Operator(operator) => {
                if result.is_none() {
                    return Err(EvalError::MissingOperand { operator });
                }
                if let Some(first) = pending {
                    return Err(EvalError::AdjacentOperators { first, second: operator });
                }
                pending = Some(operator);
            }
        }
    }

    if let Some(operator) = pending {
        return Err(EvalError::DanglingOperator { operator });
    }

    let value = result.ok_or(EvalError::EmptyExpression)?;
    trace!(value, "evaluated expression");
    Ok(value)
}

/// Applies one operator to the running result and the next operand.
pub fn apply(operator: OperatorKind, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    let value = match operator {
        OperatorKind::Divide => {
            if rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            lhs / rhs
        }
        OperatorKind::Multiply => lhs * rhs,
        OperatorKind::Subtract => lhs - rhs,
        OperatorKind::Add => lhs + rhs,
    };

    if value.is_finite() { Ok(value) } else { Err(EvalError::NonFinite { operator }) }
}

fn operator_of(token: &str) -> Option<OperatorKind> {
    if !is_operator(token) {
        return None;
    }
    token.chars().next().and_then(OperatorKind::from_glyph)
}

fn parse_operand(text: &str) -> Result<f64, EvalError> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(EvalError::InvalidOperand { text: text.to_string() }),
    }
}
