#![deny(warnings)]
//! Expression evaluation for calcwidget.
//!
//! A calculator instance types its expression one token at a time. This crate
//! turns such a token buffer into a number: the buffer is partitioned into
//! operands and operators, then folded strictly left to right with no operator
//! precedence, so `2 + 3 × 4` is `20`. It also owns the display format used for
//! finished results.
//!
//! Nothing here holds state; the per-instance bookkeeping lives in
//! `calcwidget-core`.

pub mod error;
pub mod evaluator;
pub mod format;

pub use error::EvalError;
pub use evaluator::{Term, apply, evaluate, partition};
pub use format::{DEFAULT_FRACTION_DIGITS, ResultFormat, canonical_result, format_number};
