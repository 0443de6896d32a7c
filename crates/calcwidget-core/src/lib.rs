#![deny(warnings)]
//! Core of the calcwidget home-screen calculator.
//!
//! Each widget instance is an independent calculator. The host delivers
//! `(InstanceId, ButtonToken)` events one at a time; the engine keeps the typed
//! expression and the last result per instance, evaluates left to right with no
//! precedence, and answers with the string to render.
//!
//! [`CalculatorEngine`] is the single-threaded engine; [`ConcurrentEngine`]
//! offers the same operations to concurrent callers with per-instance locking.

/// Engine variant for concurrent callers
pub mod concurrent;
/// Engine configuration loaded from TOML and the environment
pub mod config;
/// Single-threaded engine over all widget instances
pub mod engine;
/// Host-side error types
pub mod error;
/// Callbacks into the widget host
pub mod host;
/// Per-instance state machine
pub mod state;

pub use concurrent::ConcurrentEngine;
pub use config::EngineConfig;
pub use engine::{CalculatorEngine, InstanceSnapshot};
pub use error::{CalcWidgetError, CalcWidgetResult};
pub use host::{WidgetHost, dispatch, dispatch_glyph, refresh};
pub use state::{CopyRequest, IgnoreReason, InstanceState, Phase, PressOutcome};

pub use calcwidget_calculator::{EvalError, ResultFormat};
pub use calcwidget_types::{ButtonToken, ControlKind, InstanceId, OperatorKind, TokenError};
