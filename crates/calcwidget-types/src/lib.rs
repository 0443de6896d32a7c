//! Calcwidget Types
//!
//! This crate defines the vocabulary shared by the calcwidget crates: widget
//! instance identifiers and the button tokens a host delivers to the engine.
//! Every host glyph is classified exactly once, by [`ButtonToken::from_glyph`],
//! so the rest of the workspace matches on variants instead of characters.

#![deny(warnings)]
#![deny(missing_docs)]

mod types;
pub use types::{ButtonToken, ControlKind, InstanceId, OperatorKind, TokenError, is_operator};
