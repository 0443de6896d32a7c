//! Host contract
//!
//! The widget host owns rendering, the clipboard and notifications. The engine
//! only tells it what to do through [`WidgetHost`]; [`dispatch`] runs one
//! button event through the engine and then drives the callbacks in the order
//! the widget expects: state change, copy-out, re-render of every instance.

use crate::engine::CalculatorEngine;
use crate::error::CalcWidgetResult;
use crate::state::PressOutcome;
use calcwidget_types::{ButtonToken, InstanceId};

/// Callbacks the engine needs from whatever hosts the widgets
pub trait WidgetHost {
    /// Place text on the system clipboard under the given label
    fn copy_to_clipboard(&mut self, label: &str, text: &str);

    /// Show a short-lived message to the user
    fn notify(&mut self, message: &str);

    /// Show the display string of one instance
    fn render(&mut self, id: InstanceId, display: &str);
}

/// Deliver one button event and run the host callbacks it triggers
pub fn dispatch<H: WidgetHost + ?Sized>(
    engine: &mut CalculatorEngine,
    host: &mut H,
    id: InstanceId,
    token: ButtonToken,
) -> PressOutcome {
    let outcome = engine.press(id, token);
    if let PressOutcome::CopyRequested(request) = &outcome {
        host.copy_to_clipboard(&request.label, &request.text);
        host.notify(&request.confirmation);
    }
    refresh(engine, host);
    outcome
}

/// Like [`dispatch`], for a raw glyph taken from a host event
pub fn dispatch_glyph<H: WidgetHost + ?Sized>(
    engine: &mut CalculatorEngine,
    host: &mut H,
    id: InstanceId,
    glyph: char,
) -> CalcWidgetResult<PressOutcome> {
    let token = ButtonToken::from_glyph(glyph)?;
    Ok(dispatch(engine, host, id, token))
}

/// Re-render every known instance
pub fn refresh<H: WidgetHost + ?Sized>(engine: &CalculatorEngine, host: &mut H) {
    for id in engine.instance_ids() {
        host.render(id, &engine.display(id));
    }
}
