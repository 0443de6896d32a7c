//! Terminal stand-in for the widget host.
//!
//! Instead of a clipboard and toast messages, callbacks are collected so the
//! command loop can print them after each batch of presses.

use calcwidget_core::{InstanceId, WidgetHost};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct TerminalHost {
    /// Most recent clipboard entry as (label, text)
    pub clipboard: Option<(String, String)>,
    /// Notifications not yet printed
    pending: Vec<String>,
    /// Last rendered display per instance
    screens: BTreeMap<InstanceId, String>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications raised since the last call
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    pub fn screen(&self, id: InstanceId) -> &str {
        self.screens.get(&id).map(String::as_str).unwrap_or("")
    }

    /// Drop the screen of an instance the user removed
    pub fn forget(&mut self, id: InstanceId) {
        self.screens.remove(&id);
    }

    pub fn screens(&self) -> impl Iterator<Item = (&InstanceId, &String)> {
        self.screens.iter()
    }
}

impl WidgetHost for TerminalHost {
    fn copy_to_clipboard(&mut self, label: &str, text: &str) {
        self.pending.push(format!("[clipboard:{label}] {text}"));
        self.clipboard = Some((label.to_string(), text.to_string()));
    }

    fn notify(&mut self, message: &str) {
        self.pending.push(format!("({message})"));
    }

    fn render(&mut self, id: InstanceId, display: &str) {
        self.screens.insert(id, display.to_string());
    }
}
