use crate::config::EngineConfig;
use crate::error::CalcWidgetResult;
use crate::state::{InstanceState, Phase, PressOutcome};
use calcwidget_calculator::ResultFormat;
use calcwidget_types::{ButtonToken, InstanceId};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace, warn};

/// Point-in-time view of one instance, for hosts and transcripts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceSnapshot {
    pub id: InstanceId,
    pub phase: Phase,
    pub buffer: Vec<String>,
    pub last_result: Option<String>,
    pub display: String,
}

impl InstanceSnapshot {
    pub(crate) fn capture(id: InstanceId, state: &InstanceState, format: &ResultFormat) -> Self {
        Self {
            id,
            phase: state.phase(),
            buffer: state.buffer().to_vec(),
            last_result: state.last_result().map(str::to_string),
            display: state.display(format),
        }
    }
}

/// Single-threaded calculator engine owning the state of every widget instance.
#[derive(Debug, Default)]
pub struct CalculatorEngine {
    instances: HashMap<InstanceId, InstanceState>,
    config: EngineConfig,
    format: ResultFormat,
}

impl CalculatorEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a validated configuration
    #[instrument(skip(config))]
    pub fn with_config(config: EngineConfig) -> CalcWidgetResult<Self> {
        config.validate()?;
        info!(max_fraction_digits = config.max_fraction_digits, "Creating calculator engine");
        let format = config.result_format();
        Ok(Self { instances: HashMap::new(), config, format })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply one button press to an instance, creating the instance on first use
    #[instrument(skip(self), fields(instance = %id, button = %token))]
    pub fn press(&mut self, id: InstanceId, token: ButtonToken) -> PressOutcome {
        let state = self.instances.entry(id).or_default();
        let outcome = state.press(token, &self.config);
        log_outcome(&outcome);
        outcome
    }

    /// Decode a raw host glyph and apply it
    pub fn press_glyph(&mut self, id: InstanceId, glyph: char) -> CalcWidgetResult<PressOutcome> {
        let token = ButtonToken::from_glyph(glyph)?;
        Ok(self.press(id, token))
    }

    /// Text the host should render for an instance
    pub fn display(&self, id: InstanceId) -> String {
        self.instances.get(&id).map(|state| state.display(&self.format)).unwrap_or_default()
    }

    pub fn state(&self, id: InstanceId) -> Option<&InstanceState> {
        self.instances.get(&id)
    }

    pub fn snapshot(&self, id: InstanceId) -> InstanceSnapshot {
        match self.instances.get(&id) {
            Some(state) => InstanceSnapshot::capture(id, state, &self.format),
            None => InstanceSnapshot::capture(id, &InstanceState::new(), &self.format),
        }
    }

    /// Register an instance the host has just laid out
    pub fn ensure_instance(&mut self, id: InstanceId) {
        self.instances.entry(id).or_default();
    }

    /// Forget an instance the host has deleted. Returns whether it was known.
    #[instrument(skip(self), fields(instance = %id))]
    pub fn remove_instance(&mut self, id: InstanceId) -> bool {
        let removed = self.instances.remove(&id).is_some();
        debug!(removed, "Removing widget instance");
        removed
    }

    pub fn remove_instances(&mut self, ids: impl IntoIterator<Item = InstanceId>) {
        for id in ids {
            self.remove_instance(id);
        }
    }

    /// Known instance ids in ascending order
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<_> = self.instances.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

pub(crate) fn log_outcome(outcome: &PressOutcome) {
    match outcome {
        PressOutcome::Ignored { reason } => trace!(?reason, "Ignored button press"),
        PressOutcome::Failed { error, label } => {
            warn!(%error, %label, "Evaluation failed")
        }
        PressOutcome::Evaluated { result } => debug!(%result, "Evaluated expression"),
        other => debug!(outcome = ?other, "Applied button press"),
    }
}
