//! Engine variant for concurrent callers
//!
//! Each instance sits behind its own mutex inside a `DashMap`, so presses for
//! one instance are applied one at a time in arrival order while different
//! instances proceed in parallel. The map shard lock is only held long enough
//! to clone the instance handle.

use crate::config::EngineConfig;
use crate::engine::{InstanceSnapshot, log_outcome};
use crate::error::CalcWidgetResult;
use crate::state::{InstanceState, PressOutcome};
use calcwidget_calculator::ResultFormat;
use calcwidget_types::{ButtonToken, InstanceId};
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument};

type InstanceSlot = Arc<Mutex<InstanceState>>;

/// Thread-safe calculator engine with per-instance locking
#[derive(Debug, Default)]
pub struct ConcurrentEngine {
    instances: DashMap<InstanceId, InstanceSlot>,
    config: EngineConfig,
    format: ResultFormat,
}

impl ConcurrentEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> CalcWidgetResult<Self> {
        config.validate()?;
        let format = config.result_format();
        Ok(Self { instances: DashMap::new(), config, format })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply one button press; serialized against other presses on the same instance
    #[instrument(skip(self), fields(instance = %id, button = %token))]
    pub fn press(&self, id: InstanceId, token: ButtonToken) -> PressOutcome {
        let slot = self.slot(id);
        let outcome = lock(&slot).press(token, &self.config);
        log_outcome(&outcome);
        outcome
    }

    pub fn press_glyph(&self, id: InstanceId, glyph: char) -> CalcWidgetResult<PressOutcome> {
        let token = ButtonToken::from_glyph(glyph)?;
        Ok(self.press(id, token))
    }

    pub fn display(&self, id: InstanceId) -> String {
        match self.existing_slot(id) {
            Some(slot) => {
                let state = lock(&slot);
                state.display(&self.format)
            }
            None => String::new(),
        }
    }

    pub fn snapshot(&self, id: InstanceId) -> InstanceSnapshot {
        match self.existing_slot(id) {
            Some(slot) => {
                let state = lock(&slot);
                InstanceSnapshot::capture(id, &state, &self.format)
            }
            None => InstanceSnapshot::capture(id, &InstanceState::new(), &self.format),
        }
    }

    pub fn ensure_instance(&self, id: InstanceId) {
        self.slot(id);
    }

    /// Forget an instance the host has deleted. Returns whether it was known.
    #[instrument(skip(self), fields(instance = %id))]
    pub fn remove_instance(&self, id: InstanceId) -> bool {
        let removed = self.instances.remove(&id).is_some();
        debug!(removed, "Removing widget instance");
        removed
    }

    pub fn remove_instances(&self, ids: impl IntoIterator<Item = InstanceId>) {
        for id in ids {
            self.remove_instance(id);
        }
    }

    pub fn instance_ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<_> = self.instances.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn slot(&self, id: InstanceId) -> InstanceSlot {
        Arc::clone(self.instances.entry(id).or_default().value())
    }

    fn existing_slot(&self, id: InstanceId) -> Option<InstanceSlot> {
        self.instances.get(&id).map(|entry| Arc::clone(entry.value()))
    }
}

// InstanceState is never left half-updated by a panic, so a poisoned lock is still usable
fn lock(slot: &InstanceSlot) -> MutexGuard<'_, InstanceState> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
