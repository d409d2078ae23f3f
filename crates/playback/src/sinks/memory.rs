//! MemorySink - records fixes in memory, supports injected failures
//!
//! The [`MemoryRecorder`] handle shares state with the sink, so a caller can
//! inspect what was published (or flip availability) while a session holds
//! the sink.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{ContractError, Coordinate, LocationFix, LocationSink};
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryState {
    fixes: Vec<LocationFix>,
    publish_attempts: u64,
    enable_count: u64,
    disable_count: u64,
    simulating: bool,
    unavailable: bool,
    /// 1-based publish attempt that should fail
    fail_on_publish: Option<u64>,
    fail_enable: bool,
}

/// Shared view of a [`MemorySink`]
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRecorder {
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fixes accepted so far
    pub fn fixes(&self) -> Vec<LocationFix> {
        self.state().fixes.clone()
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.state().fixes.iter().map(|f| f.coordinate).collect()
    }

    /// Number of accepted fixes
    pub fn publish_count(&self) -> u64 {
        self.state().fixes.len() as u64
    }

    /// Number of publish calls, failed ones included
    pub fn publish_attempts(&self) -> u64 {
        self.state().publish_attempts
    }

    pub fn enable_count(&self) -> u64 {
        self.state().enable_count
    }

    pub fn disable_count(&self) -> u64 {
        self.state().disable_count
    }

    /// Whether simulation mode is currently on
    pub fn is_simulating(&self) -> bool {
        self.state().simulating
    }

    /// Make the `attempt`-th publish call (1-based) fail
    pub fn fail_on_publish(&self, attempt: u64) {
        self.state().fail_on_publish = Some(attempt);
    }

    /// Make `enable_simulation` fail
    pub fn fail_enable(&self, fail: bool) {
        self.state().fail_enable = fail;
    }

    pub fn set_available(&self, available: bool) {
        self.state().unavailable = !available;
    }
}

/// In-memory sink for tests and embedding
pub struct MemorySink {
    name: String,
    recorder: MemoryRecorder,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recorder: MemoryRecorder::default(),
        }
    }

    /// Handle sharing this sink's state
    pub fn recorder(&self) -> MemoryRecorder {
        self.recorder.clone()
    }
}

impl LocationSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        !self.recorder.state().unavailable
    }

    async fn enable_simulation(&mut self) -> Result<(), ContractError> {
        let mut state = self.recorder.state();
        state.enable_count += 1;
        if state.fail_enable {
            return Err(ContractError::sink_enable(&self.name, "injected enable failure"));
        }
        state.simulating = true;
        Ok(())
    }

    async fn disable_simulation(&mut self) -> Result<(), ContractError> {
        let mut state = self.recorder.state();
        state.disable_count += 1;
        state.simulating = false;
        Ok(())
    }

    async fn publish(&mut self, fix: &LocationFix) -> Result<(), ContractError> {
        let mut state = self.recorder.state();
        state.publish_attempts += 1;
        if state.fail_on_publish == Some(state.publish_attempts) {
            debug!(sink = %self.name, attempt = state.publish_attempts, "injected publish failure");
            return Err(ContractError::sink_publish(&self.name, "injected publish failure"));
        }
        state.fixes.push(fix.clone());
        Ok(())
    }
}
