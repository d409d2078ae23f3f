//! LogSink - logs every fix via tracing

use contracts::{ContractError, LocationFix, LocationSink};
use tracing::{info, instrument};

/// Sink that only logs fixes, for dry runs and debugging
pub struct LogSink {
    name: String,
    published: u64,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            published: 0,
        }
    }

    pub fn published(&self) -> u64 {
        self.published
    }
}

impl LocationSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_sink_enable", skip(self))]
    async fn enable_simulation(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "simulation mode on");
        Ok(())
    }

    #[instrument(name = "log_sink_disable", skip(self))]
    async fn disable_simulation(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, published = self.published, "simulation mode off");
        Ok(())
    }

    async fn publish(&mut self, fix: &LocationFix) -> Result<(), ContractError> {
        self.published += 1;
        info!(
            sink = %self.name,
            latitude = fix.coordinate.latitude,
            longitude = fix.coordinate.longitude,
            accuracy_m = fix.accuracy_m,
            elapsed_ms = fix.elapsed_ms,
            "mock location"
        );
        Ok(())
    }
}
