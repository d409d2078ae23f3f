//! SinkSet - fans each fix out to every configured sink

use contracts::{ContractError, LocationFix, LocationSink, SinkConfig, SinkType};
use tracing::{instrument, warn};

use crate::error::PlaybackError;
use crate::sinks::{FileSink, LogSink};

/// A sink built from a [`SinkConfig`]
pub enum ConfiguredSink {
    Log(LogSink),
    File(FileSink),
}

impl ConfiguredSink {
    /// Create a sink from configuration
    #[instrument(
        name = "create_sink",
        skip(config),
        fields(sink = %config.name, sink_type = ?config.sink_type)
    )]
    pub fn from_config(config: &SinkConfig) -> Result<Self, PlaybackError> {
        match config.sink_type {
            SinkType::Log => Ok(Self::Log(LogSink::new(&config.name))),
            SinkType::File => FileSink::from_params(&config.name, &config.params)
                .map(Self::File)
                .map_err(|e| PlaybackError::sink_creation(&config.name, e.to_string())),
        }
    }
}

impl LocationSink for ConfiguredSink {
    fn name(&self) -> &str {
        match self {
            Self::Log(s) => s.name(),
            Self::File(s) => s.name(),
        }
    }

    fn is_available(&self) -> bool {
        match self {
            Self::Log(s) => s.is_available(),
            Self::File(s) => s.is_available(),
        }
    }

    async fn enable_simulation(&mut self) -> Result<(), ContractError> {
        match self {
            Self::Log(s) => s.enable_simulation().await,
            Self::File(s) => s.enable_simulation().await,
        }
    }

    async fn disable_simulation(&mut self) -> Result<(), ContractError> {
        match self {
            Self::Log(s) => s.disable_simulation().await,
            Self::File(s) => s.disable_simulation().await,
        }
    }

    async fn publish(&mut self, fix: &LocationFix) -> Result<(), ContractError> {
        match self {
            Self::Log(s) => s.publish(fix).await,
            Self::File(s) => s.publish(fix).await,
        }
    }
}

/// Several sinks behind one [`LocationSink`]
///
/// Available while any member is available. The first member error fails the
/// whole operation; disable still visits every member.
pub struct SinkSet {
    name: String,
    sinks: Vec<ConfiguredSink>,
}

impl SinkSet {
    pub fn new(name: impl Into<String>, sinks: Vec<ConfiguredSink>) -> Self {
        Self {
            name: name.into(),
            sinks,
        }
    }

    /// Build every configured sink
    #[instrument(name = "sink_set_from_configs", skip(configs), fields(sink_count = configs.len()))]
    pub fn from_configs(configs: &[SinkConfig]) -> Result<Self, PlaybackError> {
        let sinks = configs
            .iter()
            .map(ConfiguredSink::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        let name = configs
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join("+");
        Ok(Self::new(name, sinks))
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl LocationSink for SinkSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.sinks.iter().any(|s| s.is_available())
    }

    async fn enable_simulation(&mut self) -> Result<(), ContractError> {
        for sink in &mut self.sinks {
            sink.enable_simulation().await?;
        }
        Ok(())
    }

    async fn disable_simulation(&mut self) -> Result<(), ContractError> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.disable_simulation().await {
                warn!(sink = sink.name(), error = %e, "disable failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn publish(&mut self, fix: &LocationFix) -> Result<(), ContractError> {
        for sink in &mut self.sinks {
            if sink.is_available() {
                sink.publish(fix).await?;
            }
        }
        Ok(())
    }
}
