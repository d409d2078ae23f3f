//! Layered error definitions
//!
//! Categorized by source: config / descriptor / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Descriptor Errors =====
    /// Waypoint descriptor could not be parsed
    #[error("malformed route descriptor: {message}")]
    MalformedDescriptor { message: String },

    // ===== Sink Errors =====
    /// Sink refused to enter simulation mode
    #[error("sink '{sink_name}' enable error: {message}")]
    SinkEnable { sink_name: String, message: String },

    /// Sink rejected a fix
    #[error("sink '{sink_name}' publish error: {message}")]
    SinkPublish { sink_name: String, message: String },

    /// Sink failed to leave simulation mode
    #[error("sink '{sink_name}' disable error: {message}")]
    SinkDisable { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create malformed descriptor error
    pub fn malformed_descriptor(message: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            message: message.into(),
        }
    }

    /// Create sink enable error
    pub fn sink_enable(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkEnable {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink publish error
    pub fn sink_publish(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkPublish {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink disable error
    pub fn sink_disable(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkDisable {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
