//! Playback error types

use thiserror::Error;

/// Playback-specific errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Session task ended abnormally
    #[error("session {session_id} task failed: {message}")]
    SessionJoin { session_id: u64, message: String },

    /// Error from contract
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl PlaybackError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
