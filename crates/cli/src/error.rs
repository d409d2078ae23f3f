//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Route descriptor could not be read
    #[error("Failed to read route descriptor {path}: {message}")]
    DescriptorRead { path: String, message: String },

    /// Start coordinate out of range
    #[error("Invalid start coordinate ({lat}, {lng}): {message}")]
    InvalidCoordinate { lat: f64, lng: f64, message: String },

    /// Session ended with a failure outcome
    #[error("Session {session_id} failed: {reason}")]
    SessionFailed { session_id: u64, reason: String },

    /// Graceful shutdown error
    #[error("Error during shutdown: {message}")]
    Shutdown { message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn descriptor_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DescriptorRead {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_coordinate(lat: f64, lng: f64, message: impl Into<String>) -> Self {
        Self::InvalidCoordinate {
            lat,
            lng,
            message: message.into(),
        }
    }

    pub fn shutdown(message: impl Into<String>) -> Self {
        Self::Shutdown {
            message: message.into(),
        }
    }
}
