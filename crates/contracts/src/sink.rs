//! LocationSink trait - the host's simulated-location subsystem
//!
//! A sink is a single shared resource: simulation mode is enabled before the
//! first publish of a session and disabled on every termination path.

use crate::{ContractError, LocationFix};

/// Receiver of simulated location fixes
///
/// All sink implementations must implement this trait.
#[trait_variant::make(LocationSink: Send)]
pub trait LocalLocationSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Whether the host can still accept fixes.
    ///
    /// A sink that went away ends the session as a normal stop.
    fn is_available(&self) -> bool {
        true
    }

    /// Switch the host into simulation mode
    async fn enable_simulation(&mut self) -> Result<(), ContractError>;

    /// Leave simulation mode
    async fn disable_simulation(&mut self) -> Result<(), ContractError>;

    /// Publish one fix
    ///
    /// # Errors
    /// Returns `ContractError::SinkPublish` when the host rejects the fix.
    async fn publish(&mut self, fix: &LocationFix) -> Result<(), ContractError>;
}
