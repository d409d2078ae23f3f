//! Coordinate and LocationFix - the values flowing from generators to sinks
//!
//! All arrival/sameness comparisons go through [`round7`] so that drift from
//! repeated floating-point addition never hides an arrival.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scale used by [`round7`] (7 decimal digits)
pub const ROUND7_SCALE: f64 = 10_000_000.0;

/// Provider name attached to every simulated fix
pub const MOCK_PROVIDER: &str = "mock_provider";

/// Horizontal accuracy reported for simulated fixes (meters)
pub const MOCK_ACCURACY_M: f32 = 1.0;

/// Round to 7 decimal digits.
///
/// Idempotent for every finite value in coordinate range.
pub fn round7(value: f64) -> f64 {
    (value * ROUND7_SCALE).round() / ROUND7_SCALE
}

/// WGS84 latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate as-is (no rounding)
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Canonical 7-digit form of this coordinate
    pub fn rounded(self) -> Self {
        Self {
            latitude: round7(self.latitude),
            longitude: round7(self.longitude),
        }
    }

    /// Two coordinates are the same iff their rounded forms are equal
    pub fn same_as(&self, other: &Coordinate) -> bool {
        self.rounded() == other.rounded()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.latitude, self.longitude)
    }
}

/// A simulated location fix handed to a [`crate::LocationSink`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationFix {
    /// Published position
    pub coordinate: Coordinate,

    /// Provider name (always [`MOCK_PROVIDER`])
    pub provider: &'static str,

    /// Horizontal accuracy (meters)
    pub accuracy_m: f32,

    /// Wall-clock time of the fix
    pub timestamp: DateTime<Utc>,

    /// Monotonic time since the session started (milliseconds)
    pub elapsed_ms: u64,
}

impl LocationFix {
    /// Build a fix stamped with the current wall-clock time
    pub fn new(coordinate: Coordinate, elapsed: Duration) -> Self {
        Self {
            coordinate,
            provider: MOCK_PROVIDER,
            accuracy_m: MOCK_ACCURACY_M,
            timestamp: Utc::now(),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}
