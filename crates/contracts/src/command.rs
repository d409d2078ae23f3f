//! Start/stop commands accepted by session control

use serde::{Deserialize, Serialize};

use crate::{Coordinate, MovementProfile};

/// Default half-width of the patrol square, in steps
pub const DEFAULT_RADIUS_STEPS: u32 = 100;

/// Which generator drives a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Square patrol around a start point
    Patrol,
    /// Interpolated waypoint route from a JSON descriptor
    Route,
}

impl PlaybackMode {
    /// Label used in logs and metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patrol => "patrol",
            Self::Route => "route",
        }
    }
}

/// What session control does when a start arrives while a session is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionPolicy {
    /// Keep the running session, drop the request
    IgnoreIfActive,
    /// Cancel the running session, then start the new one
    ReplaceActive,
}

/// Start a square patrol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolCommand {
    pub start: Coordinate,

    #[serde(default)]
    pub profile: MovementProfile,

    #[serde(default = "default_radius_steps")]
    pub radius_steps: u32,
}

fn default_radius_steps() -> u32 {
    DEFAULT_RADIUS_STEPS
}

impl PatrolCommand {
    pub fn new(start: Coordinate, profile: MovementProfile) -> Self {
        Self {
            start,
            profile,
            radius_steps: DEFAULT_RADIUS_STEPS,
        }
    }

    pub fn with_radius(mut self, radius_steps: u32) -> Self {
        self.radius_steps = radius_steps;
        self
    }
}

/// Start a waypoint route
///
/// The descriptor is kept raw; a missing or unparseable descriptor still
/// starts a session, which idles until stopped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteCommand {
    pub descriptor: Option<String>,
}

impl RouteCommand {
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: Some(descriptor.into()),
        }
    }
}

/// Any start request
#[derive(Debug, Clone, PartialEq)]
pub enum StartCommand {
    Patrol(PatrolCommand),
    Route(RouteCommand),
}

impl StartCommand {
    pub fn mode(&self) -> PlaybackMode {
        match self {
            Self::Patrol(_) => PlaybackMode::Patrol,
            Self::Route(_) => PlaybackMode::Route,
        }
    }

    /// Patrol starts are idempotent, route starts replace.
    pub fn admission(&self) -> AdmissionPolicy {
        match self {
            Self::Patrol(_) => AdmissionPolicy::IgnoreIfActive,
            Self::Route(_) => AdmissionPolicy::ReplaceActive,
        }
    }
}

impl From<PatrolCommand> for StartCommand {
    fn from(command: PatrolCommand) -> Self {
        Self::Patrol(command)
    }
}

impl From<RouteCommand> for StartCommand {
    fn from(command: RouteCommand) -> Self {
        Self::Route(command)
    }
}
