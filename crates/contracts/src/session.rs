//! Session outcome and report

use std::time::Duration;

use serde::Serialize;

use crate::PlaybackMode;

/// Terminal state of a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Stopped on request (or sink went away)
    Success,
    /// The sink rejected a fix
    Failure,
}

impl SessionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Summary of one finished session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: u64,
    pub mode: PlaybackMode,
    pub outcome: SessionOutcome,

    /// Ticks executed after the initial delay
    pub ticks: u64,

    /// Fixes accepted by the sink
    pub published: u64,

    /// Reason of the first failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Wall time from start to termination
    pub elapsed: Duration,
}

impl SessionReport {
    pub fn is_success(&self) -> bool {
        self.outcome == SessionOutcome::Success
    }
}
