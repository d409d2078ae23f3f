//! Per-session counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single session
#[derive(Debug, Default)]
pub struct SessionMetrics {
    /// Ticks executed after the initial delay
    ticks: AtomicU64,
    /// Fixes accepted by the sink
    published: AtomicU64,
    /// Ticks with nothing to publish
    idle_ticks: AtomicU64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn inc_ticks(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn inc_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn idle_ticks(&self) -> u64 {
        self.idle_ticks.load(Ordering::Relaxed)
    }

    pub fn inc_idle_ticks(&self) {
        self.idle_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks(),
            published: self.published(),
            idle_ticks: self.idle_ticks(),
        }
    }
}

/// Snapshot of session metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub published: u64,
    pub idle_ticks: u64,
}
