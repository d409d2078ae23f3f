//! PointSource - one coordinate per tick
//!
//! `None` means "nothing to publish this tick"; the driver keeps ticking.

use contracts::Coordinate;
use tracing::debug;

use crate::{Repeat, RouteSequence};

/// Supplies the next coordinate for each tick
pub trait PointSource: Send {
    fn next_point(&mut self) -> Option<Coordinate>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Forward,
    Reverse,
}

/// Cursor walking a [`RouteSequence`]: forward, then reverse (if any),
/// repeated, then exhausted.
#[derive(Debug, Clone)]
pub struct RoutePlayback {
    sequence: RouteSequence,
    repeat: Repeat,
    leg: Leg,
    index: usize,
    completed_cycles: u64,
    exhausted: bool,
}

impl RoutePlayback {
    pub fn new(sequence: RouteSequence, repeat: Repeat) -> Self {
        let exhausted = sequence.is_empty();
        Self {
            sequence,
            repeat,
            leg: Leg::Forward,
            index: 0,
            completed_cycles: 0,
            exhausted,
        }
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn leg_points(&self) -> &[Coordinate] {
        match self.leg {
            Leg::Forward => &self.sequence.forward,
            Leg::Reverse => &self.sequence.reverse,
        }
    }

    /// Move past the end of the current leg
    fn finish_leg(&mut self) {
        self.index = 0;
        if self.leg == Leg::Forward && !self.sequence.reverse.is_empty() {
            self.leg = Leg::Reverse;
            return;
        }

        self.leg = Leg::Forward;
        self.completed_cycles += 1;
        if let Some(total) = self.repeat.total_cycles() {
            if self.completed_cycles >= total {
                debug!(cycles = self.completed_cycles, "route playback complete, idling");
                self.exhausted = true;
            }
        }
    }
}

impl PointSource for RoutePlayback {
    fn next_point(&mut self) -> Option<Coordinate> {
        if self.exhausted {
            return None;
        }

        let point = self.leg_points()[self.index];
        self.index += 1;
        if self.index >= self.leg_points().len() {
            self.finish_leg();
        }
        Some(point)
    }
}
