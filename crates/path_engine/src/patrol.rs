//! Square patrol generator
//!
//! A 7-phase direction state machine walking a fixed square around the start
//! point: up to the north edge, around the four corners, back to north of
//! center and down to the center again.
//!
//! "East" and "west" follow the host's naming: the east edge lies at
//! `start.longitude - step * radius`, the west edge at `+ step * radius`.

use contracts::{round7, Coordinate, MovementProfile};
use observability::record_patrol_transition;
use tracing::{debug, trace};

use crate::PointSource;

/// One leg of the patrol loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatrolPhase {
    CenterToCenterNorth,
    CenterNorthToEast,
    NorthEastToSouthEast,
    SouthEastToSouthWest,
    SouthWestToNorthWest,
    NorthWestToCenterNorth,
    CenterNorthToCenter,
}

impl PatrolPhase {
    /// All phases in cycle order
    pub const ALL: [PatrolPhase; 7] = [
        Self::CenterToCenterNorth,
        Self::CenterNorthToEast,
        Self::NorthEastToSouthEast,
        Self::SouthEastToSouthWest,
        Self::SouthWestToNorthWest,
        Self::NorthWestToCenterNorth,
        Self::CenterNorthToCenter,
    ];

    /// Next phase, wrapping after the last one
    pub fn next(self) -> Self {
        match self {
            Self::CenterToCenterNorth => Self::CenterNorthToEast,
            Self::CenterNorthToEast => Self::NorthEastToSouthEast,
            Self::NorthEastToSouthEast => Self::SouthEastToSouthWest,
            Self::SouthEastToSouthWest => Self::SouthWestToNorthWest,
            Self::SouthWestToNorthWest => Self::NorthWestToCenterNorth,
            Self::NorthWestToCenterNorth => Self::CenterNorthToCenter,
            Self::CenterNorthToCenter => Self::CenterToCenterNorth,
        }
    }
}

/// Edges of the patrol square (rounded)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl PatrolBounds {
    fn around(center: Coordinate, step: f64, radius_steps: u32) -> Self {
        let extent = step * f64::from(radius_steps);
        Self {
            north: round7(center.latitude + extent),
            south: round7(center.latitude - extent),
            east: round7(center.longitude - extent),
            west: round7(center.longitude + extent),
        }
    }
}

/// Square patrol state
///
/// Created once per session; every call to [`SquarePatrol::advance`] moves one
/// step. Pure function of its own state, no failure modes.
#[derive(Debug, Clone)]
pub struct SquarePatrol {
    center: Coordinate,
    step: f64,
    radius_steps: u32,
    bounds: PatrolBounds,
    phase: PatrolPhase,
    current: Coordinate,
    transitions: u64,
}

impl SquarePatrol {
    /// Create a patrol for a movement profile
    ///
    /// A radius of 0 is raised to 1 so every phase has a reachable target.
    pub fn new(start: Coordinate, profile: MovementProfile, radius_steps: u32) -> Self {
        Self::with_step(start, profile.step_degrees(), radius_steps)
    }

    /// Create a patrol with an explicit step (decimal degrees)
    pub fn with_step(start: Coordinate, step: f64, radius_steps: u32) -> Self {
        let center = start.rounded();
        let radius_steps = radius_steps.max(1);
        Self {
            center,
            step,
            radius_steps,
            bounds: PatrolBounds::around(center, step, radius_steps),
            phase: PatrolPhase::CenterToCenterNorth,
            current: center,
            transitions: 0,
        }
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn bounds(&self) -> PatrolBounds {
        self.bounds
    }

    pub fn radius_steps(&self) -> u32 {
        self.radius_steps
    }

    pub fn phase(&self) -> PatrolPhase {
        self.phase
    }

    /// Position that the next [`PointSource::next_point`] call will emit
    pub fn current(&self) -> Coordinate {
        self.current
    }

    /// Number of phase transitions so far
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Target corner of a phase
    pub fn target(&self, phase: PatrolPhase) -> Coordinate {
        let b = &self.bounds;
        let c = &self.center;
        match phase {
            PatrolPhase::CenterToCenterNorth => Coordinate::new(b.north, c.longitude),
            PatrolPhase::CenterNorthToEast => Coordinate::new(b.north, b.east),
            PatrolPhase::NorthEastToSouthEast => Coordinate::new(b.south, b.east),
            PatrolPhase::SouthEastToSouthWest => Coordinate::new(b.south, b.west),
            PatrolPhase::SouthWestToNorthWest => Coordinate::new(b.north, b.west),
            PatrolPhase::NorthWestToCenterNorth => Coordinate::new(b.north, c.longitude),
            PatrolPhase::CenterNorthToCenter => Coordinate::new(c.latitude, c.longitude),
        }
    }

    /// Move one step and return the new position.
    ///
    /// If the current position already equals the phase target the phase
    /// advances first, so the step is taken with the new phase's rule.
    pub fn advance(&mut self) -> Coordinate {
        let target = self.target(self.phase);
        let arrived = self.current.same_as(&target);
        trace!(
            at = %self.current,
            target = %target,
            phase = ?self.phase,
            arrived,
            "patrol arrival check"
        );

        if arrived {
            let next = self.phase.next();
            debug!(from = ?self.phase, to = ?next, at = %self.current, "patrol target reached");
            self.phase = next;
            self.transitions += 1;
            record_patrol_transition();
        }

        self.current = self.step_from(self.current, self.phase);
        self.current
    }

    fn step_from(&self, at: Coordinate, phase: PatrolPhase) -> Coordinate {
        let b = &self.bounds;
        let to_north = round7(at.latitude + self.step);
        let to_south = round7(at.latitude - self.step);
        let to_east = round7(at.longitude - self.step);
        let to_west = round7(at.longitude + self.step);

        match phase {
            PatrolPhase::CenterToCenterNorth => Coordinate::new(to_north, self.center.longitude),
            // NorthWestToCenterNorth shares this rule: from the west edge,
            // decreasing longitude walks back toward the center column.
            PatrolPhase::CenterNorthToEast | PatrolPhase::NorthWestToCenterNorth => {
                Coordinate::new(b.north, to_east)
            }
            PatrolPhase::NorthEastToSouthEast => Coordinate::new(to_south, b.east),
            PatrolPhase::SouthEastToSouthWest => Coordinate::new(b.south, to_west),
            PatrolPhase::SouthWestToNorthWest => Coordinate::new(to_north, b.west),
            PatrolPhase::CenterNorthToCenter => Coordinate::new(to_south, self.center.longitude),
        }
    }
}

impl PointSource for SquarePatrol {
    /// Emits the current position, then steps. Never exhausts.
    fn next_point(&mut self) -> Option<Coordinate> {
        let point = self.current;
        self.advance();
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_patrol(radius: u32) -> SquarePatrol {
        SquarePatrol::new(Coordinate::new(35.0, 139.0), MovementProfile::Walk, radius)
    }

    #[test]
    fn test_phase_cycle_wraps() {
        let mut phase = PatrolPhase::CenterToCenterNorth;
        for expected in PatrolPhase::ALL.iter().skip(1) {
            phase = phase.next();
            assert_eq!(phase, *expected);
        }
        assert_eq!(phase.next(), PatrolPhase::CenterToCenterNorth);
    }

    #[test]
    fn test_bounds_walk_radius_100() {
        let patrol = walk_patrol(100);
        let b = patrol.bounds();
        assert_eq!(b.north, 35.0007);
        assert_eq!(b.south, 34.9993);
        assert_eq!(b.east, 138.9993);
        assert_eq!(b.west, 139.0007);
    }

    #[test]
    fn test_reaches_north_after_radius_ticks() {
        let mut patrol = walk_patrol(100);
        for _ in 0..99 {
            patrol.advance();
        }
        assert!(!patrol.current().same_as(&Coordinate::new(35.0007, 139.0)));

        let at = patrol.advance();
        assert!(at.same_as(&Coordinate::new(35.0007, 139.0)));
        assert_eq!(patrol.phase(), PatrolPhase::CenterToCenterNorth);

        // The next tick turns east.
        let turned = patrol.advance();
        assert_eq!(patrol.phase(), PatrolPhase::CenterNorthToEast);
        assert!(turned.same_as(&Coordinate::new(35.0007, 138.999_993)));
    }

    #[test]
    fn test_full_cycle_returns_to_center() {
        let radius = 5;
        let mut patrol = walk_patrol(radius);
        let center = patrol.center();

        // r + r + 2r + 2r + 2r + r + r steps around the square
        for _ in 0..(10 * radius) {
            patrol.advance();
        }
        assert!(patrol.current().same_as(&center));
        assert_eq!(patrol.phase(), PatrolPhase::CenterNorthToCenter);
        assert_eq!(patrol.transitions(), 6);

        patrol.advance();
        assert_eq!(patrol.transitions(), 7);
        assert_eq!(patrol.phase(), PatrolPhase::CenterToCenterNorth);
    }

    #[test]
    fn test_corners_visited_in_order() {
        let radius = 3;
        let mut patrol = SquarePatrol::new(Coordinate::new(-12.5, 45.25), MovementProfile::Car, radius);
        let mut reached = Vec::new();

        for _ in 0..(20 * radius) {
            let before = patrol.phase();
            patrol.advance();
            if patrol.phase() != before {
                reached.push(before);
            }
        }

        assert_eq!(
            reached,
            vec![
                PatrolPhase::CenterToCenterNorth,
                PatrolPhase::CenterNorthToEast,
                PatrolPhase::NorthEastToSouthEast,
                PatrolPhase::SouthEastToSouthWest,
                PatrolPhase::SouthWestToNorthWest,
                PatrolPhase::NorthWestToCenterNorth,
                PatrolPhase::CenterNorthToCenter,
                PatrolPhase::CenterToCenterNorth,
                PatrolPhase::CenterNorthToEast,
                PatrolPhase::NorthEastToSouthEast,
                PatrolPhase::SouthEastToSouthWest,
                PatrolPhase::SouthWestToNorthWest,
                PatrolPhase::NorthWestToCenterNorth,
            ]
        );
    }

    #[test]
    fn test_point_source_emits_start_first() {
        let mut patrol = walk_patrol(10);
        assert_eq!(patrol.next_point(), Some(Coordinate::new(35.0, 139.0)));
        let second = patrol.next_point().unwrap();
        assert!(second.same_as(&Coordinate::new(35.000_007, 139.0)));
    }

    #[test]
    fn test_zero_radius_raised_to_one() {
        let mut patrol = walk_patrol(0);
        assert_eq!(patrol.radius_steps(), 1);
        for _ in 0..10 {
            patrol.advance();
        }
        assert!(patrol.current().same_as(&patrol.center()));
    }

    #[test]
    fn test_stays_on_square() {
        let mut patrol = SquarePatrol::new(Coordinate::new(10.0, 20.0), MovementProfile::Bike, 4);
        let b = patrol.bounds();
        for _ in 0..200 {
            let p = patrol.advance();
            assert!(p.latitude <= b.north + 1e-9 && p.latitude >= b.south - 1e-9);
            assert!(p.longitude >= b.east - 1e-9 && p.longitude <= b.west + 1e-9);
        }
    }
}
