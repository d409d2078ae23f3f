//! Waypoint routes
//!
//! Parses the JSON route descriptor into a [`WaypointPlan`] and resamples the
//! sparse waypoints into one point per second of travel.
//!
//! Descriptor format (all fields optional):
//!
//! ```json
//! {
//!   "speed": 4.0,
//!   "repeat": -1,
//!   "reverse": true,
//!   "delay": 5000,
//!   "coordinates": [{ "latitude": 36.325928, "longitude": 137.832105 }]
//! }
//! ```

use std::time::Duration;

use contracts::{ContractError, Coordinate, RouteDefaults};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geo::distance_meters;

/// Upper bound on points in one forward sequence; larger plans are dropped
pub const MAX_ROUTE_POINTS: u64 = 2_000_000;

/// Raw descriptor as sent by the host
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouteDescriptor {
    /// km/h
    pub speed: Option<f32>,
    /// -1 = forever, 0 = once, N = N extra cycles
    pub repeat: Option<i64>,
    pub reverse: Option<bool>,
    /// milliseconds before the first fix
    pub delay: Option<i64>,
    pub coordinates: Option<Vec<DescriptorPoint>>,
}

/// One descriptor waypoint; either ordinate may be missing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DescriptorPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl RouteDescriptor {
    /// Strict parse
    pub fn from_json(json: &str) -> Result<Self, ContractError> {
        serde_json::from_str(json).map_err(|e| ContractError::malformed_descriptor(e.to_string()))
    }

    /// Lenient parse: absent or malformed input yields the all-empty descriptor
    pub fn parse_lenient(json: Option<&str>) -> Self {
        let Some(json) = json else {
            debug!("no route descriptor supplied");
            return Self::default();
        };

        match Self::from_json(json) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!(error = %e, "route descriptor ignored, session will idle");
                Self::default()
            }
        }
    }
}

/// How many times a route is played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Forever,
    /// Extra cycles after the first one
    Extra(u32),
}

impl Repeat {
    /// Any negative count means forever
    pub fn from_count(count: i64) -> Self {
        if count < 0 {
            Self::Forever
        } else {
            Self::Extra(u32::try_from(count).unwrap_or(u32::MAX))
        }
    }

    /// Total number of cycles, `None` when unbounded
    pub fn total_cycles(self) -> Option<u64> {
        match self {
            Self::Forever => None,
            Self::Extra(n) => Some(u64::from(n) + 1),
        }
    }
}

impl Default for Repeat {
    fn default() -> Self {
        Self::Extra(0)
    }
}

/// Immutable route plan with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPlan {
    pub speed_kmh: Option<f32>,
    pub repeat: Repeat,
    pub reverse_on_completion: bool,
    pub initial_delay: Duration,
    /// Canonicalized waypoints; entries with a missing ordinate are dropped
    pub waypoints: Vec<Coordinate>,
}

impl WaypointPlan {
    /// Build a plan from a raw descriptor
    pub fn from_descriptor(descriptor: &RouteDescriptor, defaults: &RouteDefaults) -> Self {
        let waypoints = descriptor
            .coordinates
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|p| match (p.latitude, p.longitude) {
                (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng).rounded()),
                _ => None,
            })
            .collect();

        let delay_ms = descriptor
            .delay
            .map(|d| d.max(0) as u64)
            .unwrap_or(defaults.default_delay_ms);

        Self {
            speed_kmh: descriptor.speed,
            repeat: descriptor.repeat.map(Repeat::from_count).unwrap_or_default(),
            reverse_on_completion: descriptor.reverse.unwrap_or(true),
            initial_delay: Duration::from_millis(delay_ms),
            waypoints,
        }
    }

    /// Parse a descriptor string leniently and build a plan
    pub fn parse(json: Option<&str>, defaults: &RouteDefaults) -> Self {
        Self::from_descriptor(&RouteDescriptor::parse_lenient(json), defaults)
    }

    /// Meters travelled per one-second tick, `None` when not moving
    pub fn distance_per_tick(&self) -> Option<f64> {
        match self.speed_kmh {
            Some(speed) if speed > 0.0 => Some(f64::from(speed * 1000.0 / 3600.0)),
            _ => None,
        }
    }

    /// Resample the waypoints into the playable sequence
    pub fn interpolate(&self) -> RouteSequence {
        let Some(per_tick) = self.distance_per_tick() else {
            debug!("route has no speed, sequence is empty");
            return RouteSequence::default();
        };
        let Some((first, rest)) = self.waypoints.split_first() else {
            debug!("route has no waypoints, sequence is empty");
            return RouteSequence::default();
        };

        let divisions: Vec<u64> = self
            .waypoints
            .windows(2)
            .map(|pair| leg_divisions(pair[0], pair[1], per_tick))
            .collect();
        let total = divisions.iter().fold(1u64, |acc, d| acc.saturating_add(*d));
        if total > MAX_ROUTE_POINTS {
            warn!(
                points = total,
                limit = MAX_ROUTE_POINTS,
                meters_per_tick = per_tick,
                "route too dense, sequence is empty"
            );
            return RouteSequence::default();
        }

        let mut forward = Vec::with_capacity(total as usize);
        forward.push(*first);
        let mut prev = *first;
        for (&curr, &divisions) in rest.iter().zip(&divisions) {
            push_leg(&mut forward, prev, curr, divisions);
            prev = curr;
        }

        let reverse = if self.reverse_on_completion {
            forward.iter().rev().copied().collect()
        } else {
            Vec::new()
        };

        debug!(
            waypoints = self.waypoints.len(),
            points = forward.len(),
            meters_per_tick = per_tick,
            reverse = self.reverse_on_completion,
            "route interpolated"
        );

        RouteSequence { forward, reverse }
    }
}

/// Number of steps on the leg `prev -> curr`, at least one
fn leg_divisions(prev: Coordinate, curr: Coordinate, per_tick: f64) -> u64 {
    let distance = distance_meters(prev, curr);
    ((distance / per_tick).floor() as u64).max(1)
}

/// Append the points of one leg `prev -> curr` (excluding `prev`).
///
/// A leg shorter than one tick of travel degenerates to a single jump to
/// `curr`; the leg always ends exactly on `curr`.
fn push_leg(out: &mut Vec<Coordinate>, prev: Coordinate, curr: Coordinate, divisions: u64) {
    // Unrounded deltas; only emitted points are canonicalized
    let d_lat = (curr.latitude - prev.latitude) / divisions as f64;
    let d_lng = (curr.longitude - prev.longitude) / divisions as f64;

    for i in 1..divisions {
        let k = i as f64;
        out.push(
            Coordinate::new(prev.latitude + d_lat * k, prev.longitude + d_lng * k).rounded(),
        );
    }

    let ends_on_target = out.last().is_some_and(|last| last.same_as(&curr));
    if !ends_on_target {
        out.push(curr);
    }
}

/// Dense, replayable point sequence of a route
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteSequence {
    pub forward: Vec<Coordinate>,
    /// Literal reversal of `forward`, empty when reverse is off
    pub reverse: Vec<Coordinate>,
}

impl RouteSequence {
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Points in one forward(+reverse) cycle
    pub fn cycle_len(&self) -> usize {
        self.forward.len() + self.reverse.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(json: &str) -> WaypointPlan {
        WaypointPlan::parse(Some(json), &RouteDefaults::default())
    }

    fn path_length(points: &[Coordinate]) -> f64 {
        points
            .windows(2)
            .map(|w| distance_meters(w[0], w[1]))
            .sum()
    }

    #[test]
    fn test_descriptor_defaults() {
        let p = plan(r#"{"speed": 4.0, "coordinates": []}"#);
        assert_eq!(p.repeat, Repeat::Extra(0));
        assert!(p.reverse_on_completion);
        assert_eq!(p.initial_delay, Duration::from_millis(10_000));
    }

    #[test]
    fn test_malformed_descriptor_is_empty_plan() {
        let p = plan("{not json");
        assert_eq!(p.speed_kmh, None);
        assert!(p.waypoints.is_empty());
        assert!(p.interpolate().is_empty());

        let absent = WaypointPlan::parse(None, &RouteDefaults::default());
        assert!(absent.interpolate().is_empty());
    }

    #[test]
    fn test_wrong_field_type_is_empty_plan() {
        let p = plan(r#"{"speed": "fast", "coordinates": [{"latitude": 1.0, "longitude": 2.0}]}"#);
        assert!(p.waypoints.is_empty());
    }

    #[test]
    fn test_zero_speed_or_no_coordinates_is_empty() {
        let zero = plan(r#"{"speed": 0, "coordinates": [{"latitude": 0, "longitude": 0}, {"latitude": 0, "longitude": 0.001}]}"#);
        assert!(zero.interpolate().is_empty());

        let missing = plan(r#"{"coordinates": [{"latitude": 0, "longitude": 0}, {"latitude": 0, "longitude": 0.001}]}"#);
        assert!(missing.interpolate().is_empty());

        let none = plan(r#"{"speed": 3.6, "coordinates": []}"#);
        assert!(none.interpolate().is_empty());
    }

    #[test]
    fn test_drops_points_with_missing_ordinate() {
        let p = plan(
            r#"{"speed": 3.6, "coordinates": [
                {"latitude": 1.123456789, "longitude": 2.0},
                {"latitude": 3.0},
                {"longitude": 4.0},
                {"latitude": 5.0, "longitude": 6.0}
            ]}"#,
        );
        assert_eq!(
            p.waypoints,
            vec![Coordinate::new(1.1234568, 2.0), Coordinate::new(5.0, 6.0)]
        );
    }

    #[test]
    fn test_negative_repeat_and_delay() {
        let p = plan(r#"{"repeat": -1, "delay": -50}"#);
        assert_eq!(p.repeat, Repeat::Forever);
        assert_eq!(p.initial_delay, Duration::ZERO);
        assert_eq!(Repeat::from_count(-7), Repeat::Forever);
        assert_eq!(Repeat::from_count(2).total_cycles(), Some(3));
    }

    #[test]
    fn test_equator_example() {
        let p = plan(
            r#"{"speed": 3.6, "repeat": 0, "reverse": false, "delay": 0,
                "coordinates": [{"latitude": 0, "longitude": 0}, {"latitude": 0, "longitude": 0.001}]}"#,
        );
        assert_eq!(p.distance_per_tick(), Some(1.0));

        let seq = p.interpolate();
        let expected = distance_meters(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.001));
        let len = seq.forward.len() as f64;
        assert!((len - expected).abs() <= 2.0, "len = {len}, expected = {expected}");
        assert_eq!(seq.forward[0], Coordinate::new(0.0, 0.0));
        assert_eq!(*seq.forward.last().unwrap(), Coordinate::new(0.0, 0.001));
        assert!(seq.reverse.is_empty());
    }

    #[test]
    fn test_leg_length_within_one_tick() {
        let p = plan(
            r#"{"speed": 18.0, "coordinates": [
                {"latitude": 36.325928, "longitude": 137.832105},
                {"latitude": 36.326135, "longitude": 137.832173},
                {"latitude": 36.326731, "longitude": 137.831840},
                {"latitude": 36.327327, "longitude": 137.831556},
                {"latitude": 36.327716, "longitude": 137.831245}
            ]}"#,
        );
        let per_tick = p.distance_per_tick().unwrap();
        let seq = p.interpolate();

        let mut start = 0;
        for pair in p.waypoints.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let end = start
                + seq.forward[start + 1..]
                    .iter()
                    .position(|c| c.same_as(&curr))
                    .unwrap()
                + 1;
            assert_eq!(seq.forward[start], prev);
            let leg = &seq.forward[start..=end];
            let truth = distance_meters(prev, curr);
            assert!(
                (path_length(leg) - truth).abs() <= per_tick,
                "leg {prev} -> {curr}: {} vs {truth}",
                path_length(leg)
            );
            start = end;
        }
        assert_eq!(start, seq.forward.len() - 1);
    }

    #[test]
    fn test_reverse_is_literal_reversal() {
        let p = plan(
            r#"{"speed": 10.0, "reverse": true, "coordinates": [
                {"latitude": 35.0, "longitude": 139.0},
                {"latitude": 35.001, "longitude": 139.0005}
            ]}"#,
        );
        let seq = p.interpolate();
        let mut reversed = seq.forward.clone();
        reversed.reverse();
        assert_eq!(seq.reverse, reversed);
        assert_eq!(seq.cycle_len(), 2 * seq.forward.len());
    }

    #[test]
    fn test_short_leg_jumps_to_target() {
        let p = plan(
            r#"{"speed": 36.0, "coordinates": [
                {"latitude": 0.0, "longitude": 0.0},
                {"latitude": 0.0, "longitude": 0.00001},
                {"latitude": 0.0, "longitude": 0.00001}
            ]}"#,
        );
        // 1.1 m legs at 10 m/tick, then a zero-length leg
        let seq = p.interpolate();
        assert_eq!(
            seq.forward,
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.00001)]
        );
    }

    #[test]
    fn test_random_legs_end_on_target() {
        use rand::Rng;

        let mut rng = rand::rng();
        for _ in 0..200 {
            let start = Coordinate::new(
                rng.random_range(-60.0..60.0),
                rng.random_range(-170.0..170.0),
            )
            .rounded();
            let end = Coordinate::new(
                start.latitude + rng.random_range(-0.005..0.005),
                start.longitude + rng.random_range(-0.005..0.005),
            )
            .rounded();
            let speed: f32 = rng.random_range(3.6..80.0);

            let p = WaypointPlan {
                speed_kmh: Some(speed),
                repeat: Repeat::default(),
                reverse_on_completion: false,
                initial_delay: Duration::ZERO,
                waypoints: vec![start, end],
            };
            let per_tick = p.distance_per_tick().unwrap();
            let seq = p.interpolate();
            let last = *seq.forward.last().unwrap();
            assert!(last.same_as(&end));

            let truth = distance_meters(start, end);
            assert!((path_length(&seq.forward) - truth).abs() <= per_tick);
        }
    }

    #[test]
    fn test_long_leg_does_not_drift() {
        // ~10 km along the equator at 1 m per tick
        let p = plan(
            r#"{"speed": 3.6, "reverse": false, "coordinates": [
                {"latitude": 0.0, "longitude": 0.0},
                {"latitude": 0.0, "longitude": 0.0899}
            ]}"#,
        );
        let per_tick = p.distance_per_tick().unwrap();
        let seq = p.interpolate();
        assert!(seq.forward.len() > 9_900);

        let n = seq.forward.len();
        let last_jump = distance_meters(seq.forward[n - 2], seq.forward[n - 1]);
        assert!(last_jump <= per_tick + 0.05, "last jump = {last_jump}");
        for pair in seq.forward.windows(2) {
            assert!(distance_meters(pair[0], pair[1]) <= per_tick + 0.05);
        }

        let truth = distance_meters(p.waypoints[0], p.waypoints[1]);
        assert!((path_length(&seq.forward) - truth).abs() <= per_tick);
    }

    #[test]
    fn test_too_dense_route_is_empty() {
        // 1 degree at 0.0001 km/h would be billions of points
        let p = plan(
            r#"{"speed": 0.0001, "coordinates": [
                {"latitude": 0.0, "longitude": 0.0},
                {"latitude": 0.0, "longitude": 1.0}
            ]}"#,
        );
        assert!(p.distance_per_tick().is_some());
        let seq = p.interpolate();
        assert!(seq.is_empty());
        assert!(seq.reverse.is_empty());
    }

    #[test]
    fn test_single_waypoint() {
        let p = plan(r#"{"speed": 5.0, "coordinates": [{"latitude": 1.0, "longitude": 1.0}]}"#);
        let seq = p.interpolate();
        assert_eq!(seq.forward, vec![Coordinate::new(1.0, 1.0)]);
    }
}
