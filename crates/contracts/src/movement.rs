//! MovementProfile - fixed per-tick step sizes for square patrols

use serde::{Deserialize, Serialize};

/// Per-tick step for walking (about 1 m, 3.6 km/h)
pub const WALK_STEP_DEGREES: f64 = 0.000_007;

/// Per-tick step for cycling (about 6 m, 21.6 km/h)
pub const BIKE_STEP_DEGREES: f64 = 0.000_042;

/// Per-tick step for driving (about 15 m, 54 km/h)
pub const CAR_STEP_DEGREES: f64 = 0.000_105;

/// How fast a patrol moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementProfile {
    #[default]
    Walk,
    Bike,
    Car,
}

impl MovementProfile {
    /// Step distance per tick in decimal degrees
    pub fn step_degrees(self) -> f64 {
        match self {
            Self::Walk => WALK_STEP_DEGREES,
            Self::Bike => BIKE_STEP_DEGREES,
            Self::Car => CAR_STEP_DEGREES,
        }
    }

    /// Lookup by ordinal as sent by hosts; unknown values fall back to `Walk`
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            1 => Self::Bike,
            2 => Self::Car,
            _ => Self::Walk,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Bike => "bike",
            Self::Car => "car",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_table() {
        assert_eq!(MovementProfile::Walk.step_degrees(), 0.000_007);
        assert_eq!(MovementProfile::Bike.step_degrees(), 0.000_042);
        assert_eq!(MovementProfile::Car.step_degrees(), 0.000_105);
    }

    #[test]
    fn test_from_ordinal_falls_back_to_walk() {
        assert_eq!(MovementProfile::from_ordinal(0), MovementProfile::Walk);
        assert_eq!(MovementProfile::from_ordinal(1), MovementProfile::Bike);
        assert_eq!(MovementProfile::from_ordinal(2), MovementProfile::Car);
        assert_eq!(MovementProfile::from_ordinal(7), MovementProfile::Walk);
        assert_eq!(MovementProfile::from_ordinal(-1), MovementProfile::Walk);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&MovementProfile::Bike).unwrap();
        assert_eq!(json, "\"bike\"");
        let back: MovementProfile = serde_json::from_str("\"car\"").unwrap();
        assert_eq!(back, MovementProfile::Car);
    }
}
