//! Steering decision from the two dominant lane slopes.

use crate::lanes::DominantLanes;
use serde::{Deserialize, Serialize};

/// Discrete steering command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Decision {
    SteerLeft,
    SteerRight,
    SteerStraight,
}

impl Decision {
    /// Decide from the slopes of a frame's dominant lanes.
    pub fn from_lanes(lanes: &DominantLanes) -> Self {
        let (a, b) = lanes.slopes();
        decide(a, b)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::SteerLeft => "left",
            Decision::SteerRight => "right",
            Decision::SteerStraight => "straight",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both lanes leaning the same way steers towards the other side; anything
/// else, zero slopes included, keeps straight.
pub fn decide(lane_a_slope: f64, lane_b_slope: f64) -> Decision {
    if lane_a_slope < 0.0 && lane_b_slope < 0.0 {
        Decision::SteerRight
    } else if lane_a_slope > 0.0 && lane_b_slope > 0.0 {
        Decision::SteerLeft
    } else {
        Decision::SteerStraight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanes::RepresentativeLane;

    #[test]
    fn decision_table() {
        let cases = [
            ((-2.0, -1.0), Decision::SteerRight),
            ((2.0, 1.0), Decision::SteerLeft),
            ((-1.0, 1.0), Decision::SteerStraight),
            ((1.0, -1.0), Decision::SteerStraight),
            ((0.0, 1.0), Decision::SteerStraight),
            ((-1.0, 0.0), Decision::SteerStraight),
            ((0.0, 0.0), Decision::SteerStraight),
        ];
        for ((a, b), expected) in cases {
            assert_eq!(decide(a, b), expected, "slopes ({a}, {b})");
        }
    }

    #[test]
    fn from_lanes_uses_founding_slopes() {
        let lane = |slope| RepresentativeLane {
            x1: 0,
            y1: 300,
            x2: 100,
            y2: 600,
            slope,
            support: 1,
        };
        let lanes = DominantLanes {
            first: lane(-0.5),
            second: lane(-3.0),
        };
        assert_eq!(Decision::from_lanes(&lanes), Decision::SteerRight);
    }

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_string(&Decision::SteerStraight).expect("serialize");
        assert_eq!(json, "\"steerStraight\"");
    }
}
