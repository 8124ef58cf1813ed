use serde::Serialize;

/// Averaged line standing in for one cluster.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RepresentativeLane {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    /// Founding slope of the cluster; drives the steering decision.
    pub slope: f64,
    /// Number of segments in the cluster.
    pub support: usize,
}

impl RepresentativeLane {
    pub fn coords(&self) -> (i32, i32, i32, i32) {
        (self.x1, self.y1, self.x2, self.y2)
    }
}

/// The two most supported lanes of a frame, larger cluster first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DominantLanes {
    pub first: RepresentativeLane,
    pub second: RepresentativeLane,
}

impl DominantLanes {
    pub fn slopes(&self) -> (f64, f64) {
        (self.first.slope, self.second.slope)
    }
}
