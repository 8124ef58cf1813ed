use serde::{Deserialize, Serialize};

/// Raw line segment reported by a segment detector, in integer pixels.
///
/// Segments carry no identity beyond their position in the detector's
/// output; that order is significant to lane clustering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl RawSegment {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn min_y(&self) -> i32 {
        self.y1.min(self.y2)
    }

    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }

    pub fn length(&self) -> f64 {
        let dx = (self.x2 - self.x1) as f64;
        let dy = (self.y2 - self.y1) as f64;
        dx.hypot(dy)
    }
}

impl From<(i32, i32, i32, i32)> for RawSegment {
    fn from((x1, y1, x2, y2): (i32, i32, i32, i32)) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<[i32; 4]> for RawSegment {
    fn from([x1, y1, x2, y2]: [i32; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}
