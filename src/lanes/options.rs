use serde::{Deserialize, Serialize};

/// Parameters of the lane clustering engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneOptions {
    /// Lower projection bound (frame bottom), in pixels.
    pub max_y: i32,
    /// Frame width used to reject re-projected endpoints far off-screen.
    pub frame_width: usize,
    /// Relative similarity band for slope and intercept (0.2 = ±20%).
    pub tolerance: f64,
    /// Re-projected x must lie in `[-margin·W, (1 + margin)·W]`.
    pub x_bound_margin: f64,
}

impl Default for LaneOptions {
    fn default() -> Self {
        Self {
            max_y: 600,
            frame_width: 800,
            tolerance: 0.2,
            x_bound_margin: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LaneOptionsError {
    InvalidTolerance(f64),
    InvalidFrameWidth(usize),
    InvalidMargin(f64),
}

impl std::fmt::Display for LaneOptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaneOptionsError::InvalidTolerance(t) => {
                write!(f, "cluster tolerance must lie in (0, 1), got {t}")
            }
            LaneOptionsError::InvalidFrameWidth(w) => {
                write!(f, "frame width must be positive, got {w}")
            }
            LaneOptionsError::InvalidMargin(m) => {
                write!(f, "x-bound margin must be finite and >= 0, got {m}")
            }
        }
    }
}

impl std::error::Error for LaneOptionsError {}

impl LaneOptions {
    pub fn validate(&self) -> Result<(), LaneOptionsError> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(LaneOptionsError::InvalidTolerance(self.tolerance));
        }
        if self.frame_width == 0 {
            return Err(LaneOptionsError::InvalidFrameWidth(self.frame_width));
        }
        if !self.x_bound_margin.is_finite() || self.x_bound_margin < 0.0 {
            return Err(LaneOptionsError::InvalidMargin(self.x_bound_margin));
        }
        Ok(())
    }

    /// Accepted range for re-projected x coordinates.
    pub fn x_bounds(&self) -> (f64, f64) {
        let w = self.frame_width as f64;
        (-self.x_bound_margin * w, (1.0 + self.x_bound_margin) * w)
    }
}
