use log::warn;
use serde::{Deserialize, Serialize};

/// Parameters of the Hough-style segment detector.
///
/// Defaults: 1 px distance resolution, 1° angular resolution, 180 votes,
/// 15 px minimum length, no gap bridging.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughOptions {
    /// Distance resolution of the accumulator in pixels.
    pub rho: f32,
    /// Angular resolution of the accumulator in radians.
    pub theta: f32,
    /// Minimum accumulator votes for a line to be considered.
    pub threshold: u32,
    /// Minimum extent (largest of |dx|, |dy|) of an emitted segment.
    pub min_line_length: u32,
    /// Largest run of missing pixels bridged inside one segment.
    pub max_line_gap: u32,
    /// Radius of the neighbourhood consumed around each emitted pixel.
    pub consume_radius: u32,
    /// Optional cap on the number of emitted segments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_segments: Option<usize>,
}

impl Default for HoughOptions {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta: std::f32::consts::PI / 180.0,
            threshold: 180,
            min_line_length: 15,
            max_line_gap: 0,
            consume_radius: 1,
            max_segments: None,
        }
    }
}

impl HoughOptions {
    /// Replace unusable accumulator resolutions with the defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.rho.is_finite() && self.rho >= 0.1) {
            warn!("Hough rho {} unusable, using {}", self.rho, defaults.rho);
            self.rho = defaults.rho;
        }
        if !(self.theta.is_finite() && self.theta > 1e-4 && self.theta <= std::f32::consts::PI) {
            warn!("Hough theta {} unusable, using {}", self.theta, defaults.theta);
            self.theta = defaults.theta;
        }
        self
    }
}
