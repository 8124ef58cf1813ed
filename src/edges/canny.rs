//! Canny-style edge detector: Sobel → NMS → double-threshold hysteresis.
//!
//! Thresholds are expressed in Sobel magnitude units over 0–255 intensity.
//! Pixels above `high` seed edges; pixels above `low` are kept only when
//! 8-connected to a seed. The traversal uses an explicit stack.
use super::grad::sobel_gradients;
use super::nms::suppress_non_maxima;
use crate::image::{GrayImageU8, ImageF32, ImageView};
use serde::{Deserialize, Serialize};

pub const EDGE: u8 = 255;

/// Hysteresis threshold pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CannyThresholds {
    pub low: f32,
    pub high: f32,
}

impl Default for CannyThresholds {
    fn default() -> Self {
        Self {
            low: 150.0,
            high: 300.0,
        }
    }
}

/// Run the detector on an intensity image (values in 0–255).
pub fn canny(intensity: &ImageF32, thresholds: CannyThresholds) -> GrayImageU8 {
    let (w, h) = (intensity.width(), intensity.height());
    let grad = sobel_gradients(intensity);
    let thin = suppress_non_maxima(&grad);
    let mut out = GrayImageU8::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    let mut stack: Vec<(usize, usize)> = Vec::new();
    for y in 1..h - 1 {
        let row = thin.row(y);
        for x in 1..w - 1 {
            if row[x] > thresholds.high && out.get(x, y) == 0 {
                out.set(x, y, EDGE);
                stack.push((x, y));
                while let Some((cx, cy)) = stack.pop() {
                    for ny in cy - 1..=cy + 1 {
                        for nx in cx - 1..=cx + 1 {
                            if out.get(nx, ny) != 0 {
                                continue;
                            }
                            // the border ring of `thin` is always zero, so
                            // neighbours never walk off the image
                            if thin.get(nx, ny) > thresholds.low {
                                out.set(nx, ny, EDGE);
                                stack.push((nx, ny));
                            }
                        }
                    }
                }
            }
        }
    }

    out
}
