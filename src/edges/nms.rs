//! Non‑maximum suppression on gradient magnitude with direction alignment.
//!
//! Each pixel is compared with its two neighbours along the gradient
//! direction quantised to 0°, 45°, 90° or 135°. Image coordinates are used
//! (y grows downwards), so a gradient with `gx` and `gy` of the same sign
//! points towards the lower-right neighbour.
//!
//! The comparison is asymmetric (`>` against the backward neighbour, `>=`
//! against the forward one) so plateaus two pixels wide, as produced by a
//! Sobel response on an ideal step, keep exactly one pixel.
use super::grad::Grad;
use crate::image::{ImageF32, ImageView, ImageViewMut};

const TAN_22_5_DEG: f32 = 0.414_213_57;

/// Returns the thinned magnitude: local maxima keep their magnitude, all
/// other pixels (and the 1-pixel border) are zero.
pub fn suppress_non_maxima(grad: &Grad) -> ImageF32 {
    let w = grad.mag.w;
    let h = grad.mag.h;
    let mut out = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let dst = out.row_mut(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= 0.0 {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0) == (gy >= 0.0);

            // (backward, forward) along the gradient
            let (behind, ahead) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                (mag_row[x - 1], mag_row[x + 1])
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            if mag > behind && mag >= ahead {
                dst[x] = mag;
            }
        }
    }

    out
}
