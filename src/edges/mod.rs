//! Edge processing: Sobel gradients, non-maximum suppression and a
//! Canny-style hysteresis detector.
//!
//! - Gradient computation returns `gx`, `gy` and the Euclidean magnitude.
//! - Non-maximum suppression thins the magnitude along the quantised gradient
//!   direction (0°, 45°, 90°, 135°).
//! - Hysteresis keeps weak responses only when 8-connected to a strong one.
//!
//! Borders are handled by clamping indices (replicate) in the gradient pass;
//! the outermost 1-pixel frame is never marked as an edge.

pub mod canny;
pub mod grad;
pub mod nms;

pub use canny::{canny, CannyThresholds};
pub use grad::{sobel_gradients, Grad};
pub use nms::suppress_non_maxima;
