#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod control;
pub mod decision;
pub mod detector;
pub mod diagnostics;
pub mod image;
pub mod lanes;

// Stage building blocks – public for tools and experiments.
pub mod edges;
pub mod preprocess;
pub mod segments;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + outcome.
pub use crate::decision::{decide, Decision};
pub use crate::detector::{DetectorParams, FrameError, FrameOutcome, LaneDetector};
pub use crate::lanes::{extract_dominant_lanes, DominantLanes, NoLanesFound, RepresentativeLane};

// Frame loop.
pub use crate::control::{run_control_loop, Actuator, FallbackPolicy, FrameSource};

// Per-frame report.
pub use crate::diagnostics::{FrameReport, TimingBreakdown};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lane_pilot::prelude::*;
///
/// # fn main() {
/// let (w, h) = (800usize, 600usize);
/// let rgb = vec![0u8; w * h * 3];
/// let frame = FrameU8::packed(w, h, PixelFormat::Rgb8, &rgb);
///
/// let Ok(detector) = LaneDetector::new(DetectorParams::default()) else {
///     return;
/// };
/// match detector.process(&frame) {
///     Ok(outcome) => println!("decision={}", outcome.decision),
///     Err(err) => println!("no decision: {err}"),
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{FrameU8, PixelFormat};
    pub use crate::segments::RawSegment;
    pub use crate::{Decision, DetectorParams, LaneDetector};
}
