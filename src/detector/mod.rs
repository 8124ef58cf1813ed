//! Lane detector composing the per-frame stages.
//!
//! Overview
//! - Preprocess: intensity, Canny edges, Gaussian blur of the edge map, ROI
//!   mask ([`crate::preprocess`]).
//! - Segments: a [`SegmentDetector`](crate::segments::SegmentDetector) turns
//!   the mask into raw integer segments; the Hough detector by default.
//! - Lanes: greedy clustering and dominant-pair selection
//!   ([`crate::lanes`]).
//! - Decision: slope signs of the two dominant lanes
//!   ([`crate::decision`]).
//!
//! Modules
//! - [`params`] – configuration types validated by [`LaneDetector::new`].
//! - `pipeline` – the [`LaneDetector`] implementation and its frame errors.

pub mod params;
mod pipeline;

pub use params::{default_roi, DetectorError, DetectorParams};
pub use pipeline::{DetectionReport, FrameError, FrameOutcome, LaneDetector};
