//! Line-segment detection on binary edge masks.
//!
//! The lane engine consumes segments through [`SegmentDetector`] and relies
//! only on two properties of an implementation:
//!
//! - identical masks produce identical segment sequences (same order);
//! - coordinates are integer pixel positions inside the mask.
//!
//! [`HoughSegmentDetector`] is the in-crate implementation. It votes every
//! edge pixel into a (θ, ρ) accumulator, visits peaks in a fixed order and
//! walks each peak line across the mask to cut it into segments, bridging
//! gaps up to `max_line_gap` and discarding pieces shorter than
//! `min_line_length`. Pixels that contributed to an emitted segment are
//! consumed so near-duplicate peaks do not report the same piece twice.

mod hough;
mod options;
mod segment;

pub use hough::HoughSegmentDetector;
pub use options::HoughOptions;
pub use segment::RawSegment;

use crate::image::ImageU8;

/// Source of raw line segments for one edge mask.
pub trait SegmentDetector {
    /// Detect segments in `mask` (nonzero = edge), in a stable order.
    fn detect_segments(&self, mask: ImageU8<'_>) -> Vec<RawSegment>;
}

/// Detector returning a fixed list, independent of the mask.
///
/// Useful for replaying recorded detections through the lane engine.
#[derive(Clone, Debug, Default)]
pub struct FixedSegments(pub Vec<RawSegment>);

impl SegmentDetector for FixedSegments {
    fn detect_segments(&self, _mask: ImageU8<'_>) -> Vec<RawSegment> {
        self.0.clone()
    }
}
