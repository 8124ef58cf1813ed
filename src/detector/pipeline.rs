//! Detector pipeline driving one frame end-to-end.
//!
//! ```no_run
//! use lane_pilot::{DetectorParams, LaneDetector};
//! use lane_pilot::image::{FrameU8, PixelFormat};
//!
//! # fn example(rgb: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let detector = LaneDetector::new(DetectorParams::default())?;
//! let frame = FrameU8::packed(800, 600, PixelFormat::Rgb8, rgb);
//! match detector.process(&frame) {
//!     Ok(outcome) => println!("{}", outcome.decision),
//!     Err(err) => println!("no decision: {err}"),
//! }
//! # Ok(())
//! # }
//! ```
use super::params::{DetectorError, DetectorParams};
use crate::decision::Decision;
use crate::diagnostics::{elapsed_ms, FrameReport, InputDescriptor};
use crate::image::{FrameU8, GrayImageU8};
use crate::lanes::{extract_lanes, DominantLanes, LaneOptions, NoLanesFound};
use crate::preprocess::{PreprocessError, Preprocessor, RoiPolygon};
use crate::segments::{HoughSegmentDetector, SegmentDetector};
use log::debug;
use std::time::Instant;

/// Successful outcome of one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutcome {
    pub decision: Decision,
    pub lanes: DominantLanes,
}

/// Why a frame produced no decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameError {
    Preprocess(PreprocessError),
    NoLanes(NoLanesFound),
}

impl FrameError {
    /// Short label used for failure tallies.
    pub fn kind(&self) -> &'static str {
        match self {
            FrameError::Preprocess(PreprocessError::ConfigurationMismatch { .. }) => {
                "configuration_mismatch"
            }
            FrameError::Preprocess(PreprocessError::InvalidFrame { .. }) => "invalid_frame",
            FrameError::Preprocess(PreprocessError::InvalidParams(_)) => "invalid_params",
            FrameError::NoLanes(_) => "no_lanes",
        }
    }
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Preprocess(err) => write!(f, "preprocessing failed: {err}"),
            FrameError::NoLanes(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Preprocess(err) => Some(err),
            FrameError::NoLanes(err) => Some(err),
        }
    }
}

impl From<PreprocessError> for FrameError {
    fn from(err: PreprocessError) -> Self {
        FrameError::Preprocess(err)
    }
}

impl From<NoLanesFound> for FrameError {
    fn from(err: NoLanesFound) -> Self {
        FrameError::NoLanes(err)
    }
}

/// Result of [`LaneDetector::process_with_diagnostics`].
#[derive(Clone, Debug)]
pub struct DetectionReport {
    pub outcome: Result<FrameOutcome, FrameError>,
    /// Masked edge image; `None` when preprocessing failed.
    pub mask: Option<GrayImageU8>,
    pub trace: FrameReport,
}

/// Lane detector for a fixed frame geometry.
///
/// Holds no per-frame state: every call to [`process`](Self::process) is a
/// pure function of the frame and the configuration.
#[derive(Clone, Debug)]
pub struct LaneDetector<D = HoughSegmentDetector> {
    preprocessor: Preprocessor,
    segment_detector: D,
    lanes: LaneOptions,
}

impl LaneDetector<HoughSegmentDetector> {
    /// Validate `params` and build a detector with the Hough segment stage.
    pub fn new(params: DetectorParams) -> Result<Self, DetectorError> {
        let segment_detector = HoughSegmentDetector::new(params.hough);
        Self::with_segment_detector(params, segment_detector)
    }
}

impl<D: SegmentDetector> LaneDetector<D> {
    /// Build a detector around a custom segment stage.
    pub fn with_segment_detector(
        params: DetectorParams,
        segment_detector: D,
    ) -> Result<Self, DetectorError> {
        let roi = RoiPolygon::new(params.roi.clone(), params.frame_width, params.frame_height)?;
        let preprocessor = Preprocessor::new(&roi, params.preprocess)?;
        params.lanes.validate()?;
        params.check_geometry()?;
        Ok(Self {
            preprocessor,
            segment_detector,
            lanes: params.lanes,
        })
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn segment_detector(&self) -> &D {
        &self.segment_detector
    }

    pub fn lane_options(&self) -> &LaneOptions {
        &self.lanes
    }

    /// Run the detector on one frame, returning only the outcome.
    pub fn process(&self, frame: &FrameU8<'_>) -> Result<FrameOutcome, FrameError> {
        self.process_with_diagnostics(frame).outcome
    }

    /// Run the detector and return the outcome together with a detailed trace.
    pub fn process_with_diagnostics(&self, frame: &FrameU8<'_>) -> DetectionReport {
        debug!("LaneDetector::process start w={} h={}", frame.w, frame.h);
        let total_start = Instant::now();
        let mut trace = FrameReport::new(InputDescriptor {
            width: frame.w,
            height: frame.h,
        });

        let pre_start = Instant::now();
        let mask = match self.preprocessor.run(frame) {
            Ok(mask) => mask,
            Err(err) => {
                trace.timings.push("preprocess", elapsed_ms(pre_start));
                trace.timings.total_ms = elapsed_ms(total_start);
                let err = FrameError::from(err);
                trace.failure = Some(err.to_string());
                debug!("LaneDetector::process failed: {err}");
                return DetectionReport {
                    outcome: Err(err),
                    mask: None,
                    trace,
                };
            }
        };
        trace.timings.push("preprocess", elapsed_ms(pre_start));
        trace.edge_pixels = mask.count_nonzero();

        let seg_start = Instant::now();
        let segments = self.segment_detector.detect_segments(mask.as_view());
        trace.timings.push("segments", elapsed_ms(seg_start));

        let lanes_start = Instant::now();
        let extraction = extract_lanes(&segments, &self.lanes);
        let dominant = extraction.dominant();
        trace.timings.push("lanes", elapsed_ms(lanes_start));
        trace.record_extraction(&extraction);

        let outcome = dominant.map_err(FrameError::from).map(|lanes| FrameOutcome {
            decision: Decision::from_lanes(&lanes),
            lanes,
        });
        match &outcome {
            Ok(found) => {
                trace.lanes = Some(found.lanes);
                trace.decision = Some(found.decision);
            }
            Err(err) => trace.failure = Some(err.to_string()),
        }
        trace.timings.total_ms = elapsed_ms(total_start);
        debug!(
            "LaneDetector::process done segments={} clusters={} decision={:?} total_ms={:.3}",
            trace.segments,
            trace.clusters.len(),
            trace.decision,
            trace.timings.total_ms
        );

        DetectionReport {
            outcome,
            mask: Some(mask),
            trace,
        }
    }
}
