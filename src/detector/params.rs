//! Parameter types configuring the detector stages.
//!
//! [`DetectorParams`] gathers everything a [`LaneDetector`](super::LaneDetector)
//! needs: the frame geometry shared by the ROI and the lane engine, the edge
//! and blur settings, the segment detector and the clustering options. All of
//! it is validated once in [`LaneDetector::new`](super::LaneDetector::new).

use crate::lanes::{LaneOptions, LaneOptionsError};
use crate::preprocess::{ParamsError, PreprocessParams, RoiError};
use crate::segments::HoughOptions;

/// Detector-wide parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorParams {
    /// Expected frame width in pixels.
    pub frame_width: usize,
    /// Expected frame height in pixels.
    pub frame_height: usize,
    /// Region-of-interest polygon in frame pixel coordinates.
    pub roi: Vec<[i32; 2]>,
    pub preprocess: PreprocessParams,
    pub hough: HoughOptions,
    pub lanes: LaneOptions,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            frame_width: 800,
            frame_height: 600,
            roi: default_roi(),
            preprocess: PreprocessParams::default(),
            hough: HoughOptions::default(),
            lanes: LaneOptions::default(),
        }
    }
}

impl DetectorParams {
    /// Check that the lane engine projects onto the same frame the ROI is
    /// defined on.
    pub fn check_geometry(&self) -> Result<(), DetectorError> {
        let max_y_ok = self.lanes.max_y > 0 && self.lanes.max_y as usize <= self.frame_height;
        if self.lanes.frame_width != self.frame_width || !max_y_ok {
            return Err(DetectorError::Geometry {
                frame: (self.frame_width, self.frame_height),
                lanes_width: self.lanes.frame_width,
                max_y: self.lanes.max_y,
            });
        }
        Ok(())
    }
}

/// Road trapezoid in front of the vehicle on an 800×600 frame.
pub fn default_roi() -> Vec<[i32; 2]> {
    vec![
        [10, 500],
        [28, 360],
        [350, 320],
        [450, 320],
        [750, 360],
        [800, 500],
    ]
}

/// Invalid detector configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum DetectorError {
    Roi(RoiError),
    Preprocess(ParamsError),
    Lanes(LaneOptionsError),
    /// Lane options disagree with the frame size.
    Geometry {
        frame: (usize, usize),
        lanes_width: usize,
        max_y: i32,
    },
}

impl std::fmt::Display for DetectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectorError::Roi(err) => write!(f, "invalid region of interest: {err}"),
            DetectorError::Preprocess(err) => write!(f, "invalid preprocessing parameters: {err}"),
            DetectorError::Lanes(err) => write!(f, "invalid lane options: {err}"),
            DetectorError::Geometry {
                frame: (w, h),
                lanes_width,
                max_y,
            } => write!(
                f,
                "lane options (width {lanes_width}, max_y {max_y}) do not fit a {w}x{h} frame"
            ),
        }
    }
}

impl std::error::Error for DetectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DetectorError::Roi(err) => Some(err),
            DetectorError::Preprocess(err) => Some(err),
            DetectorError::Lanes(err) => Some(err),
            DetectorError::Geometry { .. } => None,
        }
    }
}

impl From<RoiError> for DetectorError {
    fn from(err: RoiError) -> Self {
        DetectorError::Roi(err)
    }
}

impl From<ParamsError> for DetectorError {
    fn from(err: ParamsError) -> Self {
        DetectorError::Preprocess(err)
    }
}

impl From<LaneOptionsError> for DetectorError {
    fn from(err: LaneOptionsError) -> Self {
        DetectorError::Lanes(err)
    }
}
