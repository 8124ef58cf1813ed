//! Frame preprocessing: intensity → Canny edges → Gaussian blur → ROI mask.
//!
//! The stage order is fixed. Edges are detected on the unblurred intensity
//! image and the binary edge map is then blurred, which widens each edge to a
//! few pixels and gives the segment detector more votes per line. Any nonzero
//! output pixel counts as an edge.
//!
//! Parameters and the ROI are validated once (see [`PreprocessParams::validate`]
//! and [`RoiPolygon::new`]); per-frame failures are limited to frames that do
//! not match the configured geometry.

pub mod blur;
pub mod gray;
pub mod roi;

pub use blur::{blur_u8, GaussianKernel, SeparableFilter};
pub use gray::to_intensity;
pub use roi::{RoiError, RoiMask, RoiPolygon};

use crate::edges::{canny, CannyThresholds};
use crate::image::{FrameU8, GrayImageU8};
use serde::{Deserialize, Serialize};

/// Edge and smoothing parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessParams {
    /// Hysteresis low threshold (Sobel magnitude units).
    pub low_threshold: f32,
    /// Hysteresis high threshold (Sobel magnitude units).
    pub high_threshold: f32,
    /// Odd Gaussian kernel size applied to the edge map.
    pub blur_kernel: usize,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            low_threshold: 150.0,
            high_threshold: 300.0,
            blur_kernel: 3,
        }
    }
}

/// Invalid preprocessing parameters, reported at configuration time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamsError {
    InvalidThresholds { low: f32, high: f32 },
    InvalidBlurKernel { size: usize },
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamsError::InvalidThresholds { low, high } => write!(
                f,
                "edge thresholds must be finite with 0 <= low < high (low={low}, high={high})"
            ),
            ParamsError::InvalidBlurKernel { size } => {
                write!(f, "blur kernel must be a positive odd size, got {size}")
            }
        }
    }
}

impl std::error::Error for ParamsError {}

impl PreprocessParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        let (low, high) = (self.low_threshold, self.high_threshold);
        if !low.is_finite() || !high.is_finite() || low < 0.0 || low >= high {
            return Err(ParamsError::InvalidThresholds { low, high });
        }
        if self.blur_kernel == 0 || self.blur_kernel % 2 == 0 {
            return Err(ParamsError::InvalidBlurKernel {
                size: self.blur_kernel,
            });
        }
        Ok(())
    }

    pub fn thresholds(&self) -> CannyThresholds {
        CannyThresholds {
            low: self.low_threshold,
            high: self.high_threshold,
        }
    }
}

/// Per-frame preprocessing failures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PreprocessError {
    /// Frame size differs from the ROI coordinate space.
    ConfigurationMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Frame buffer is shorter than its declared layout.
    InvalidFrame {
        width: usize,
        height: usize,
        stride: usize,
        len: usize,
    },
    /// Parameters passed directly to [`preprocess`] failed validation.
    InvalidParams(ParamsError),
}

impl std::fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreprocessError::ConfigurationMismatch { expected, found } => write!(
                f,
                "frame is {}x{} but the ROI is configured for {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            PreprocessError::InvalidFrame {
                width,
                height,
                stride,
                len,
            } => write!(
                f,
                "frame buffer of {len} bytes cannot hold {width}x{height} at stride {stride}"
            ),
            PreprocessError::InvalidParams(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PreprocessError {}

/// Run the full preprocessing chain on one frame.
///
/// Fails with [`PreprocessError::ConfigurationMismatch`] rather than clipping
/// when the frame and the ROI disagree on size.
pub fn preprocess(
    frame: &FrameU8<'_>,
    roi: &RoiMask,
    params: &PreprocessParams,
) -> Result<GrayImageU8, PreprocessError> {
    params.validate().map_err(PreprocessError::InvalidParams)?;
    let kernel = GaussianKernel::new(params.blur_kernel).ok_or(
        PreprocessError::InvalidParams(ParamsError::InvalidBlurKernel {
            size: params.blur_kernel,
        }),
    )?;
    preprocess_with_kernel(frame, roi, params.thresholds(), &kernel)
}

pub(crate) fn preprocess_with_kernel(
    frame: &FrameU8<'_>,
    roi: &RoiMask,
    thresholds: CannyThresholds,
    kernel: &GaussianKernel,
) -> Result<GrayImageU8, PreprocessError> {
    if (frame.w, frame.h) != (roi.width(), roi.height()) {
        return Err(PreprocessError::ConfigurationMismatch {
            expected: (roi.width(), roi.height()),
            found: (frame.w, frame.h),
        });
    }
    if !frame.is_well_formed() {
        return Err(PreprocessError::InvalidFrame {
            width: frame.w,
            height: frame.h,
            stride: frame.stride,
            len: frame.data.len(),
        });
    }
    let intensity = to_intensity(frame);
    let edges = canny(&intensity, thresholds);
    let mut masked = blur_u8(&edges, kernel);
    roi.apply(&mut masked);
    Ok(masked)
}

/// Preprocessing stage with its configuration validated up front.
#[derive(Clone, Debug)]
pub struct Preprocessor {
    roi: RoiMask,
    params: PreprocessParams,
    kernel: GaussianKernel,
}

impl Preprocessor {
    pub fn new(roi: &RoiPolygon, params: PreprocessParams) -> Result<Self, ParamsError> {
        params.validate()?;
        let kernel = GaussianKernel::new(params.blur_kernel).ok_or(
            ParamsError::InvalidBlurKernel {
                size: params.blur_kernel,
            },
        )?;
        Ok(Self {
            roi: roi.rasterize(),
            params,
            kernel,
        })
    }

    pub fn params(&self) -> &PreprocessParams {
        &self.params
    }

    pub fn roi(&self) -> &RoiMask {
        &self.roi
    }

    pub fn run(&self, frame: &FrameU8<'_>) -> Result<GrayImageU8, PreprocessError> {
        preprocess_with_kernel(frame, &self.roi, self.params.thresholds(), &self.kernel)
    }
}
