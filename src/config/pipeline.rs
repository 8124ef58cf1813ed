use crate::control::FallbackPolicy;
use crate::detector::{default_roi, DetectorParams};
use crate::lanes::LaneOptions;
use crate::preprocess::{PreprocessParams, RoiPolygon};
use crate::segments::HoughOptions;
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration shared by the lane tools.
#[derive(Debug, Deserialize)]
pub struct LanePilotConfig {
    #[serde(default)]
    pub frame: FrameConfig,
    /// ROI polygon in frame pixel coordinates.
    #[serde(default = "default_roi")]
    pub roi: Vec<[i32; 2]>,
    #[serde(default)]
    pub preprocess: PreprocessParams,
    #[serde(default)]
    pub hough: HoughConfig,
    #[serde(default)]
    pub lanes: LaneConfig,
    #[serde(default)]
    pub fallback: FallbackPolicy,
    /// Frames to process, in order.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Distance resolution in pixels.
    pub rho: f32,
    /// Angular resolution in degrees.
    pub theta_deg: f32,
    pub threshold: u32,
    pub min_line_length: u32,
    pub max_line_gap: u32,
    pub consume_radius: u32,
    pub max_segments: Option<usize>,
}

impl Default for HoughConfig {
    fn default() -> Self {
        let opts = HoughOptions::default();
        Self {
            rho: opts.rho,
            theta_deg: opts.theta.to_degrees(),
            threshold: opts.threshold,
            min_line_length: opts.min_line_length,
            max_line_gap: opts.max_line_gap,
            consume_radius: opts.consume_radius,
            max_segments: opts.max_segments,
        }
    }
}

impl HoughConfig {
    pub fn to_hough_options(&self) -> HoughOptions {
        HoughOptions {
            rho: self.rho,
            theta: self.theta_deg.to_radians(),
            threshold: self.threshold,
            min_line_length: self.min_line_length,
            max_line_gap: self.max_line_gap,
            consume_radius: self.consume_radius,
            max_segments: self.max_segments.filter(|&n| n > 0),
        }
        .sanitized()
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Projection bottom; the frame height when unset.
    pub max_y: Option<i32>,
    pub tolerance: f64,
    pub x_bound_margin: f64,
}

impl Default for LaneConfig {
    fn default() -> Self {
        let opts = LaneOptions::default();
        Self {
            max_y: None,
            tolerance: opts.tolerance,
            x_bound_margin: opts.x_bound_margin,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Masked edge image of the (first) processed frame.
    #[serde(default)]
    pub mask_image: Option<PathBuf>,
    /// JSON frame report(s).
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

impl LanePilotConfig {
    pub fn lane_options(&self) -> LaneOptions {
        let height = i32::try_from(self.frame.height).unwrap_or(i32::MAX);
        let max_y = match self.lanes.max_y {
            Some(y) if y > 0 => y,
            Some(y) => {
                warn!("lanes.max_y {y} must be positive, using frame height {height}");
                height
            }
            None => height,
        };
        LaneOptions {
            max_y,
            frame_width: self.frame.width,
            tolerance: self.lanes.tolerance,
            x_bound_margin: self.lanes.x_bound_margin,
        }
    }

    pub fn detector_params(&self) -> DetectorParams {
        DetectorParams {
            frame_width: self.frame.width,
            frame_height: self.frame.height,
            roi: self.roi.clone(),
            preprocess: self.preprocess,
            hough: self.hough.to_hough_options(),
            lanes: self.lane_options(),
        }
    }

    /// Check everything the detector validates, with tool-friendly messages.
    pub fn validate(&self) -> Result<(), String> {
        RoiPolygon::new(self.roi.clone(), self.frame.width, self.frame.height)
            .map_err(|e| format!("Invalid roi: {e}"))?;
        self.preprocess
            .validate()
            .map_err(|e| format!("Invalid preprocess section: {e}"))?;
        self.lane_options()
            .validate()
            .map_err(|e| format!("Invalid lanes section: {e}"))?;
        Ok(())
    }
}

/// Read and validate a JSON config.
pub fn load_config(path: &Path) -> Result<LanePilotConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config = parse_config(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    config
        .validate()
        .map_err(|e| format!("{e} (in {})", path.display()))?;
    Ok(config)
}

pub fn parse_config(json: &str) -> Result<LanePilotConfig, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = parse_config("{}").expect("parse");
        assert!(config.validate().is_ok());
        let params = config.detector_params();
        let defaults = DetectorParams::default();
        assert_eq!(params.roi, defaults.roi);
        assert_eq!(params.preprocess, defaults.preprocess);
        assert_eq!(params.lanes, defaults.lanes);
        assert_eq!(params.hough.threshold, defaults.hough.threshold);
        assert!((params.hough.theta - defaults.hough.theta).abs() < 1e-7);
        assert_eq!(config.fallback, FallbackPolicy::Straight);
        assert!(config.inputs.is_empty());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = parse_config(
            r#"{
                "frame": { "width": 640, "height": 480 },
                "roi": [[0, 479], [320, 200], [639, 479]],
                "preprocess": { "blur_kernel": 5 },
                "hough": { "threshold": 60, "theta_deg": 2.0 },
                "lanes": { "tolerance": 0.25 },
                "fallback": "holdPrevious",
                "inputs": ["a.png", "b.png"],
                "output": { "report_json": "out/report.json" }
            }"#,
        )
        .expect("parse");
        assert!(config.validate().is_ok());
        let params = config.detector_params();
        assert_eq!(params.preprocess.blur_kernel, 5);
        assert_eq!(params.preprocess.low_threshold, 150.0);
        assert_eq!(params.hough.threshold, 60);
        assert!((params.hough.theta - 2.0f32.to_radians()).abs() < 1e-7);
        assert_eq!(params.hough.min_line_length, 15);
        assert_eq!(params.lanes.max_y, 480);
        assert_eq!(params.lanes.frame_width, 640);
        assert_eq!(params.lanes.tolerance, 0.25);
        assert_eq!(config.fallback, FallbackPolicy::HoldPrevious);
        assert_eq!(config.inputs.len(), 2);
        assert!(config.output.mask_image.is_none());
    }

    #[test]
    fn invalid_sections_are_reported() {
        let bad_roi = parse_config(r#"{ "roi": [[0, 0], [10, 10]] }"#).expect("parse");
        assert!(bad_roi.validate().unwrap_err().contains("roi"));
        let bad_kernel = parse_config(r#"{ "preprocess": { "blur_kernel": 4 } }"#).expect("parse");
        assert!(bad_kernel.validate().unwrap_err().contains("preprocess"));
        let bad_tol = parse_config(r#"{ "lanes": { "tolerance": 1.5 } }"#).expect("parse");
        assert!(bad_tol.validate().unwrap_err().contains("lanes"));
    }
}
