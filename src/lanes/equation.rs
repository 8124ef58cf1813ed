use super::options::LaneOptions;
use crate::segments::RawSegment;
use nalgebra::Vector4;
use serde::Serialize;

/// Segment reduced to `y = slope·x + intercept` and re-projected onto the
/// horizon (`min_y`) and the frame bottom (`max_y`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineEquation {
    pub slope: f64,
    pub intercept: f64,
    /// `[x_at_min_y, min_y, x_at_max_y, max_y]`
    pub endpoints: [f64; 4],
}

impl LineEquation {
    pub fn new(slope: f64, intercept: f64, endpoints: [f64; 4]) -> Self {
        Self {
            slope,
            intercept,
            endpoints,
        }
    }

    pub(crate) fn endpoints_vector(&self) -> Vector4<f64> {
        Vector4::from(self.endpoints)
    }
}

/// Why a segment was kept out of clustering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DegenerateSegment {
    /// `x1 == x2`; the slope is undefined.
    Vertical,
    /// Zero slope; the line never reaches the projection bounds.
    Horizontal,
    NonFinite,
    /// A re-projected endpoint falls far outside the frame.
    OutOfBounds { x_at_min_y: f64, x_at_max_y: f64 },
}

impl std::fmt::Display for DegenerateSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateSegment::Vertical => write!(f, "vertical"),
            DegenerateSegment::Horizontal => write!(f, "horizontal"),
            DegenerateSegment::NonFinite => write!(f, "non-finite fit"),
            DegenerateSegment::OutOfBounds {
                x_at_min_y,
                x_at_max_y,
            } => write!(
                f,
                "re-projected x out of bounds ({x_at_min_y:.1}, {x_at_max_y:.1})"
            ),
        }
    }
}

/// Fit the line through a segment's endpoints and project it onto
/// `y = min_y` and `y = options.max_y`.
pub fn fit_segment(
    segment: &RawSegment,
    min_y: i32,
    options: &LaneOptions,
) -> Result<LineEquation, DegenerateSegment> {
    if segment.is_vertical() {
        return Err(DegenerateSegment::Vertical);
    }
    let (x1, y1) = (segment.x1 as f64, segment.y1 as f64);
    let (x2, y2) = (segment.x2 as f64, segment.y2 as f64);
    let slope = (y2 - y1) / (x2 - x1);
    let intercept = y1 - slope * x1;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(DegenerateSegment::NonFinite);
    }
    if slope == 0.0 {
        return Err(DegenerateSegment::Horizontal);
    }

    let (top, bottom) = (min_y as f64, options.max_y as f64);
    let x_at_min_y = (top - intercept) / slope;
    let x_at_max_y = (bottom - intercept) / slope;
    let (lo, hi) = options.x_bounds();
    let inside = |x: f64| x.is_finite() && x >= lo && x <= hi;
    if !inside(x_at_min_y) || !inside(x_at_max_y) {
        return Err(DegenerateSegment::OutOfBounds {
            x_at_min_y,
            x_at_max_y,
        });
    }

    Ok(LineEquation {
        slope,
        intercept,
        endpoints: [x_at_min_y, top, x_at_max_y, bottom],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_projects_onto_bounds() {
        let seg = RawSegment::new(100, 300, 300, 500);
        let line = fit_segment(&seg, 300, &LaneOptions::default()).expect("usable segment");
        assert_eq!(line.slope, 1.0);
        assert_eq!(line.intercept, 200.0);
        assert_eq!(line.endpoints, [100.0, 300.0, 400.0, 600.0]);
    }

    #[test]
    fn endpoint_order_does_not_matter() {
        let opts = LaneOptions::default();
        let a = fit_segment(&RawSegment::new(700, 300, 500, 500), 300, &opts).expect("usable");
        let b = fit_segment(&RawSegment::new(500, 500, 700, 300), 300, &opts).expect("usable");
        assert_eq!(a, b);
        assert_eq!(a.slope, -1.0);
    }

    #[test]
    fn vertical_segment_is_rejected_before_division() {
        let seg = RawSegment::new(400, 320, 400, 560);
        assert_eq!(
            fit_segment(&seg, 320, &LaneOptions::default()),
            Err(DegenerateSegment::Vertical)
        );
    }

    #[test]
    fn horizontal_segment_is_rejected() {
        let seg = RawSegment::new(100, 400, 300, 400);
        assert_eq!(
            fit_segment(&seg, 320, &LaneOptions::default()),
            Err(DegenerateSegment::Horizontal)
        );
    }

    #[test]
    fn near_horizontal_segment_is_out_of_bounds() {
        // slope 1/400: the projection lands thousands of pixels off-screen
        let seg = RawSegment::new(0, 400, 400, 401);
        assert!(matches!(
            fit_segment(&seg, 320, &LaneOptions::default()),
            Err(DegenerateSegment::OutOfBounds { .. })
        ));
    }
}
