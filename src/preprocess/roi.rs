//! Region-of-interest polygon and its rasterised mask.
//!
//! The polygon is validated once when it is built: it needs at least three
//! vertices inside the `[0, width] × [0, height]` coordinate space, a nonzero
//! area, and no self-intersections. The mask is rasterised at the same time
//! so per-frame masking is a single pass over the pixels.
//!
//! Rasterisation samples pixel centres with the even–odd rule; a pixel is
//! inside when `(x + 0.5, y + 0.5)` lies within the polygon.
use crate::image::{GrayImageU8, ImageView, ImageViewMut};
use nalgebra::{Point2, Vector2};
use serde::Serialize;

/// Reasons a polygon is rejected at configuration time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoiError {
    TooFewVertices {
        found: usize,
    },
    VertexOutOfBounds {
        index: usize,
        vertex: [i32; 2],
        width: usize,
        height: usize,
    },
    ZeroArea,
    SelfIntersecting {
        edge_a: usize,
        edge_b: usize,
    },
}

impl std::fmt::Display for RoiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoiError::TooFewVertices { found } => {
                write!(f, "ROI polygon needs at least 3 vertices, got {found}")
            }
            RoiError::VertexOutOfBounds {
                index,
                vertex,
                width,
                height,
            } => write!(
                f,
                "ROI vertex {index} at ({}, {}) lies outside the {width}x{height} frame",
                vertex[0], vertex[1]
            ),
            RoiError::ZeroArea => write!(f, "ROI polygon has zero area"),
            RoiError::SelfIntersecting { edge_a, edge_b } => {
                write!(f, "ROI polygon edges {edge_a} and {edge_b} intersect")
            }
        }
    }
}

impl std::error::Error for RoiError {}

/// Validated simple polygon in frame pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoiPolygon {
    vertices: Vec<[i32; 2]>,
    width: usize,
    height: usize,
}

impl RoiPolygon {
    pub fn new(vertices: Vec<[i32; 2]>, width: usize, height: usize) -> Result<Self, RoiError> {
        if vertices.len() < 3 {
            return Err(RoiError::TooFewVertices {
                found: vertices.len(),
            });
        }
        for (index, v) in vertices.iter().enumerate() {
            let in_x = v[0] >= 0 && v[0] as usize <= width;
            let in_y = v[1] >= 0 && v[1] as usize <= height;
            if !in_x || !in_y {
                return Err(RoiError::VertexOutOfBounds {
                    index,
                    vertex: *v,
                    width,
                    height,
                });
            }
        }
        let points: Vec<Point2<i64>> = vertices
            .iter()
            .map(|v| Point2::new(v[0] as i64, v[1] as i64))
            .collect();
        if twice_signed_area(&points) == 0 {
            return Err(RoiError::ZeroArea);
        }
        if let Some((edge_a, edge_b)) = find_self_intersection(&points) {
            return Err(RoiError::SelfIntersecting { edge_a, edge_b });
        }
        Ok(Self {
            vertices,
            width,
            height,
        })
    }

    pub fn vertices(&self) -> &[[i32; 2]] {
        &self.vertices
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Rasterise into a reusable mask.
    pub fn rasterize(&self) -> RoiMask {
        let mut mask = GrayImageU8::new(self.width, self.height);
        let n = self.vertices.len();
        let mut crossings: Vec<f64> = Vec::with_capacity(n);
        for y in 0..self.height {
            let yc = y as f64 + 0.5;
            crossings.clear();
            for i in 0..n {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                let (ay, by) = (a[1] as f64, b[1] as f64);
                // half-open span so shared vertices are counted once
                if (ay <= yc && yc < by) || (by <= yc && yc < ay) {
                    let t = (yc - ay) / (by - ay);
                    crossings.push(a[0] as f64 + t * (b[0] - a[0]) as f64);
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            let row = mask.row_mut(y);
            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil().max(0.0) as usize;
                let end = (pair[1] - 0.5).floor();
                if end < 0.0 {
                    continue;
                }
                let end = (end as usize).min(self.width.saturating_sub(1));
                for px in row.iter_mut().take(end + 1).skip(start) {
                    *px = 255;
                }
            }
        }
        RoiMask { mask }
    }
}

/// Rasterised ROI: 255 inside, 0 outside.
#[derive(Clone, Debug)]
pub struct RoiMask {
    mask: GrayImageU8,
}

impl RoiMask {
    pub fn width(&self) -> usize {
        self.mask.width()
    }

    pub fn height(&self) -> usize {
        self.mask.height()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.mask.width() && y < self.mask.height() && self.mask.get(x, y) != 0
    }

    pub fn as_image(&self) -> &GrayImageU8 {
        &self.mask
    }

    /// Zero every pixel of `img` outside the ROI. Sizes must match.
    pub fn apply(&self, img: &mut GrayImageU8) {
        debug_assert_eq!(
            (img.width(), img.height()),
            (self.mask.width(), self.mask.height())
        );
        for y in 0..img.height().min(self.mask.height()) {
            let keep = self.mask.row(y);
            for (px, &k) in img.row_mut(y).iter_mut().zip(keep) {
                *px &= k;
            }
        }
    }
}

fn twice_signed_area(points: &[Point2<i64>]) -> i64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}

#[inline]
fn cross(u: Vector2<i64>, v: Vector2<i64>) -> i64 {
    u.x * v.y - u.y * v.x
}

fn orientation(a: Point2<i64>, b: Point2<i64>, c: Point2<i64>) -> i64 {
    cross(b - a, c - a).signum()
}

fn on_segment(a: Point2<i64>, b: Point2<i64>, p: Point2<i64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(p1: Point2<i64>, p2: Point2<i64>, q1: Point2<i64>, q2: Point2<i64>) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);
    if o1 != o2 && o3 != o4 && o1 != 0 && o2 != 0 && o3 != 0 && o4 != 0 {
        return true;
    }
    (o1 == 0 && on_segment(p1, p2, q1))
        || (o2 == 0 && on_segment(p1, p2, q2))
        || (o3 == 0 && on_segment(q1, q2, p1))
        || (o4 == 0 && on_segment(q1, q2, p2))
}

/// Returns the first pair of intersecting edges, if any. Adjacent edges may
/// share their common vertex but must not fold back onto each other.
fn find_self_intersection(points: &[Point2<i64>]) -> Option<(usize, usize)> {
    let n = points.len();
    let edge = |i: usize| (points[i], points[(i + 1) % n]);
    for i in 0..n {
        let (a0, a1) = edge(i);
        if a0 == a1 {
            return Some((i, i));
        }
        for j in i + 1..n {
            let (b0, b1) = edge(j);
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                // shared vertex is expected; a collinear overlap is not
                let (shared, other_a, other_b) = if j == i + 1 {
                    (a1, a0, b1)
                } else {
                    (a0, a1, b0)
                };
                let folds = orientation(other_a, shared, other_b) == 0
                    && (other_b - shared).dot(&(other_a - shared)) > 0;
                if folds {
                    return Some((i, j));
                }
                continue;
            }
            if segments_intersect(a0, a1, b0, b1) {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trapezoid used by the reference lane follower on an 800x600 capture.
    fn road_vertices() -> Vec<[i32; 2]> {
        vec![
            [10, 500],
            [28, 360],
            [350, 320],
            [450, 320],
            [750, 360],
            [800, 500],
        ]
    }

    #[test]
    fn road_trapezoid_is_accepted() {
        let roi = RoiPolygon::new(road_vertices(), 800, 600).expect("valid polygon");
        let mask = roi.rasterize();
        assert!(mask.contains(400, 400));
        assert!(!mask.contains(400, 100));
        assert!(!mask.contains(5, 450));
        assert!(!mask.contains(400, 550));
    }

    #[test]
    fn bow_tie_is_rejected() {
        let err = RoiPolygon::new(vec![[0, 0], [10, 10], [10, 0], [0, 4]], 20, 20)
            .expect_err("self-intersecting");
        assert!(matches!(err, RoiError::SelfIntersecting { .. }));
    }

    #[test]
    fn degenerate_polygons_are_rejected() {
        assert_eq!(
            RoiPolygon::new(vec![[0, 0], [5, 5]], 10, 10),
            Err(RoiError::TooFewVertices { found: 2 })
        );
        assert_eq!(
            RoiPolygon::new(vec![[0, 0], [5, 5], [9, 9]], 10, 10),
            Err(RoiError::ZeroArea)
        );
        assert!(matches!(
            RoiPolygon::new(vec![[0, 0], [11, 0], [5, 5]], 10, 10),
            Err(RoiError::VertexOutOfBounds { index: 1, .. })
        ));
    }

    #[test]
    fn apply_zeroes_outside_pixels() {
        let roi = RoiPolygon::new(vec![[2, 2], [6, 2], [6, 6], [2, 6]], 8, 8).expect("square");
        let mask = roi.rasterize();
        let mut img = GrayImageU8::from_raw(8, 8, vec![200; 64]).expect("sized buffer");
        mask.apply(&mut img);
        assert_eq!(img.get(3, 3), 200);
        assert_eq!(img.get(5, 5), 200);
        assert_eq!(img.get(6, 3), 0);
        assert_eq!(img.get(1, 3), 0);
        assert_eq!(img.count_nonzero(), 16);
    }
}
