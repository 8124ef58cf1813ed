use super::options::HoughOptions;
use super::segment::RawSegment;
use super::SegmentDetector;
use crate::image::{ImageU8, ImageView};
use log::debug;

/// Deterministic Hough-style segment detector.
#[derive(Clone, Debug, Default)]
pub struct HoughSegmentDetector {
    options: HoughOptions,
}

struct Accumulator {
    n_theta: usize,
    n_rho: usize,
    rho_offset: f32,
    cos: Vec<f32>,
    sin: Vec<f32>,
    votes: Vec<u32>,
}

impl Accumulator {
    fn new(w: usize, h: usize, options: &HoughOptions) -> Self {
        let n_theta = ((std::f32::consts::PI / options.theta).round() as usize).max(1);
        let max_rho = ((w * w + h * h) as f32).sqrt().ceil();
        let n_rho = (2.0 * max_rho / options.rho).ceil() as usize + 1;
        let (cos, sin) = (0..n_theta)
            .map(|t| {
                let angle = t as f32 * options.theta;
                (angle.cos(), angle.sin())
            })
            .unzip();
        Self {
            n_theta,
            n_rho,
            rho_offset: max_rho,
            cos,
            sin,
            votes: vec![0; n_theta * n_rho],
        }
    }

    fn vote(&mut self, x: usize, y: usize, rho_res: f32) {
        let (xf, yf) = (x as f32, y as f32);
        for t in 0..self.n_theta {
            let rho = xf * self.cos[t] + yf * self.sin[t];
            let r = ((rho + self.rho_offset) / rho_res).round() as usize;
            if r < self.n_rho {
                self.votes[t * self.n_rho + r] += 1;
            }
        }
    }

    /// Cells at or above `threshold`, strongest first, ties by cell index.
    fn peaks(&self, threshold: u32) -> Vec<(usize, usize)> {
        let mut cells: Vec<(u32, usize)> = self
            .votes
            .iter()
            .enumerate()
            .filter(|(_, &v)| v >= threshold)
            .map(|(i, &v)| (v, i))
            .collect();
        cells.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        cells
            .into_iter()
            .map(|(_, i)| (i / self.n_rho, i % self.n_rho))
            .collect()
    }
}

struct Run {
    start: (i32, i32),
    end: (i32, i32),
    pixels: Vec<(usize, usize)>,
}

impl HoughSegmentDetector {
    pub fn new(options: HoughOptions) -> Self {
        Self {
            options: options.sanitized(),
        }
    }

    pub fn options(&self) -> &HoughOptions {
        &self.options
    }

    /// Pixel positions visited when walking the line `x cosθ + y sinθ = ρ`
    /// across a `w × h` image, one step per pixel along the major axis.
    fn walk(cos: f32, sin: f32, rho: f32, w: usize, h: usize) -> Vec<Option<(usize, usize)>> {
        let mut path = Vec::new();
        if sin.abs() >= cos.abs() {
            for x in 0..w {
                let y = ((rho - x as f32 * cos) / sin).round();
                path.push((y >= 0.0 && (y as usize) < h).then(|| (x, y as usize)));
            }
        } else {
            for y in 0..h {
                let x = ((rho - y as f32 * sin) / cos).round();
                path.push((x >= 0.0 && (x as usize) < w).then(|| (x as usize, y)));
            }
        }
        path
    }

    fn runs_along(
        &self,
        path: &[Option<(usize, usize)>],
        is_free_edge: impl Fn(usize, usize) -> bool,
    ) -> Vec<Run> {
        let mut runs = Vec::new();
        let mut current: Option<Run> = None;
        let mut gap = 0u32;
        for step in path {
            let hit = step.filter(|&(x, y)| is_free_edge(x, y));
            if let Some((x, y)) = hit {
                gap = 0;
                let pos = (x as i32, y as i32);
                if let Some(run) = current.as_mut() {
                    run.end = pos;
                    run.pixels.push((x, y));
                } else {
                    current = Some(Run {
                        start: pos,
                        end: pos,
                        pixels: vec![(x, y)],
                    });
                }
            } else if current.is_some() {
                gap += 1;
                if gap > self.options.max_line_gap {
                    runs.extend(current.take());
                }
            }
        }
        runs.extend(current);
        runs
    }

    fn long_enough(&self, run: &Run) -> bool {
        let dx = (run.end.0 - run.start.0).unsigned_abs();
        let dy = (run.end.1 - run.start.1).unsigned_abs();
        dx.max(dy) >= self.options.min_line_length
    }
}

impl SegmentDetector for HoughSegmentDetector {
    fn detect_segments(&self, mask: ImageU8<'_>) -> Vec<RawSegment> {
        let (w, h) = (mask.width(), mask.height());
        if w == 0 || h == 0 {
            return Vec::new();
        }

        let mut acc = Accumulator::new(w, h, &self.options);
        let mut edge_count = 0usize;
        for y in 0..h {
            for (x, &px) in mask.row(y).iter().enumerate() {
                if px != 0 {
                    acc.vote(x, y, self.options.rho);
                    edge_count += 1;
                }
            }
        }

        let peaks = acc.peaks(self.options.threshold);
        let mut consumed = vec![false; w * h];
        let radius = self.options.consume_radius as usize;
        let cap = self.options.max_segments.unwrap_or(usize::MAX);
        let mut segments = Vec::new();

        'peaks: for &(t, r) in &peaks {
            let rho = r as f32 * self.options.rho - acc.rho_offset;
            let path = Self::walk(acc.cos[t], acc.sin[t], rho, w, h);
            let runs = self.runs_along(&path, |x, y| mask.get(x, y) != 0 && !consumed[y * w + x]);
            for run in runs.into_iter().filter(|run| self.long_enough(run)) {
                for &(px, py) in &run.pixels {
                    let (x0, x1) = (px.saturating_sub(radius), (px + radius).min(w - 1));
                    let (y0, y1) = (py.saturating_sub(radius), (py + radius).min(h - 1));
                    for cy in y0..=y1 {
                        for cx in x0..=x1 {
                            consumed[cy * w + cx] = true;
                        }
                    }
                }
                segments.push(RawSegment::new(
                    run.start.0,
                    run.start.1,
                    run.end.0,
                    run.end.1,
                ));
                if segments.len() >= cap {
                    break 'peaks;
                }
            }
        }

        debug!(
            "Hough: {} edge px, {} peaks >= {} votes, {} segments",
            edge_count,
            peaks.len(),
            self.options.threshold,
            segments.len()
        );
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImageU8;

    fn draw_line(img: &mut GrayImageU8, from: (i32, i32), to: (i32, i32)) {
        let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs());
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = from.0 as f32 + t * (to.0 - from.0) as f32;
            let y = from.1 as f32 + t * (to.1 - from.1) as f32;
            img.set(x.round() as usize, y.round() as usize, 255);
        }
    }

    fn options() -> HoughOptions {
        HoughOptions {
            threshold: 30,
            min_line_length: 20,
            ..Default::default()
        }
    }

    #[test]
    fn finds_a_diagonal_line() {
        let mut img = GrayImageU8::new(120, 120);
        draw_line(&mut img, (10, 100), (90, 20));
        let detector = HoughSegmentDetector::new(options());
        let segs = detector.detect_segments(img.as_view());
        assert!(!segs.is_empty());
        let longest = segs
            .iter()
            .max_by(|a, b| a.length().total_cmp(&b.length()))
            .expect("at least one segment");
        assert!(longest.length() > 100.0, "got {longest:?}");
        let slope = (longest.y2 - longest.y1) as f64 / (longest.x2 - longest.x1) as f64;
        assert!((slope + 1.0).abs() < 0.05, "slope={slope}");
    }

    #[test]
    fn empty_mask_has_no_segments() {
        let img = GrayImageU8::new(64, 48);
        let detector = HoughSegmentDetector::new(options());
        assert!(detector.detect_segments(img.as_view()).is_empty());
    }

    #[test]
    fn output_is_repeatable() {
        let mut img = GrayImageU8::new(100, 100);
        draw_line(&mut img, (5, 90), (60, 10));
        draw_line(&mut img, (95, 90), (40, 10));
        let detector = HoughSegmentDetector::new(options());
        let a = detector.detect_segments(img.as_view());
        let b = detector.detect_segments(img.as_view());
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn max_segments_caps_output() {
        let mut img = GrayImageU8::new(100, 100);
        draw_line(&mut img, (5, 90), (60, 10));
        draw_line(&mut img, (95, 90), (40, 10));
        let detector = HoughSegmentDetector::new(HoughOptions {
            max_segments: Some(1),
            ..options()
        });
        assert_eq!(detector.detect_segments(img.as_view()).len(), 1);
    }
}
