//! Separable Gaussian blur on 8-bit buffers.
use crate::image::{GrayImageU8, ImageF32, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];
}

/// Normalised 1D Gaussian with an odd number of taps.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    taps: Vec<f32>,
}

impl GaussianKernel {
    /// Build a kernel of `size` taps. Sigma follows the usual size-derived
    /// rule `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
    ///
    /// Returns `None` for even or zero sizes.
    pub fn new(size: usize) -> Option<Self> {
        if size == 0 || size % 2 == 0 {
            return None;
        }
        let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
        Some(Self::with_sigma(size, sigma))
    }

    fn with_sigma(size: usize, sigma: f32) -> Self {
        let radius = (size / 2) as f32;
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f32> = (0..size)
            .map(|i| {
                let d = i as f32 - radius;
                (-d * d / denom).exp()
            })
            .collect();
        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self { taps }
    }
}

impl SeparableFilter for GaussianKernel {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// Blur an 8-bit image with a separable filter, replicating borders.
pub fn blur_u8<F: SeparableFilter>(src: &GrayImageU8, filter: &F) -> GrayImageU8 {
    let (w, h) = (src.width(), src.height());
    let taps = filter.taps();
    if w == 0 || h == 0 || taps.len() <= 1 {
        return src.clone();
    }
    let radius = taps.len() / 2;

    let mut horiz = ImageF32::new(w, h);
    for y in 0..h {
        let row = src.row(y);
        let out = horiz.row_mut(y);
        for (x, dst_px) in out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let idx = clamp_index(x as isize + k as isize - radius as isize, w);
                acc += tap * row[idx] as f32;
            }
            *dst_px = acc;
        }
    }

    let mut out = GrayImageU8::new(w, h);
    for y in 0..h {
        let dst = out.row_mut(y);
        for (x, dst_px) in dst.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sy = clamp_index(y as isize + k as isize - radius as isize, h);
                acc += tap * horiz.get(x, sy);
            }
            *dst_px = acc.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

fn clamp_index(idx: isize, upper: usize) -> usize {
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}
