//! Frame → intensity conversion (BT.601 luma, 0–255 range).
use crate::image::{FrameU8, ImageF32, ImageViewMut, PixelFormat};

const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Convert an interleaved frame into a single-channel intensity image.
///
/// The caller must have checked `frame.is_well_formed()`.
pub fn to_intensity(frame: &FrameU8<'_>) -> ImageF32 {
    let mut out = ImageF32::new(frame.w, frame.h);
    let channels = frame.format.channels();
    for y in 0..frame.h {
        let src = frame.row(y);
        let dst = out.row_mut(y);
        for (x, px) in src.chunks_exact(channels).enumerate() {
            dst[x] = match frame.format {
                PixelFormat::Gray8 => px[0] as f32,
                PixelFormat::Rgb8 => luma(px[0], px[1], px[2]),
                PixelFormat::Bgr8 | PixelFormat::Bgra8 => luma(px[2], px[1], px[0]),
            };
        }
    }
    out
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> f32 {
    LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32
}
