//! Captured video frames.
//!
//! A frame is an interleaved 8-bit buffer with an explicit pixel format.
//! Screen captures typically arrive as BGRA and decoded files as RGB; the
//! preprocessor reduces either to intensity.
use serde::{Deserialize, Serialize};

/// Channel layout of an interleaved 8-bit frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Gray8,
    Rgb8,
    Bgr8,
    Bgra8,
}

impl PixelFormat {
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
            PixelFormat::Bgra8 => 4,
        }
    }
}

/// Borrowed frame. `stride` is in bytes between rows.
#[derive(Clone, Copy, Debug)]
pub struct FrameU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub format: PixelFormat,
    pub data: &'a [u8],
}

impl<'a> FrameU8<'a> {
    /// Tightly packed frame (`stride == w * channels`).
    pub fn packed(w: usize, h: usize, format: PixelFormat, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w * format.channels(),
            format,
            data,
        }
    }

    /// True when `data` covers every row at the declared stride.
    pub fn is_well_formed(&self) -> bool {
        let row_bytes = self.w * self.format.channels();
        if self.stride < row_bytes {
            return false;
        }
        if self.h == 0 {
            return true;
        }
        self.data.len() >= (self.h - 1) * self.stride + row_bytes
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * self.format.channels()]
    }
}

/// Owned, tightly packed frame as produced by a frame source.
#[derive(Clone, Debug)]
pub struct OwnedFrame {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl OwnedFrame {
    pub fn new(width: usize, height: usize, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            data,
        }
    }

    pub fn as_view(&self) -> FrameU8<'_> {
        FrameU8::packed(self.width, self.height, self.format, &self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_buffer_is_not_well_formed() {
        let data = vec![0u8; 3 * 4 * 2 - 1];
        let frame = FrameU8::packed(4, 2, PixelFormat::Rgb8, &data);
        assert!(!frame.is_well_formed());
    }

    #[test]
    fn padded_stride_is_well_formed() {
        // last row needs only w * channels bytes
        let data = vec![0u8; 16 + 12];
        let frame = FrameU8 {
            w: 4,
            h: 2,
            stride: 16,
            format: PixelFormat::Rgb8,
            data: &data,
        };
        assert!(frame.is_well_formed());
        assert_eq!(frame.row(1).len(), 12);
    }
}
