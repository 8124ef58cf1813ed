pub mod f32;
pub mod frame;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::frame::{FrameU8, OwnedFrame, PixelFormat};
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::{GrayImageU8, ImageU8};
