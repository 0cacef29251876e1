//! vidbuf media - decoder frame interop
//!
//! This crate handles:
//! - The decoder/filter frame representation (`ExtFrame`)
//! - Pixel format and colorspace translation tables
//! - Zero-copy conversion between `ExtFrame` and `vidbuf_core::Frame`

pub mod bridge;
pub mod convert;
pub mod ext;

pub use bridge::{frame_from_ext, frame_into_ext, frame_to_ext};
pub use convert::{imgfmt_to_pixfmt, pixfmt_to_imgfmt};
pub use ext::{
    ExtChromaLocation, ExtColorPrimaries, ExtColorRange, ExtColorSpace, ExtColorTrc, ExtFrame,
    ExtHwFramesContext, ExtPictureType, ExtPixelFormat, ExtPlane, Rational,
};
