//! vidbuf core - reference-counted video frame buffers
//!
//! This crate provides the building blocks shared by decoders, filters and
//! renderers:
//! - Format descriptions and the plane layout calculator
//! - Reference-counted buffer backings with release callbacks
//! - Frame descriptors with copy-on-write, crop, clear and flip
//! - Image parameters and colorspace resolution

pub mod buffer;
pub mod color;
pub mod error;
pub mod format;
pub mod frame;
pub mod geometry;
pub mod layout;
pub mod params;
pub mod pic;

pub use buffer::{BufferRef, HwContextRef, WeakBufferRef};
pub use color::{ChromaLocation, ColorSpace, Csp, CspLevels, CspLight, CspPrim, CspTrc};
pub use error::{FrameError, Result};
pub use format::{FormatCategory, FormatDesc, ImgFmt};
pub use frame::{FieldFlags, Frame, FrameParts, PictureType, PlaneMut, PlaneRef, PlaneView};
pub use geometry::Rect;
pub use layout::ImageLayout;
pub use params::{ImageParams, Stereo3d};

/// Fixed limits and defaults for frame allocation.
pub mod limits {
    /// Maximum number of planes (and buffer slots) per frame.
    pub const MAX_PLANES: usize = 4;

    /// Stride and start alignment used for self-allocated frames.
    pub const MIN_BYTE_ALIGN: usize = 64;

    /// Size of the palette plane of palettized formats (256 RGBA entries).
    pub const PALETTE_SIZE: usize = 256 * 4;

    /// Plane heights are padded to a multiple of this many rows.
    pub const LAYOUT_ROW_ALIGN: usize = 32;

    /// Border added to each dimension by the image size guard.
    pub const SIZE_GUARD_PAD: i64 = 128;

    /// Reference white in cd/m², used to normalize signal peaks.
    pub const REF_WHITE: f32 = 100.0;
}
