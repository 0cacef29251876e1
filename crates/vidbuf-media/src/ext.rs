//! Decoder/filter frame representation.
//!
//! Mirrors the frame type of the decoding library: integer sizes, per-plane
//! data positions with line sizes, colorspace enums in the library's own
//! numbering, and up to four buffer references that keep the data alive.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vidbuf_core::limits::MAX_PLANES;
use vidbuf_core::BufferRef;

/// Pixel formats of the decoding library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtPixelFormat {
    #[default]
    None,
    Yuv420p,
    Yuv422p,
    Yuv444p,
    Yuv411p,
    Yuv420p10le,
    Yuv420p16be,
    Nv12,
    Nv21,
    P010le,
    Uyvy422,
    Yuyv422,
    Gray8,
    Gray16le,
    Monowhite,
    Gbrp,
    Rgb24,
    Bgr24,
    Rgba,
    Bgra,
    Rgb0,
    Rgba64le,
    Pal8,
    Xyz12le,
    Vaapi,
    Vdpau,
    VideoToolbox,
    D3d11,
}

/// Color matrix coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtColorSpace {
    Rgb,
    Bt709,
    #[default]
    Unspecified,
    Fcc,
    Bt470bg,
    Smpte170m,
    Smpte240m,
    YCgCo,
    Bt2020Ncl,
    Bt2020Cl,
    Smpte2085,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtColorRange {
    #[default]
    Unspecified,
    /// Limited range
    Mpeg,
    /// Full range
    Jpeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtColorPrimaries {
    Bt709,
    #[default]
    Unspecified,
    Bt470m,
    Bt470bg,
    Smpte170m,
    Smpte240m,
    Film,
    Bt2020,
    Smpte428,
    Smpte431,
    Smpte432,
    JedecP22,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtColorTrc {
    Bt709,
    #[default]
    Unspecified,
    Gamma22,
    Gamma28,
    Smpte170m,
    Smpte240m,
    Linear,
    Iec61966_2_1,
    Bt1361Ecg,
    Bt2020_10,
    Bt2020_12,
    SmpteSt2084,
    AribStdB67,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtChromaLocation {
    #[default]
    Unspecified,
    Left,
    Center,
    TopLeft,
    Top,
    BottomLeft,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtPictureType {
    #[default]
    None,
    I,
    P,
    B,
    S,
    Si,
    Sp,
    Bi,
}

/// Integer fraction `num/den`; `0/0` or `0/1` means unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }
}

/// Pool of hardware surfaces frames are allocated from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtHwFramesContext {
    /// Format of the surfaces' contents when downloaded to CPU memory.
    pub sw_format: ExtPixelFormat,
    pub width: i32,
    pub height: i32,
}

/// Where a plane's row 0 lives: buffer slot and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtPlane {
    pub buf: usize,
    pub offset: usize,
}

/// A frame as produced and consumed by the decoding library.
#[derive(Debug, Default)]
pub struct ExtFrame {
    pub format: ExtPixelFormat,
    pub width: i32,
    pub height: i32,
    pub data: [Option<ExtPlane>; MAX_PLANES],
    /// Signed byte distance between rows of each plane.
    pub linesize: [i32; MAX_PLANES],
    pub sample_aspect_ratio: Rational,
    pub pict_type: ExtPictureType,
    pub interlaced_frame: bool,
    pub top_field_first: bool,
    /// Number of extra fields to display; 1 repeats the first field.
    pub repeat_pict: i32,
    pub colorspace: ExtColorSpace,
    pub color_range: ExtColorRange,
    pub color_primaries: ExtColorPrimaries,
    pub color_trc: ExtColorTrc,
    pub chroma_location: ExtChromaLocation,
    pub buf: [Option<BufferRef>; MAX_PLANES],
    pub hw_frames_ctx: Option<Arc<ExtHwFramesContext>>,
    /// Opaque user data travelling with the frame through the library.
    pub opaque_ref: Option<BufferRef>,
}

impl ExtFrame {
    /// An empty frame shell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of row `y` of plane `p`, `line_bytes` long. `None` if the plane
    /// is unset or the row lies outside its buffer.
    pub fn row(&self, p: usize, y: usize, line_bytes: usize) -> Option<&[u8]> {
        let plane = self.data.get(p)?.as_ref()?;
        let buf = self.buf.get(plane.buf)?.as_ref()?;
        let start = plane.offset as isize + y as isize * self.linesize[p] as isize;
        let start = usize::try_from(start).ok()?;
        buf.data().get(start..start + line_bytes)
    }
}
