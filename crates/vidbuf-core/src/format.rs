//! Pixel format ids and the process-wide format description registry.
//!
//! Every format belongs to a [`FormatCategory`], which decides how the
//! format is laid out, cleared and tagged with a colorspace. The registry
//! is built on first access and is read-only afterwards.

use crate::limits::MAX_PLANES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Internal image format id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u16)]
pub enum ImgFmt {
    /// No format / unset.
    #[default]
    None = 0,
    /// YUV 4:2:0 planar, 8-bit
    Yuv420p,
    /// YUV 4:2:2 planar, 8-bit
    Yuv422p,
    /// YUV 4:4:4 planar, 8-bit
    Yuv444p,
    /// YUV 4:2:0 planar, 10-bit little-endian in 16-bit words
    Yuv420p10,
    /// YUV 4:2:0 planar, 16-bit big-endian
    Yuv420p16be,
    /// Y plane + interleaved UV plane, 4:2:0
    Nv12,
    /// Y plane + interleaved VU plane, 4:2:0
    Nv21,
    /// NV12 layout with 10-bit samples in 16-bit words
    P010,
    /// Packed 4:2:2, U Y V Y byte order
    Uyvy,
    /// Packed 4:2:2, Y U Y V byte order
    Yuyv,
    /// 8-bit grayscale
    Gray8,
    /// 16-bit little-endian grayscale
    Gray16,
    /// Planar RGB (G, B, R planes), 8-bit
    Gbrp,
    Rgb24,
    Bgr24,
    Rgba,
    Bgra,
    /// RGB with an unused padding byte
    Rgb0,
    /// 16 bits per component RGBA, little-endian
    Rgba64,
    /// 8-bit palette indices + 256-entry RGBA palette
    Pal8,
    /// CIE XYZ, 12-bit samples in 16-bit little-endian words
    Xyz12,
    /// VA-API surface
    Vaapi,
    /// VDPAU surface
    Vdpau,
    /// VideoToolbox pixel buffer
    VideoToolbox,
    /// Direct3D 11 texture
    D3d11,
}

impl ImgFmt {
    /// All known formats, in id order.
    pub const ALL: [ImgFmt; 26] = [
        ImgFmt::None,
        ImgFmt::Yuv420p,
        ImgFmt::Yuv422p,
        ImgFmt::Yuv444p,
        ImgFmt::Yuv420p10,
        ImgFmt::Yuv420p16be,
        ImgFmt::Nv12,
        ImgFmt::Nv21,
        ImgFmt::P010,
        ImgFmt::Uyvy,
        ImgFmt::Yuyv,
        ImgFmt::Gray8,
        ImgFmt::Gray16,
        ImgFmt::Gbrp,
        ImgFmt::Rgb24,
        ImgFmt::Bgr24,
        ImgFmt::Rgba,
        ImgFmt::Bgra,
        ImgFmt::Rgb0,
        ImgFmt::Rgba64,
        ImgFmt::Pal8,
        ImgFmt::Xyz12,
        ImgFmt::Vaapi,
        ImgFmt::Vdpau,
        ImgFmt::VideoToolbox,
        ImgFmt::D3d11,
    ];

    /// Integer id of this format.
    #[inline]
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Look up a format by integer id.
    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Look up a format by its short name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        self.desc().name
    }

    /// Format description from the registry.
    #[inline]
    pub fn desc(self) -> &'static FormatDesc {
        &registry()[self as usize]
    }

    /// Whether this is a hardware surface format with no CPU plane layout.
    #[inline]
    pub fn is_hwaccel(self) -> bool {
        self != ImgFmt::None && self.desc().category == FormatCategory::HwOpaque
    }
}

impl fmt::Display for ImgFmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Colorspace a format implies regardless of tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForcedCsp {
    /// YUV and other formats where tags decide.
    Auto,
    Rgb,
    Xyz,
    /// Nothing sensible can be inferred.
    Unknown,
}

/// Format category. Each category supplies its own layout, clear and
/// colorspace rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatCategory {
    /// Separate Y, U, V planes.
    YuvPlanar,
    /// Y plane plus one interleaved chroma plane.
    YuvNv,
    /// Single plane of interleaved 4:2:2 samples.
    YuvPacked,
    Gray,
    Rgb,
    /// Index plane plus fixed-size palette.
    Palette,
    Xyz,
    /// Hardware surface, not CPU addressable.
    HwOpaque,
}

impl FormatCategory {
    /// Whether frames of this category have a CPU plane layout.
    #[inline]
    pub fn is_addressable(self) -> bool {
        !matches!(self, Self::HwOpaque)
    }

    pub fn forced_csp(self) -> ForcedCsp {
        match self {
            Self::YuvPlanar | Self::YuvNv | Self::YuvPacked | Self::Gray => ForcedCsp::Auto,
            Self::Rgb | Self::Palette => ForcedCsp::Rgb,
            Self::Xyz => ForcedCsp::Xyz,
            Self::HwOpaque => ForcedCsp::Unknown,
        }
    }

    /// Whether color matrix, levels and chroma location tags apply.
    pub fn is_yuv(self) -> bool {
        matches!(
            self,
            Self::YuvPlanar | Self::YuvNv | Self::YuvPacked | Self::Gray
        )
    }
}

/// Sample byte order for formats with multi-byte components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

/// Immutable description of an image format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDesc {
    pub id: ImgFmt,
    pub name: &'static str,
    pub category: FormatCategory,
    /// Number of pixel planes (the palette is not counted).
    pub num_planes: usize,
    /// Horizontal chroma shift per plane.
    pub xs: [u8; MAX_PLANES],
    /// Vertical chroma shift per plane.
    pub ys: [u8; MAX_PLANES],
    /// Bits per pixel per plane.
    pub bpp: [u32; MAX_PLANES],
    /// Bit depth of one component.
    pub plane_bits: u32,
    /// Crop/clear origins must be multiples of these.
    pub align_x: u32,
    pub align_y: u32,
    pub endian: Endian,
}

impl FormatDesc {
    /// Whether samples are stored in host byte order.
    pub fn is_native_endian(&self) -> bool {
        match self.endian {
            Endian::Little => cfg!(target_endian = "little"),
            Endian::Big => cfg!(target_endian = "big"),
        }
    }

    /// Whether the format carries a palette in plane slot 1.
    #[inline]
    pub fn has_palette(&self) -> bool {
        self.category == FormatCategory::Palette
    }

    /// Byte pattern that encodes black for each plane.
    ///
    /// Planes with `bpp <= 8` only use the first byte; wider planes repeat
    /// the two-byte pattern.
    pub fn clear_pattern(&self) -> [[u8; 2]; MAX_PLANES] {
        let mut clear = [[0u8; 2]; MAX_PLANES];
        match self.category {
            FormatCategory::YuvPacked => {
                clear[0] = match self.id {
                    ImgFmt::Uyvy => [0x80, 0x00],
                    _ => [0x00, 0x80],
                };
            }
            FormatCategory::YuvNv => clear[1] = [0x80, 0x80],
            FormatCategory::YuvPlanar if self.num_planes > 2 => {
                let chroma = ((1u32 << self.plane_bits) / 2) as u16;
                let bytes = if self.bpp[1] <= 8 {
                    [chroma as u8, chroma as u8]
                } else {
                    match self.endian {
                        Endian::Little => chroma.to_le_bytes(),
                        Endian::Big => chroma.to_be_bytes(),
                    }
                };
                clear[1] = bytes;
                clear[2] = bytes;
            }
            _ => {}
        }
        clear
    }
}

fn entry(
    id: ImgFmt,
    name: &'static str,
    category: FormatCategory,
    planes: &[(u8, u8, u32)],
    plane_bits: u32,
    endian: Endian,
) -> FormatDesc {
    let mut desc = FormatDesc {
        id,
        name,
        category,
        num_planes: planes.len(),
        xs: [0; MAX_PLANES],
        ys: [0; MAX_PLANES],
        bpp: [0; MAX_PLANES],
        plane_bits,
        align_x: 1,
        align_y: 1,
        endian,
    };
    for (n, &(xs, ys, bpp)) in planes.iter().enumerate() {
        desc.xs[n] = xs;
        desc.ys[n] = ys;
        desc.bpp[n] = bpp;
        desc.align_x = desc.align_x.max(1 << xs);
        desc.align_y = desc.align_y.max(1 << ys);
    }
    // Packed 4:2:2 shares one macropixel between two horizontal pixels.
    if category == FormatCategory::YuvPacked {
        desc.align_x = 2;
    }
    desc
}

#[rustfmt::skip]
fn build_registry() -> Vec<FormatDesc> {
    use Endian::{Big, Little};
    use FormatCategory::*;

    let table = vec![
        entry(ImgFmt::None, "none", HwOpaque, &[], 0, Little),
        entry(ImgFmt::Yuv420p, "yuv420p", YuvPlanar, &[(0, 0, 8), (1, 1, 8), (1, 1, 8)], 8, Little),
        entry(ImgFmt::Yuv422p, "yuv422p", YuvPlanar, &[(0, 0, 8), (1, 0, 8), (1, 0, 8)], 8, Little),
        entry(ImgFmt::Yuv444p, "yuv444p", YuvPlanar, &[(0, 0, 8), (0, 0, 8), (0, 0, 8)], 8, Little),
        entry(ImgFmt::Yuv420p10, "yuv420p10", YuvPlanar, &[(0, 0, 16), (1, 1, 16), (1, 1, 16)], 10, Little),
        entry(ImgFmt::Yuv420p16be, "yuv420p16be", YuvPlanar, &[(0, 0, 16), (1, 1, 16), (1, 1, 16)], 16, Big),
        entry(ImgFmt::Nv12, "nv12", YuvNv, &[(0, 0, 8), (1, 1, 16)], 8, Little),
        entry(ImgFmt::Nv21, "nv21", YuvNv, &[(0, 0, 8), (1, 1, 16)], 8, Little),
        entry(ImgFmt::P010, "p010", YuvNv, &[(0, 0, 16), (1, 1, 32)], 10, Little),
        entry(ImgFmt::Uyvy, "uyvy422", YuvPacked, &[(0, 0, 16)], 8, Little),
        entry(ImgFmt::Yuyv, "yuyv422", YuvPacked, &[(0, 0, 16)], 8, Little),
        entry(ImgFmt::Gray8, "gray", Gray, &[(0, 0, 8)], 8, Little),
        entry(ImgFmt::Gray16, "gray16", Gray, &[(0, 0, 16)], 16, Little),
        entry(ImgFmt::Gbrp, "gbrp", Rgb, &[(0, 0, 8), (0, 0, 8), (0, 0, 8)], 8, Little),
        entry(ImgFmt::Rgb24, "rgb24", Rgb, &[(0, 0, 24)], 8, Little),
        entry(ImgFmt::Bgr24, "bgr24", Rgb, &[(0, 0, 24)], 8, Little),
        entry(ImgFmt::Rgba, "rgba", Rgb, &[(0, 0, 32)], 8, Little),
        entry(ImgFmt::Bgra, "bgra", Rgb, &[(0, 0, 32)], 8, Little),
        entry(ImgFmt::Rgb0, "rgb0", Rgb, &[(0, 0, 32)], 8, Little),
        entry(ImgFmt::Rgba64, "rgba64", Rgb, &[(0, 0, 64)], 16, Little),
        entry(ImgFmt::Pal8, "pal8", Palette, &[(0, 0, 8)], 8, Little),
        entry(ImgFmt::Xyz12, "xyz12", Xyz, &[(0, 0, 48)], 12, Little),
        entry(ImgFmt::Vaapi, "vaapi", HwOpaque, &[], 0, Little),
        entry(ImgFmt::Vdpau, "vdpau", HwOpaque, &[], 0, Little),
        entry(ImgFmt::VideoToolbox, "videotoolbox", HwOpaque, &[], 0, Little),
        entry(ImgFmt::D3d11, "d3d11", HwOpaque, &[], 0, Little),
    ];
    debug_assert!(table.iter().enumerate().all(|(n, d)| d.id as usize == n));
    tracing::debug!("format registry initialized with {} formats", table.len());
    table
}

fn registry() -> &'static [FormatDesc] {
    static REGISTRY: OnceLock<Vec<FormatDesc>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_indexed_by_id() {
        for f in ImgFmt::ALL {
            assert_eq!(f.desc().id, f);
            assert_eq!(ImgFmt::from_id(f.id()), Some(f));
        }
        assert_eq!(ImgFmt::from_id(999), None);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(ImgFmt::from_name("yuv420p"), Some(ImgFmt::Yuv420p));
        assert_eq!(ImgFmt::from_name("nv12"), Some(ImgFmt::Nv12));
        assert_eq!(ImgFmt::from_name("nope"), None);
        assert_eq!(ImgFmt::Pal8.to_string(), "pal8");
    }

    #[test]
    fn test_yuv420p_shifts() {
        let d = ImgFmt::Yuv420p.desc();
        assert_eq!(d.num_planes, 3);
        assert_eq!(d.xs, [0, 1, 1, 0]);
        assert_eq!(d.ys, [0, 1, 1, 0]);
        assert_eq!((d.align_x, d.align_y), (2, 2));
    }

    #[test]
    fn test_packed_alignment() {
        let d = ImgFmt::Uyvy.desc();
        assert_eq!((d.align_x, d.align_y), (2, 1));
        assert_eq!(ImgFmt::Rgba.desc().align_x, 1);
    }

    #[test]
    fn test_categories() {
        assert!(ImgFmt::Vaapi.is_hwaccel());
        assert!(!ImgFmt::Nv12.is_hwaccel());
        assert!(!ImgFmt::None.is_hwaccel());
        assert_eq!(ImgFmt::Pal8.desc().category.forced_csp(), ForcedCsp::Rgb);
        assert_eq!(ImgFmt::Xyz12.desc().category.forced_csp(), ForcedCsp::Xyz);
        assert_eq!(ImgFmt::Yuv420p.desc().category.forced_csp(), ForcedCsp::Auto);
        assert!(ImgFmt::Gray8.desc().category.is_yuv());
        assert!(!ImgFmt::Rgb24.desc().category.is_yuv());
    }

    #[test]
    fn test_clear_patterns() {
        assert_eq!(ImgFmt::Uyvy.desc().clear_pattern()[0], [0x80, 0x00]);
        assert_eq!(ImgFmt::Nv12.desc().clear_pattern()[1], [0x80, 0x80]);
        assert_eq!(ImgFmt::Yuv420p.desc().clear_pattern()[2], [0x80, 0x80]);
        assert_eq!(ImgFmt::Yuv420p10.desc().clear_pattern()[1], [0x00, 0x02]);
        assert_eq!(ImgFmt::Yuv420p16be.desc().clear_pattern()[1], [0x80, 0x00]);
        assert_eq!(ImgFmt::Rgba.desc().clear_pattern(), [[0, 0]; MAX_PLANES]);
    }

    #[test]
    fn test_native_endian_flag() {
        let le = ImgFmt::Gray16.desc().is_native_endian();
        let be = ImgFmt::Yuv420p16be.desc().is_native_endian();
        assert_ne!(le, be);
    }
}
