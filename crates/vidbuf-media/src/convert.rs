//! Translation tables between decoder enums and vidbuf enums.
//!
//! Values without a counterpart map to the "unknown" member of the target
//! enum, except pixel formats, where a missing mapping is reported as `None`
//! (or `ExtPixelFormat::None`) so callers can reject the frame.

use crate::ext::{
    ExtChromaLocation, ExtColorPrimaries, ExtColorRange, ExtColorSpace, ExtColorTrc,
    ExtPictureType, ExtPixelFormat,
};
use vidbuf_core::{ChromaLocation, Csp, CspLevels, CspPrim, CspTrc, ImgFmt, PictureType};

const PIXFMT_TABLE: &[(ExtPixelFormat, ImgFmt)] = &[
    (ExtPixelFormat::Yuv420p, ImgFmt::Yuv420p),
    (ExtPixelFormat::Yuv422p, ImgFmt::Yuv422p),
    (ExtPixelFormat::Yuv444p, ImgFmt::Yuv444p),
    (ExtPixelFormat::Yuv420p10le, ImgFmt::Yuv420p10),
    (ExtPixelFormat::Yuv420p16be, ImgFmt::Yuv420p16be),
    (ExtPixelFormat::Nv12, ImgFmt::Nv12),
    (ExtPixelFormat::Nv21, ImgFmt::Nv21),
    (ExtPixelFormat::P010le, ImgFmt::P010),
    (ExtPixelFormat::Uyvy422, ImgFmt::Uyvy),
    (ExtPixelFormat::Yuyv422, ImgFmt::Yuyv),
    (ExtPixelFormat::Gray8, ImgFmt::Gray8),
    (ExtPixelFormat::Gray16le, ImgFmt::Gray16),
    (ExtPixelFormat::Gbrp, ImgFmt::Gbrp),
    (ExtPixelFormat::Rgb24, ImgFmt::Rgb24),
    (ExtPixelFormat::Bgr24, ImgFmt::Bgr24),
    (ExtPixelFormat::Rgba, ImgFmt::Rgba),
    (ExtPixelFormat::Bgra, ImgFmt::Bgra),
    (ExtPixelFormat::Rgb0, ImgFmt::Rgb0),
    (ExtPixelFormat::Rgba64le, ImgFmt::Rgba64),
    (ExtPixelFormat::Pal8, ImgFmt::Pal8),
    (ExtPixelFormat::Xyz12le, ImgFmt::Xyz12),
    (ExtPixelFormat::Vaapi, ImgFmt::Vaapi),
    (ExtPixelFormat::Vdpau, ImgFmt::Vdpau),
    (ExtPixelFormat::VideoToolbox, ImgFmt::VideoToolbox),
    (ExtPixelFormat::D3d11, ImgFmt::D3d11),
];

/// Internal format for a decoder pixel format, `None` if unsupported.
pub fn pixfmt_to_imgfmt(pixfmt: ExtPixelFormat) -> Option<ImgFmt> {
    PIXFMT_TABLE
        .iter()
        .find(|(ext, _)| *ext == pixfmt)
        .map(|&(_, imgfmt)| imgfmt)
}

/// Decoder pixel format for an internal format, `ExtPixelFormat::None` if
/// the decoder has no equivalent.
pub fn imgfmt_to_pixfmt(imgfmt: ImgFmt) -> ExtPixelFormat {
    PIXFMT_TABLE
        .iter()
        .find(|(_, fmt)| *fmt == imgfmt)
        .map_or(ExtPixelFormat::None, |&(ext, _)| ext)
}

pub fn ext_space_to_csp(space: ExtColorSpace) -> Csp {
    match space {
        ExtColorSpace::Bt709 => Csp::Bt709,
        ExtColorSpace::Bt470bg | ExtColorSpace::Smpte170m => Csp::Bt601,
        ExtColorSpace::Smpte240m => Csp::Smpte240m,
        ExtColorSpace::Rgb => Csp::Rgb,
        ExtColorSpace::YCgCo => Csp::YCgCo,
        ExtColorSpace::Bt2020Cl => Csp::Bt2020C,
        ExtColorSpace::Bt2020Ncl => Csp::Bt2020Nc,
        _ => Csp::Auto,
    }
}

pub fn csp_to_ext_space(space: Csp) -> ExtColorSpace {
    match space {
        Csp::Bt601 => ExtColorSpace::Bt470bg,
        Csp::Bt709 => ExtColorSpace::Bt709,
        Csp::Smpte240m => ExtColorSpace::Smpte240m,
        Csp::Bt2020Nc => ExtColorSpace::Bt2020Ncl,
        Csp::Bt2020C => ExtColorSpace::Bt2020Cl,
        Csp::Rgb => ExtColorSpace::Rgb,
        Csp::YCgCo => ExtColorSpace::YCgCo,
        Csp::Auto | Csp::Xyz => ExtColorSpace::Unspecified,
    }
}

pub fn ext_range_to_levels(range: ExtColorRange) -> CspLevels {
    match range {
        ExtColorRange::Mpeg => CspLevels::Tv,
        ExtColorRange::Jpeg => CspLevels::Pc,
        ExtColorRange::Unspecified => CspLevels::Auto,
    }
}

pub fn levels_to_ext_range(levels: CspLevels) -> ExtColorRange {
    match levels {
        CspLevels::Tv => ExtColorRange::Mpeg,
        CspLevels::Pc => ExtColorRange::Jpeg,
        CspLevels::Auto => ExtColorRange::Unspecified,
    }
}

pub fn ext_primaries_to_prim(prim: ExtColorPrimaries) -> CspPrim {
    match prim {
        ExtColorPrimaries::Smpte240m | ExtColorPrimaries::Smpte170m => CspPrim::Bt601_525,
        ExtColorPrimaries::Bt470bg => CspPrim::Bt601_625,
        ExtColorPrimaries::Bt709 => CspPrim::Bt709,
        ExtColorPrimaries::Bt2020 => CspPrim::Bt2020,
        ExtColorPrimaries::Bt470m => CspPrim::Bt470m,
        ExtColorPrimaries::Smpte428 => CspPrim::Cie1931,
        ExtColorPrimaries::Smpte431 => CspPrim::DciP3,
        _ => CspPrim::Auto,
    }
}

pub fn prim_to_ext_primaries(prim: CspPrim) -> ExtColorPrimaries {
    match prim {
        CspPrim::Bt601_525 => ExtColorPrimaries::Smpte240m,
        CspPrim::Bt601_625 => ExtColorPrimaries::Bt470bg,
        CspPrim::Bt709 => ExtColorPrimaries::Bt709,
        CspPrim::Bt2020 => ExtColorPrimaries::Bt2020,
        CspPrim::Bt470m => ExtColorPrimaries::Bt470m,
        CspPrim::Cie1931 => ExtColorPrimaries::Smpte428,
        CspPrim::DciP3 => ExtColorPrimaries::Smpte431,
        _ => ExtColorPrimaries::Unspecified,
    }
}

pub fn ext_trc_to_trc(trc: ExtColorTrc) -> CspTrc {
    match trc {
        ExtColorTrc::Bt709
        | ExtColorTrc::Smpte170m
        | ExtColorTrc::Smpte240m
        | ExtColorTrc::Bt1361Ecg
        | ExtColorTrc::Bt2020_10
        | ExtColorTrc::Bt2020_12 => CspTrc::Bt1886,
        ExtColorTrc::Iec61966_2_1 => CspTrc::Srgb,
        ExtColorTrc::Linear => CspTrc::Linear,
        ExtColorTrc::Gamma22 => CspTrc::Gamma22,
        ExtColorTrc::Gamma28 => CspTrc::Gamma28,
        ExtColorTrc::SmpteSt2084 => CspTrc::Pq,
        ExtColorTrc::AribStdB67 => CspTrc::Hlg,
        ExtColorTrc::Unspecified => CspTrc::Auto,
    }
}

pub fn trc_to_ext_trc(trc: CspTrc) -> ExtColorTrc {
    match trc {
        CspTrc::Bt1886 => ExtColorTrc::Bt709,
        CspTrc::Srgb => ExtColorTrc::Iec61966_2_1,
        CspTrc::Linear => ExtColorTrc::Linear,
        CspTrc::Gamma22 => ExtColorTrc::Gamma22,
        CspTrc::Gamma28 => ExtColorTrc::Gamma28,
        CspTrc::Pq => ExtColorTrc::SmpteSt2084,
        CspTrc::Hlg => ExtColorTrc::AribStdB67,
        _ => ExtColorTrc::Unspecified,
    }
}

pub fn ext_chroma_to_location(loc: ExtChromaLocation) -> ChromaLocation {
    match loc {
        ExtChromaLocation::Left => ChromaLocation::Left,
        ExtChromaLocation::Center => ChromaLocation::Center,
        _ => ChromaLocation::Auto,
    }
}

pub fn location_to_ext_chroma(loc: ChromaLocation) -> ExtChromaLocation {
    match loc {
        ChromaLocation::Left => ExtChromaLocation::Left,
        ChromaLocation::Center => ExtChromaLocation::Center,
        ChromaLocation::Auto => ExtChromaLocation::Unspecified,
    }
}

pub fn ext_pict_type(t: ExtPictureType) -> PictureType {
    match t {
        ExtPictureType::None => PictureType::None,
        ExtPictureType::I => PictureType::I,
        ExtPictureType::P => PictureType::P,
        ExtPictureType::B => PictureType::B,
        ExtPictureType::S => PictureType::S,
        ExtPictureType::Si => PictureType::Si,
        ExtPictureType::Sp => PictureType::Sp,
        ExtPictureType::Bi => PictureType::Bi,
    }
}

pub fn pict_type_to_ext(t: PictureType) -> ExtPictureType {
    match t {
        PictureType::None => ExtPictureType::None,
        PictureType::I => ExtPictureType::I,
        PictureType::P => ExtPictureType::P,
        PictureType::B => ExtPictureType::B,
        PictureType::S => ExtPictureType::S,
        PictureType::Si => ExtPictureType::Si,
        PictureType::Sp => ExtPictureType::Sp,
        PictureType::Bi => ExtPictureType::Bi,
    }
}
