//! Colorspace tags and the heuristics used to fill missing ones.

use crate::limits::REF_WHITE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color matrix (YUV <-> RGB conversion coefficients).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Csp {
    #[default]
    Auto,
    Bt601,
    Bt709,
    Smpte240m,
    Bt2020Nc,
    Bt2020C,
    Rgb,
    Xyz,
    YCgCo,
}

impl Csp {
    /// Matrices that make sense on YUV content.
    pub fn is_yuv_matrix(self) -> bool {
        matches!(
            self,
            Self::Bt601
                | Self::Bt709
                | Self::Bt2020Nc
                | Self::Bt2020C
                | Self::Smpte240m
                | Self::YCgCo
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Bt601 => "bt.601",
            Self::Bt709 => "bt.709",
            Self::Smpte240m => "smpte-240m",
            Self::Bt2020Nc => "bt.2020-ncl",
            Self::Bt2020C => "bt.2020-cl",
            Self::Rgb => "rgb",
            Self::Xyz => "xyz",
            Self::YCgCo => "ycgco",
        }
    }
}

/// Signal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CspLevels {
    #[default]
    Auto,
    /// Limited ("TV") range.
    Tv,
    /// Full ("PC") range.
    Pc,
}

impl CspLevels {
    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Tv => "limited",
            Self::Pc => "full",
        }
    }
}

/// Color primaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CspPrim {
    #[default]
    Auto,
    Bt601_525,
    Bt601_625,
    Bt709,
    Bt2020,
    Bt470m,
    Apple,
    Adobe,
    ProPhoto,
    Cie1931,
    DciP3,
    VGamut,
}

impl CspPrim {
    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Bt601_525 => "bt.601-525",
            Self::Bt601_625 => "bt.601-625",
            Self::Bt709 => "bt.709",
            Self::Bt2020 => "bt.2020",
            Self::Bt470m => "bt.470m",
            Self::Apple => "apple",
            Self::Adobe => "adobe",
            Self::ProPhoto => "prophoto",
            Self::Cie1931 => "cie1931",
            Self::DciP3 => "dci-p3",
            Self::VGamut => "v-gamut",
        }
    }
}

/// Transfer characteristic (gamma curve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CspTrc {
    #[default]
    Auto,
    Bt1886,
    Srgb,
    Linear,
    Gamma18,
    Gamma22,
    Gamma28,
    ProPhoto,
    /// SMPTE ST 2084 (PQ)
    Pq,
    /// ARIB STD-B67 (HLG)
    Hlg,
    /// Panasonic V-Log
    VLog,
}

impl CspTrc {
    /// Nominal signal peak of the curve, relative to reference white.
    pub fn nominal_peak(self) -> f32 {
        match self {
            Self::Pq => 10000.0 / REF_WHITE,
            Self::Hlg => 12.0,
            Self::VLog => 46.0855,
            _ => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Bt1886 => "bt.1886",
            Self::Srgb => "srgb",
            Self::Linear => "linear",
            Self::Gamma18 => "gamma1.8",
            Self::Gamma22 => "gamma2.2",
            Self::Gamma28 => "gamma2.8",
            Self::ProPhoto => "prophoto",
            Self::Pq => "pq",
            Self::Hlg => "hlg",
            Self::VLog => "v-log",
        }
    }
}

/// Whether the signal is scene- or display-referred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CspLight {
    #[default]
    Auto,
    Display,
    /// Scene-referred with the HLG OOTF.
    SceneHlg,
    /// Scene-referred with the BT.709/BT.1886 OOTF.
    Scene709_1886,
    /// Scene-referred with a pure 1.2 gamma OOTF.
    Scene1_2,
}

impl CspLight {
    /// Stable integer code, for records that cross a byte boundary.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Auto),
            1 => Some(Self::Display),
            2 => Some(Self::SceneHlg),
            3 => Some(Self::Scene709_1886),
            4 => Some(Self::Scene1_2),
            _ => None,
        }
    }
}

/// Chroma sample siting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChromaLocation {
    #[default]
    Auto,
    /// Left-aligned (MPEG-2/4, H.264).
    Left,
    /// Centered (MPEG-1, JPEG).
    Center,
}

impl ChromaLocation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "unknown",
            Self::Left => "mpeg2/4/h264",
            Self::Center => "mpeg1/jpeg",
        }
    }
}

/// Full colorspace tuple of an image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorSpace {
    pub space: Csp,
    pub levels: CspLevels,
    pub primaries: CspPrim,
    pub gamma: CspTrc,
    /// Signal peak relative to reference white; 0 means unknown.
    pub sig_peak: f32,
    pub light: CspLight,
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.space.name(),
            self.primaries.name(),
            self.gamma.name(),
            self.levels.name()
        )
    }
}

/// Guess the color matrix from the image resolution.
pub fn guess_colorspace(w: u32, h: u32) -> Csp {
    if w >= 1280 || h > 576 {
        Csp::Bt709
    } else {
        Csp::Bt601
    }
}

/// Guess primaries from the image resolution.
pub fn guess_primaries(w: u32, h: u32) -> CspPrim {
    // HD content
    if w >= 1280 || h > 576 {
        return CspPrim::Bt709;
    }
    match h {
        // PAL, including anamorphic/squared
        576 => CspPrim::Bt601_625,
        // NTSC and NTSC pro
        480 | 486 => CspPrim::Bt601_525,
        // No good metric; BT.709 minimizes damage.
        _ => CspPrim::Bt709,
    }
}
