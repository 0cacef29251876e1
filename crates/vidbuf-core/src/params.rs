//! Image parameters: format, size, aspect, rotation, stereo and color.

use crate::color::{self, ChromaLocation, ColorSpace, Csp, CspLevels, CspLight, CspPrim, CspTrc};
use crate::format::{ForcedCsp, ImgFmt};
use crate::layout::size_is_valid;
use crate::limits::REF_WHITE;
use num_rational::Ratio;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stereo 3D packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stereo3d {
    #[default]
    Mono,
    /// Side by side, left eye first
    Sbs2l,
    /// Side by side, right eye first
    Sbs2r,
    /// Above/below, left eye first
    Ab2l,
    /// Above/below, right eye first
    Ab2r,
}

impl Stereo3d {
    pub fn name(self) -> &'static str {
        match self {
            Self::Mono => "mono",
            Self::Sbs2l => "sbs2l",
            Self::Sbs2r => "sbs2r",
            Self::Ab2l => "ab2l",
            Self::Ab2r => "ab2r",
        }
    }

    /// Stable integer code, used when the mode crosses a byte channel.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Mono),
            1 => Some(Self::Sbs2l),
            2 => Some(Self::Sbs2r),
            3 => Some(Self::Ab2l),
            4 => Some(Self::Ab2r),
            _ => None,
        }
    }
}

/// Everything about an image except its pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageParams {
    pub imgfmt: ImgFmt,
    /// Underlying software format of a hardware frame, `ImgFmt::None` if unset.
    pub hw_subfmt: ImgFmt,
    pub w: u32,
    pub h: u32,
    /// Pixel aspect ratio `p_w:p_h`; zero means unknown.
    pub p_w: i32,
    pub p_h: i32,
    pub color: ColorSpace,
    pub chroma_location: ChromaLocation,
    /// Clockwise rotation in degrees, `0..360`.
    pub rotate: i32,
    pub stereo_in: Stereo3d,
    pub stereo_out: Stereo3d,
}

impl ImageParams {
    /// Parameters with format and size set, everything else unset.
    pub fn new(imgfmt: ImgFmt, w: u32, h: u32) -> Self {
        Self {
            imgfmt,
            w,
            h,
            ..Default::default()
        }
    }

    /// Whether the parameters describe an image that can exist. Colorspace
    /// fields may still be unset.
    pub fn is_valid(&self) -> bool {
        // Same size guard as the layout calculator, so offsets stay within
        // 32-bit range in downstream libraries.
        if !size_is_valid(self.w, self.h) {
            return false;
        }
        if self.p_w < 0 || self.p_h < 0 {
            return false;
        }
        if !(0..360).contains(&self.rotate) {
            return false;
        }
        if self.imgfmt == ImgFmt::None {
            return false;
        }
        if self.hw_subfmt != ImgFmt::None && !self.imgfmt.is_hwaccel() {
            return false;
        }
        true
    }

    /// Display size derived from the image size and pixel aspect.
    pub fn display_size(&self) -> (u32, u32) {
        let (mut d_w, mut d_h) = (self.w, self.h);
        if self.p_w > self.p_h && self.p_h >= 1 {
            d_w = scale_clamped(d_w, self.p_w, self.p_h);
        }
        if self.p_h > self.p_w && self.p_w >= 1 {
            d_h = scale_clamped(d_h, self.p_h, self.p_w);
        }
        (d_w, d_h)
    }

    /// Set the pixel aspect so that the image displays as `d_w`x`d_h`.
    pub fn set_display_size(&mut self, d_w: u32, d_h: u32) {
        if self.w == 0 || self.h == 0 || d_w == 0 || d_h == 0 {
            self.p_w = 0;
            self.p_h = 0;
            return;
        }
        let ds = Ratio::new(
            d_w as i64 * self.h as i64,
            d_h as i64 * self.w as i64,
        );
        match (i32::try_from(*ds.numer()), i32::try_from(*ds.denom())) {
            (Ok(n), Ok(d)) => {
                self.p_w = n;
                self.p_h = d;
            }
            _ => {
                self.p_w = 0;
                self.p_h = 0;
            }
        }
    }

    /// Fill unset colorspace fields and make set ones consistent with the
    /// colorspace implied by the pixel format. Idempotent.
    pub fn guess_csp(&mut self) {
        let imgfmt = if self.hw_subfmt != ImgFmt::None {
            self.hw_subfmt
        } else {
            self.imgfmt
        };
        if imgfmt == ImgFmt::None {
            return;
        }
        let (w, h) = (self.w, self.h);
        let c = &mut self.color;

        match imgfmt.desc().category.forced_csp() {
            ForcedCsp::Auto => {
                if !c.space.is_yuv_matrix() {
                    c.space = Csp::Auto;
                }
                if c.space == Csp::Auto {
                    c.space = color::guess_colorspace(w, h);
                }
                if c.levels == CspLevels::Auto {
                    c.levels = if c.gamma == CspTrc::VLog {
                        CspLevels::Pc
                    } else {
                        CspLevels::Tv
                    };
                }
                if c.primaries == CspPrim::Auto {
                    // The matrix is a better hint than the resolution.
                    c.primaries = match c.space {
                        Csp::Bt2020Nc | Csp::Bt2020C => CspPrim::Bt2020,
                        Csp::Bt709 => CspPrim::Bt709,
                        _ => color::guess_primaries(w, h),
                    };
                }
                if c.gamma == CspTrc::Auto {
                    c.gamma = CspTrc::Bt1886;
                }
            }
            ForcedCsp::Rgb => {
                c.space = Csp::Rgb;
                c.levels = CspLevels::Pc;
                // Untagged RGB is almost always sRGB, whose primaries are BT.709's.
                if c.primaries == CspPrim::Auto {
                    c.primaries = CspPrim::Bt709;
                }
                if c.gamma == CspTrc::Auto {
                    c.gamma = CspTrc::Srgb;
                }
            }
            ForcedCsp::Xyz => {
                c.space = Csp::Xyz;
                c.levels = CspLevels::Pc;
                // BT.709 is the output gamut the XYZ matrix converts to.
                if c.primaries == CspPrim::Auto {
                    c.primaries = CspPrim::Bt709;
                }
                if c.gamma == CspTrc::Auto {
                    c.gamma = CspTrc::Linear;
                }
            }
            ForcedCsp::Unknown => {
                c.space = Csp::Auto;
                c.levels = CspLevels::Auto;
                c.primaries = CspPrim::Auto;
                c.gamma = CspTrc::Auto;
            }
        }

        if c.sig_peak == 0.0 {
            c.sig_peak = if c.gamma == CspTrc::Hlg {
                1000.0 / REF_WHITE
            } else {
                // Unknown peak: use the curve's nominal range to avoid clipping.
                c.gamma.nominal_peak()
            };
        }

        if c.light == CspLight::Auto {
            c.light = if c.gamma == CspTrc::Hlg {
                CspLight::SceneHlg
            } else {
                CspLight::Display
            };
        }
    }
}

fn scale_clamped(size: u32, num: i32, den: i32) -> u32 {
    let scaled = size as i64 * num as i64 / den as i64;
    scaled.clamp(1, i32::MAX as i64) as u32
}

impl fmt::Display for ImageParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.imgfmt == ImgFmt::None {
            return f.write_str("???");
        }
        write!(f, "{}x{}", self.w, self.h)?;
        if self.p_w != self.p_h || self.p_w == 0 {
            write!(f, " [{}:{}]", self.p_w, self.p_h)?;
        }
        write!(f, " {}", self.imgfmt)?;
        if self.hw_subfmt != ImgFmt::None {
            write!(f, "[{}]", self.hw_subfmt)?;
        }
        write!(f, " {}", self.color)?;
        if self.color.sig_peak != 0.0 {
            write!(f, " SP={:.6}", self.color.sig_peak)?;
        }
        write!(f, " CL={}", self.chroma_location.name())?;
        if self.rotate != 0 {
            write!(f, " rot={}", self.rotate)?;
        }
        if self.stereo_in != Stereo3d::Mono || self.stereo_out != Stereo3d::Mono {
            write!(
                f,
                " stereo={}/{}",
                self.stereo_in.name(),
                self.stereo_out.name()
            )?;
        }
        Ok(())
    }
}
