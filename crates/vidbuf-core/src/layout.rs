//! Plane layout computation for CPU-addressable image formats.
//!
//! The layout pads every plane to a multiple of [`LAYOUT_ROW_ALIGN`] rows so
//! that odd-sized subsampled frames have a spare bottom/right border for
//! filters and scalers that read past the visible area.

use crate::error::{FrameError, Result};
use crate::format::ImgFmt;
use crate::limits::{LAYOUT_ROW_ALIGN, MAX_PLANES, PALETTE_SIZE, SIZE_GUARD_PAD};

/// Per-plane strides, offsets and sizes of one image allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLayout {
    /// Bytes per row, a multiple of the requested alignment.
    pub stride: [usize; MAX_PLANES],
    /// Byte offset of each plane; `None` for unused planes.
    pub offset: [Option<usize>; MAX_PLANES],
    /// Byte size of each plane; zero for unused planes.
    pub size: [usize; MAX_PLANES],
    /// Sum of all plane sizes.
    pub total: usize,
}

impl ImageLayout {
    /// Compute the layout of a `w`x`h` image of `fmt`, with every stride
    /// aligned to `stride_align` bytes.
    pub fn compute(fmt: ImgFmt, w: u32, h: u32, stride_align: usize) -> Result<Self> {
        assert!(stride_align > 0, "stride alignment must be non-zero");

        let desc = fmt.desc();
        if fmt == ImgFmt::None || !desc.category.is_addressable() {
            return Err(FrameError::InvalidLayout(format!(
                "format {} has no CPU plane layout",
                fmt
            )));
        }
        if !size_is_valid(w, h) {
            return Err(FrameError::InvalidLayout(format!(
                "image size {}x{} out of range",
                w, h
            )));
        }

        let mut layout = Self {
            stride: [0; MAX_PLANES],
            offset: [None; MAX_PLANES],
            size: [0; MAX_PLANES],
            total: 0,
        };

        let padded_h = align_up(h as usize, LAYOUT_ROW_ALIGN);
        for n in 0..MAX_PLANES {
            let alloc_w = chroma_div_up(w, desc.xs[n]) as usize;
            let alloc_h = padded_h >> desc.ys[n];
            let line_bytes = (alloc_w * desc.bpp[n] as usize).div_ceil(8);
            layout.stride[n] = align_up(line_bytes, stride_align);
            layout.size[n] = layout.stride[n] * alloc_h;
        }
        if desc.has_palette() {
            layout.size[1] = PALETTE_SIZE;
        }

        let mut sum = 0;
        for n in 0..MAX_PLANES {
            layout.offset[n] = (layout.size[n] > 0).then_some(sum);
            sum += layout.size[n];
        }
        layout.total = sum;

        Ok(layout)
    }
}

/// Total bytes needed for an image allocation that already starts on a
/// `stride_align` boundary.
pub fn alloc_size(fmt: ImgFmt, w: u32, h: u32, stride_align: usize) -> Result<usize> {
    ImageLayout::compute(fmt, w, h, stride_align).map(|l| l.total)
}

/// Whether `w`x`h` is small enough that every stride*height product stays
/// within signed 32-bit range for downstream libraries.
pub fn size_is_valid(w: u32, h: u32) -> bool {
    let (w, h) = (w as i64, h as i64);
    w > 0 && h > 0 && (w + SIZE_GUARD_PAD) * (h + SIZE_GUARD_PAD) < (i32::MAX / 8) as i64
}

/// `size` divided by `2^shift`, rounded up.
#[inline]
pub fn chroma_div_up(size: u32, shift: u8) -> u32 {
    let size = size as u64;
    ((size + (1 << shift) - 1) >> shift) as u32
}

/// Round `value` up to a multiple of `align`.
#[inline]
pub fn align_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

/// Bytes to skip from `addr` to reach the next `align` boundary.
#[inline]
pub fn align_padding(addr: usize, align: usize) -> usize {
    align_up(addr, align) - addr
}

/// Where the planes of an image go inside a caller-provided buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillPlan {
    /// Bytes skipped at the start of the buffer to align plane 0.
    pub padding: usize,
    pub layout: ImageLayout,
}

impl FillPlan {
    /// Absolute byte position of plane `n` within the buffer.
    pub fn plane_start(&self, n: usize) -> Option<usize> {
        self.layout.offset[n].map(|off| self.padding + off)
    }
}

/// Plan placing an image of `fmt` into a buffer of `buffer_len` bytes
/// that starts at address `base_addr`.
pub fn plan_fill(
    fmt: ImgFmt,
    w: u32,
    h: u32,
    stride_align: usize,
    base_addr: usize,
    buffer_len: usize,
) -> Result<FillPlan> {
    let layout = ImageLayout::compute(fmt, w, h, stride_align)?;
    if layout.total > buffer_len {
        return Err(FrameError::InvalidLayout(format!(
            "buffer of {} bytes too small for {} byte image",
            buffer_len, layout.total
        )));
    }

    let padding = align_padding(base_addr, stride_align);
    let available = buffer_len - layout.total;
    if available < padding {
        return Err(FrameError::AlignmentInfeasible {
            needed: padding,
            available,
        });
    }

    Ok(FillPlan { padding, layout })
}
