//! Zero-copy conversion between decoder frames and vidbuf frames.
//!
//! Only buffer references change hands; pixel data is never copied. The
//! decoder frame has no fields for rotation and stereo mode, so with the
//! `opaque-ref` feature they travel in its opaque side channel.

use crate::convert::*;
use crate::ext::{ExtFrame, ExtHwFramesContext, ExtPixelFormat, ExtPlane, Rational};
use std::sync::Arc;
use tracing::debug;
use vidbuf_core::limits::{MAX_PLANES, PALETTE_SIZE};
use vidbuf_core::{
    BufferRef, ColorSpace, FieldFlags, Frame, FrameError, FrameParts, HwContextRef, ImageParams,
    ImgFmt, PlaneRef, Result,
};

#[cfg(feature = "opaque-ref")]
mod side {
    use bytemuck::{Pod, Zeroable};
    use vidbuf_core::{BufferRef, CspLight, ImageParams, Stereo3d};

    /// Parameters without a native field in the decoder frame.
    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct SideParams {
        rotate: i32,
        stereo_in: i32,
        stereo_out: i32,
        sig_peak: f32,
        light: i32,
    }

    pub(super) fn pack(params: &ImageParams) -> BufferRef {
        let rec = SideParams {
            rotate: params.rotate,
            stereo_in: params.stereo_in.code(),
            stereo_out: params.stereo_out.code(),
            sig_peak: params.color.sig_peak,
            light: params.color.light.code(),
        };
        BufferRef::from_boxed(bytemuck::bytes_of(&rec).into(), drop)
    }

    /// Apply a side record to `params`. Records of the wrong size, with a
    /// rotation outside 0..360 or with unknown codes are ignored.
    pub(super) fn unpack(buf: &BufferRef, params: &mut ImageParams) {
        let Ok(rec) = bytemuck::try_pod_read_unaligned::<SideParams>(buf.data()) else {
            tracing::debug!("ignoring {} byte side record", buf.len());
            return;
        };
        if !(0..360).contains(&rec.rotate) || rec.sig_peak.is_nan() || rec.sig_peak < 0.0 {
            tracing::debug!(
                "ignoring side record with rotation {} and peak {}",
                rec.rotate,
                rec.sig_peak
            );
            return;
        }
        let (Some(stereo_in), Some(stereo_out), Some(light)) = (
            Stereo3d::from_code(rec.stereo_in),
            Stereo3d::from_code(rec.stereo_out),
            CspLight::from_code(rec.light),
        ) else {
            tracing::debug!("ignoring side record with unknown stereo mode or light type");
            return;
        };
        params.rotate = rec.rotate;
        params.stereo_in = stereo_in;
        params.stereo_out = stereo_out;
        params.color.sig_peak = rec.sig_peak;
        params.color.light = light;
    }
}

/// Wrap a decoder frame as a vidbuf frame, taking new references to its
/// buffers and hardware context. `src` is left untouched.
pub fn frame_from_ext(src: &ExtFrame) -> Result<Frame> {
    let imgfmt = pixfmt_to_imgfmt(src.format).ok_or_else(|| {
        FrameError::BridgeFormatUnsupported(format!(
            "decoder format {:?} has no internal equivalent",
            src.format
        ))
    })?;
    let (w, h) = match (u32::try_from(src.width), u32::try_from(src.height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(FrameError::InvalidLayout(format!(
                "negative frame size {}x{}",
                src.width, src.height
            )))
        }
    };

    let mut params = ImageParams::new(imgfmt, w, h);
    params.p_w = src.sample_aspect_ratio.num;
    params.p_h = src.sample_aspect_ratio.den;
    if let Some(ctx) = &src.hw_frames_ctx {
        params.hw_subfmt = pixfmt_to_imgfmt(ctx.sw_format).unwrap_or(ImgFmt::None);
    }
    params.color = ColorSpace {
        space: ext_space_to_csp(src.colorspace),
        levels: ext_range_to_levels(src.color_range),
        primaries: ext_primaries_to_prim(src.color_primaries),
        gamma: ext_trc_to_trc(src.color_trc),
        ..Default::default()
    };
    params.chroma_location = ext_chroma_to_location(src.chroma_location);
    #[cfg(feature = "opaque-ref")]
    if let Some(buf) = &src.opaque_ref {
        side::unpack(buf, &mut params);
    }

    if !imgfmt.is_hwaccel() && src.buf.iter().all(Option::is_none) {
        return Err(FrameError::InvalidLayout(
            "decoder frame owns no buffers".to_string(),
        ));
    }

    let mut planes: [Option<PlaneRef>; MAX_PLANES] = Default::default();
    for (n, plane) in src.data.iter().enumerate() {
        let Some(plane) = plane else { continue };
        if src.buf.get(plane.buf).and_then(Option::as_ref).is_none() {
            return Err(FrameError::InvalidLayout(format!(
                "plane {} points into empty buffer slot {}",
                n, plane.buf
            )));
        }
        planes[n] = Some(PlaneRef::new(plane.buf, plane.offset, src.linesize[n] as isize));
    }

    let frame = Frame::from_parts(FrameParts {
        params,
        planes,
        bufs: src.buf.clone(),
        hwctx: src.hw_frames_ctx.clone().map(|ctx| ctx as HwContextRef),
        pict_type: ext_pict_type(src.pict_type),
        fields: FieldFlags {
            interlaced: src.interlaced_frame,
            top_first: src.top_field_first,
            repeat_first: src.repeat_pict == 1,
        },
        ..Default::default()
    });

    for p in 0..frame.num_planes() {
        if !plane_fits(&frame, p) {
            return Err(FrameError::InvalidLayout(format!(
                "plane {} of {} frame lies outside its buffer",
                p, imgfmt
            )));
        }
    }
    if !palette_fits(&frame) {
        return Err(FrameError::InvalidLayout(format!(
            "palette of {} frame lies outside its buffer",
            imgfmt
        )));
    }
    Ok(frame)
}

// Whether the palette, if the format has one and it is set, lies within
// its buffer.
fn palette_fits(frame: &Frame) -> bool {
    if !frame.format_desc().has_palette() {
        return true;
    }
    let Some(plane) = frame.plane_ref(1) else {
        return true;
    };
    let Some(buf) = plane.buffer_index().and_then(|slot| frame.buffer(slot)) else {
        return false;
    };
    plane
        .offset()
        .checked_add(PALETTE_SIZE)
        .is_some_and(|end| end <= buf.len())
}

// Whether every visible row of plane `p` lies within its buffer.
fn plane_fits(frame: &Frame, p: usize) -> bool {
    let Some(plane) = frame.plane_ref(p) else {
        return true;
    };
    let Some(buf) = plane.buffer_index().and_then(|slot| frame.buffer(slot)) else {
        return false;
    };
    let rows = frame.plane_h(p) as isize;
    if rows == 0 {
        return true;
    }
    let line_bytes = (frame.plane_w(p) as usize * frame.format_desc().bpp[p] as usize).div_ceil(8);
    let first = plane.offset() as isize;
    let last = first + (rows - 1) * plane.stride();
    first.min(last) >= 0 && first.max(last) as usize + line_bytes <= buf.len()
}

/// A decoder frame holding new references to `frame`'s data.
pub fn frame_to_ext(frame: &Frame) -> Result<ExtFrame> {
    frame_into_ext(frame.new_ref()?)
}

/// Move `frame`'s references into a decoder frame. The frame is consumed
/// even on failure.
pub fn frame_into_ext(frame: Frame) -> Result<ExtFrame> {
    let format = imgfmt_to_pixfmt(frame.imgfmt());
    if format == ExtPixelFormat::None {
        debug!("cannot hand {} to the decoder", frame.params());
        return Err(FrameError::BridgeFormatUnsupported(format!(
            "format {} has no decoder equivalent",
            frame.imgfmt()
        )));
    }
    // The size guard keeps valid sizes far below i32::MAX.
    let (width, height) = match (i32::try_from(frame.w()), i32::try_from(frame.h())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(FrameError::InvalidLayout(format!(
                "frame size {}x{} out of range",
                frame.w(),
                frame.h()
            )))
        }
    };

    let mut parts = frame.into_parts();
    pin_borrowed_planes(&mut parts)?;
    let params = parts.params;

    let mut ext = ExtFrame {
        format,
        width,
        height,
        sample_aspect_ratio: Rational::new(params.p_w, params.p_h),
        pict_type: pict_type_to_ext(parts.pict_type),
        interlaced_frame: parts.fields.interlaced,
        top_field_first: parts.fields.top_first,
        repeat_pict: i32::from(parts.fields.repeat_first),
        colorspace: csp_to_ext_space(params.color.space),
        color_range: levels_to_ext_range(params.color.levels),
        color_primaries: prim_to_ext_primaries(params.color.primaries),
        color_trc: trc_to_ext_trc(params.color.gamma),
        chroma_location: location_to_ext_chroma(params.chroma_location),
        hw_frames_ctx: parts.hwctx.take().and_then(hw_frames_ctx),
        ..Default::default()
    };

    for (n, plane) in parts.planes.iter().enumerate() {
        let Some(plane) = plane else { continue };
        let Some(buf) = plane.buffer_index() else {
            continue;
        };
        let linesize = i32::try_from(plane.stride()).map_err(|_| {
            FrameError::InvalidLayout(format!(
                "stride {} of plane {} out of range",
                plane.stride(),
                n
            ))
        })?;
        ext.data[n] = Some(ExtPlane {
            buf,
            offset: plane.offset(),
        });
        ext.linesize[n] = linesize;
    }
    ext.buf = parts.bufs;

    #[cfg(feature = "opaque-ref")]
    {
        ext.opaque_ref = Some(side::pack(&params));
    }
    Ok(ext)
}

fn hw_frames_ctx(ctx: HwContextRef) -> Option<Arc<ExtHwFramesContext>> {
    match ctx.downcast::<ExtHwFramesContext>() {
        Ok(ctx) => Some(ctx),
        Err(_) => {
            debug!("dropping hardware context of a foreign type");
            None
        }
    }
}

// Borrowed views have no buffer slot; the decoder frame must own what its
// planes point into, so give each borrowed source a strong reference in a
// free slot.
fn pin_borrowed_planes(parts: &mut FrameParts) -> Result<()> {
    for n in 0..MAX_PLANES {
        let Some((source, offset, stride)) = parts.planes[n].as_ref().and_then(|plane| {
            let weak = plane.borrowed_from()?;
            Some((weak.upgrade(), plane.offset(), plane.stride()))
        }) else {
            continue;
        };
        let buf = source.ok_or_else(|| {
            FrameError::InvalidLayout(format!("plane {} outlived the frame it borrows from", n))
        })?;
        let slot = match parts
            .bufs
            .iter()
            .position(|b| b.as_ref().is_some_and(|b| BufferRef::ptr_eq(b, &buf)))
        {
            Some(slot) => slot,
            None => {
                let slot = parts.bufs.iter().position(Option::is_none).ok_or_else(|| {
                    FrameError::AllocationFailure(
                        "no free buffer slot for borrowed plane".to_string(),
                    )
                })?;
                parts.bufs[slot] = Some(buf);
                slot
            }
        };
        parts.planes[n] = Some(PlaneRef::new(slot, offset, stride));
    }
    Ok(())
}
