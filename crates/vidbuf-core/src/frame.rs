//! Frame descriptors for decoded pictures in CPU memory.
//!
//! A [`Frame`] addresses its planes as (buffer slot, byte offset, stride)
//! triples and owns up to [`MAX_PLANES`] reference-counted buffer backings.
//! Several frames may reference the same backings; a frame may only be
//! written while every backing it owns is unshared, and
//! [`Frame::make_writable`] duplicates the pixels otherwise.

use crate::buffer::{BufferRef, HwContextRef, WeakBufferRef};
use crate::error::Result;
use crate::format::{FormatDesc, ImgFmt};
use crate::geometry::Rect;
use crate::layout::{self, chroma_div_up, FillPlan};
use crate::limits::{MAX_PLANES, MIN_BYTE_ALIGN, PALETTE_SIZE};
use crate::params::ImageParams;
use crate::pic;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// Coded picture type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PictureType {
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

/// Field/interlacing flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FieldFlags {
    pub interlaced: bool,
    pub top_first: bool,
    pub repeat_first: bool,
}

#[derive(Debug, Clone)]
enum PlaneSource {
    /// One of the frame's own buffer slots.
    Buffer(usize),
    /// Borrowed from another frame; valid while that frame's data lives.
    View(WeakBufferRef),
}

/// Addressing of one plane: buffer, byte offset of row 0, signed stride.
#[derive(Debug, Clone)]
pub struct PlaneRef {
    source: PlaneSource,
    offset: usize,
    stride: isize,
}

impl PlaneRef {
    /// Plane stored in buffer slot `buffer` at `offset`.
    pub fn new(buffer: usize, offset: usize, stride: isize) -> Self {
        assert!(buffer < MAX_PLANES, "buffer slot {} out of range", buffer);
        Self {
            source: PlaneSource::Buffer(buffer),
            offset,
            stride,
        }
    }

    /// Buffer slot holding the plane, `None` for borrowed views.
    pub fn buffer_index(&self) -> Option<usize> {
        match self.source {
            PlaneSource::Buffer(slot) => Some(slot),
            PlaneSource::View(_) => None,
        }
    }

    #[inline]
    pub fn is_view(&self) -> bool {
        matches!(self.source, PlaneSource::View(_))
    }

    /// The buffer a borrowed view points into.
    pub fn borrowed_from(&self) -> Option<&WeakBufferRef> {
        match &self.source {
            PlaneSource::View(weak) => Some(weak),
            PlaneSource::Buffer(_) => None,
        }
    }

    /// Byte offset of row 0 within the buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte distance between rows; negative for bottom-up planes.
    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }
}

fn offset_by(offset: usize, delta: isize) -> usize {
    let pos = offset as isize + delta;
    assert!(pos >= 0, "plane offset moved before the start of its buffer");
    pos as usize
}

enum ViewBytes<'a> {
    Borrowed(&'a [u8]),
    // Keeps a borrowed view's source alive while it is read.
    Pinned(BufferRef),
}

/// Read access to one plane.
pub struct PlaneView<'a> {
    bytes: ViewBytes<'a>,
    offset: usize,
    stride: isize,
    line_bytes: usize,
    rows: usize,
}

impl PlaneView<'_> {
    /// The whole backing the plane lives in.
    pub fn data(&self) -> &[u8] {
        match &self.bytes {
            ViewBytes::Borrowed(data) => data,
            ViewBytes::Pinned(buf) => buf.data(),
        }
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }

    /// Visible bytes per row.
    #[inline]
    pub fn line_bytes(&self) -> usize {
        self.line_bytes
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Visible bytes of row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        assert!(y < self.rows, "row {} out of range", y);
        let start = offset_by(self.offset, y as isize * self.stride);
        &self.data()[start..start + self.line_bytes]
    }

    /// Visible rows, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.rows).map(move |y| self.row(y))
    }
}

/// Write access to one plane of a uniquely owned frame.
pub struct PlaneMut<'a> {
    data: &'a mut [u8],
    offset: usize,
    stride: isize,
    line_bytes: usize,
    rows: usize,
}

impl PlaneMut<'_> {
    #[inline]
    pub fn line_bytes(&self) -> usize {
        self.line_bytes
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Visible bytes of row `y`.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.rows, "row {} out of range", y);
        let start = offset_by(self.offset, y as isize * self.stride);
        &mut self.data[start..start + self.line_bytes]
    }

    /// Set every visible byte to `value`.
    pub fn fill(&mut self, value: u8) {
        pic::fill_pic(
            self.data,
            self.offset,
            self.stride,
            value,
            self.line_bytes,
            self.rows,
        );
    }
}

/// Owned pieces of a frame, used to build frames from foreign
/// representations and to take them apart again.
#[derive(Debug, Default)]
pub struct FrameParts {
    pub params: ImageParams,
    pub planes: [Option<PlaneRef>; MAX_PLANES],
    pub bufs: [Option<BufferRef>; MAX_PLANES],
    pub hwctx: Option<HwContextRef>,
    pub pict_type: PictureType,
    pub fields: FieldFlags,
    pub pts: Option<f64>,
    pub dts: Option<f64>,
    pub pkt_duration: Option<f64>,
}

/// A video frame: image parameters, plane addressing and buffer ownership.
pub struct Frame {
    params: ImageParams,
    fmt: &'static FormatDesc,
    num_planes: usize,
    planes: [Option<PlaneRef>; MAX_PLANES],
    bufs: [Option<BufferRef>; MAX_PLANES],
    hwctx: Option<HwContextRef>,
    pub pict_type: PictureType,
    pub fields: FieldFlags,
    /// Presentation timestamp in seconds
    pub pts: Option<f64>,
    /// Decoding timestamp in seconds
    pub dts: Option<f64>,
    pub pkt_duration: Option<f64>,
}

impl Frame {
    /// A frame with no format, no size and no data.
    pub fn empty() -> Self {
        Self {
            params: ImageParams::default(),
            fmt: ImgFmt::None.desc(),
            num_planes: 0,
            planes: Default::default(),
            bufs: Default::default(),
            hwctx: None,
            pict_type: PictureType::None,
            fields: FieldFlags::default(),
            pts: None,
            dts: None,
            pkt_duration: None,
        }
    }

    /// Allocate a frame with fresh, zeroed pixel storage in one backing.
    pub fn alloc(imgfmt: ImgFmt, w: u32, h: u32) -> Result<Self> {
        let mut frame = Self::empty();
        frame.set_format(imgfmt);
        frame.set_size(w, h);

        let align = MIN_BYTE_ALIGN;
        let size = layout::alloc_size(imgfmt, w, h, align)?;
        // Overallocate so the planes can start on an aligned address.
        let buf = BufferRef::alloc(size + align)?;
        let plan = layout::plan_fill(imgfmt, w, h, align, buf.addr(), buf.len())?;
        frame.attach(0, &plan);
        frame.bufs[0] = Some(buf);

        trace!("allocated {}x{} {} frame ({} bytes)", w, h, imgfmt, size);
        Ok(frame)
    }

    /// Wrap caller memory as the frame's storage, without copying.
    ///
    /// The planes start at the first `stride_align` boundary inside `data`.
    /// Once the last reference to the storage is dropped, `release` gets
    /// `data` back; this may happen on any thread. On failure `release` is
    /// dropped without being called.
    pub fn from_buffer<F>(
        imgfmt: ImgFmt,
        w: u32,
        h: u32,
        stride_align: usize,
        data: Box<[u8]>,
        release: F,
    ) -> Result<Self>
    where
        F: FnOnce(Box<[u8]>) + Send + 'static,
    {
        let plan = layout::plan_fill(imgfmt, w, h, stride_align, data.as_ptr() as usize, data.len())
            .map_err(|e| {
                debug!("cannot adopt {} byte buffer for {}x{} {}: {}", data.len(), w, h, imgfmt, e);
                e
            })?;

        let mut frame = Self::empty();
        frame.set_format(imgfmt);
        frame.set_size(w, h);
        frame.attach(0, &plan);
        frame.bufs[0] = Some(BufferRef::from_boxed(data, release));
        Ok(frame)
    }

    /// Assemble a frame from parts. Every plane stored in a buffer slot must
    /// have that slot populated.
    pub fn from_parts(parts: FrameParts) -> Self {
        for plane in parts.planes.iter().flatten() {
            if let Some(slot) = plane.buffer_index() {
                assert!(
                    parts.bufs[slot].is_some(),
                    "plane references empty buffer slot {}",
                    slot
                );
            }
        }
        let mut frame = Self::empty();
        frame.set_params(&parts.params);
        frame.planes = parts.planes;
        frame.bufs = parts.bufs;
        frame.hwctx = parts.hwctx;
        frame.pict_type = parts.pict_type;
        frame.fields = parts.fields;
        frame.pts = parts.pts;
        frame.dts = parts.dts;
        frame.pkt_duration = parts.pkt_duration;
        frame
    }

    /// Take the frame apart, moving out its buffer references.
    pub fn into_parts(self) -> FrameParts {
        FrameParts {
            params: self.params,
            planes: self.planes,
            bufs: self.bufs,
            hwctx: self.hwctx,
            pict_type: self.pict_type,
            fields: self.fields,
            pts: self.pts,
            dts: self.dts,
            pkt_duration: self.pkt_duration,
        }
    }

    fn attach(&mut self, slot: usize, plan: &FillPlan) {
        for n in 0..MAX_PLANES {
            self.planes[n] = plan
                .plane_start(n)
                .map(|off| PlaneRef::new(slot, off, plan.layout.stride[n] as isize));
        }
    }

    fn shallow_clone(&self) -> Self {
        Self {
            params: self.params,
            fmt: self.fmt,
            num_planes: self.num_planes,
            planes: self.planes.clone(),
            bufs: self.bufs.clone(),
            hwctx: self.hwctx.clone(),
            pict_type: self.pict_type,
            fields: self.fields,
            pts: self.pts,
            dts: self.dts,
            pkt_duration: self.pkt_duration,
        }
    }

    /// A new reference to the same pixel data and hardware context.
    ///
    /// Frames that own no backing have nothing to share and are deep-copied.
    pub fn new_ref(&self) -> Result<Self> {
        if !self.has_backing() {
            return self.new_copy();
        }
        Ok(self.shallow_clone())
    }

    /// A frame sharing this frame's metadata and pixels without owning any
    /// backing. The view stays readable only while this frame's data lives,
    /// and it keeps that data read-only in the meantime.
    pub fn new_dummy_ref(&self) -> Self {
        let mut planes: [Option<PlaneRef>; MAX_PLANES] = Default::default();
        for (dst, src) in planes.iter_mut().zip(&self.planes) {
            *dst = src.as_ref().and_then(|plane| {
                let source = match &plane.source {
                    PlaneSource::Buffer(slot) => {
                        PlaneSource::View(self.bufs[*slot].as_ref()?.downgrade())
                    }
                    PlaneSource::View(weak) => PlaneSource::View(weak.clone()),
                };
                Some(PlaneRef {
                    source,
                    offset: plane.offset,
                    stride: plane.stride,
                })
            });
        }
        Self {
            params: self.params,
            fmt: self.fmt,
            num_planes: self.num_planes,
            planes,
            bufs: Default::default(),
            hwctx: None,
            pict_type: self.pict_type,
            fields: self.fields,
            pts: self.pts,
            dts: self.dts,
            pkt_duration: self.pkt_duration,
        }
    }

    /// A reference whose lifetime is tracked by a zero-length marker in
    /// slot 0; `release` runs when the last reference is dropped. Used for
    /// hardware surfaces, whose pixels are not in CPU memory.
    pub fn new_custom_ref<F>(&self, release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let mut frame = self.new_dummy_ref();
        frame.bufs[0] = Some(BufferRef::custom(release));
        frame
    }

    /// A deep copy in freshly allocated storage, with attributes.
    pub fn new_copy(&self) -> Result<Self> {
        let mut copy = Self::alloc(self.imgfmt(), self.w(), self.h())?;
        copy.copy_from(self);
        copy.copy_attributes(self);
        Ok(copy)
    }

    /// Whether pixel data may be modified. Frames that own no backing are
    /// not reference-counted and count as writable. That includes views
    /// from `new_dummy_ref`, whose borrowed planes still reject writes;
    /// call `make_writable` first to give them their own storage.
    pub fn is_writable(&self) -> bool {
        self.bufs.iter().flatten().all(BufferRef::is_writable)
    }

    /// Ensure this frame exclusively owns its pixel data, copying it if it
    /// is shared or borrowed. Other references are unaffected.
    pub fn make_writable(&mut self) -> Result<()> {
        if self.is_writable() && !self.has_views() {
            return Ok(());
        }
        let copy = self.new_copy()?;
        debug!("copy-on-write: duplicated {}", self.params);
        if self.has_backing() {
            self.steal_data(copy);
        } else {
            *self = copy;
        }
        debug_assert!(self.is_writable());
        Ok(())
    }

    /// Replace this frame's data with `src`'s, dropping the old references.
    /// Both frames must own their data and agree on format and size.
    pub fn steal_data(&mut self, src: Frame) {
        assert!(
            self.imgfmt() == src.imgfmt() && self.w() == src.w() && self.h() == src.h(),
            "steal_data between different formats or sizes"
        );
        assert!(
            self.has_backing() && src.has_backing(),
            "steal_data needs reference-counted frames"
        );
        *self = src;
    }

    /// Drop all plane addressing and buffer references. The hardware
    /// context is kept.
    pub fn unref_data(&mut self) {
        self.planes = Default::default();
        self.bufs = Default::default();
    }

    #[inline]
    pub fn imgfmt(&self) -> ImgFmt {
        self.params.imgfmt
    }

    #[inline]
    pub fn w(&self) -> u32 {
        self.params.w
    }

    #[inline]
    pub fn h(&self) -> u32 {
        self.params.h
    }

    #[inline]
    pub fn params(&self) -> &ImageParams {
        &self.params
    }

    /// Mutable parameters. Format and size belong to the frame's layout;
    /// change them with [`Frame::set_format`] and [`Frame::set_size`].
    #[inline]
    pub fn params_mut(&mut self) -> &mut ImageParams {
        &mut self.params
    }

    #[inline]
    pub fn format_desc(&self) -> &'static FormatDesc {
        self.fmt
    }

    #[inline]
    pub fn num_planes(&self) -> usize {
        self.num_planes
    }

    pub fn plane_ref(&self, p: usize) -> Option<&PlaneRef> {
        self.planes.get(p)?.as_ref()
    }

    pub fn buffer(&self, slot: usize) -> Option<&BufferRef> {
        self.bufs.get(slot)?.as_ref()
    }

    /// Whether any buffer slot is populated.
    pub fn has_backing(&self) -> bool {
        self.bufs.iter().any(Option::is_some)
    }

    fn has_views(&self) -> bool {
        self.planes.iter().flatten().any(PlaneRef::is_view)
    }

    pub fn hwctx(&self) -> Option<&HwContextRef> {
        self.hwctx.as_ref()
    }

    pub fn set_hwctx(&mut self, hwctx: Option<HwContextRef>) {
        self.hwctx = hwctx;
    }

    /// Change the format. Plane data is not touched.
    pub fn set_format(&mut self, imgfmt: ImgFmt) {
        let desc = imgfmt.desc();
        self.fmt = desc;
        self.params.imgfmt = imgfmt;
        self.num_planes = desc.num_planes;
    }

    /// Change the visible size. Must not exceed the allocated planes.
    pub fn set_size(&mut self, w: u32, h: u32) {
        self.params.w = w;
        self.params.h = h;
    }

    /// Replace all parameters, including format and size.
    pub fn set_params(&mut self, params: &ImageParams) {
        self.set_format(params.imgfmt);
        self.set_size(params.w, params.h);
        self.params = *params;
    }

    /// Replace all parameters except format and size. The colorspace is
    /// re-guessed if `params` was meant for a different format.
    pub fn set_attributes(&mut self, params: &ImageParams) {
        let mut nparams = *params;
        nparams.imgfmt = self.imgfmt();
        nparams.w = self.w();
        nparams.h = self.h();
        if nparams.imgfmt != params.imgfmt {
            nparams.guess_csp();
        }
        self.set_params(&nparams);
    }

    /// Storage width in pixels of plane `p`.
    pub fn plane_w(&self, p: usize) -> u32 {
        chroma_div_up(self.w(), self.fmt.xs[p])
    }

    /// Storage height in pixels of plane `p`.
    pub fn plane_h(&self, p: usize) -> u32 {
        chroma_div_up(self.h(), self.fmt.ys[p])
    }

    fn line_bytes(&self, p: usize) -> usize {
        (self.plane_w(p) as usize * self.fmt.bpp[p] as usize).div_ceil(8)
    }

    fn view(&self, p: usize, line_bytes: usize, rows: usize) -> Option<PlaneView<'_>> {
        let plane = self.planes[p].as_ref()?;
        let bytes = match &plane.source {
            PlaneSource::Buffer(slot) => ViewBytes::Borrowed(self.bufs[*slot].as_ref()?.data()),
            PlaneSource::View(weak) => ViewBytes::Pinned(weak.upgrade()?),
        };
        Some(PlaneView {
            bytes,
            offset: plane.offset,
            stride: plane.stride,
            line_bytes,
            rows,
        })
    }

    fn view_mut(&mut self, p: usize, line_bytes: usize, rows: usize) -> Option<PlaneMut<'_>> {
        let plane = self.planes[p].as_ref()?;
        let slot = plane.buffer_index()?;
        let (offset, stride) = (plane.offset, plane.stride);
        let data = self.bufs[slot].as_mut()?.data_mut()?;
        Some(PlaneMut {
            data,
            offset,
            stride,
            line_bytes,
            rows,
        })
    }

    /// Read access to plane `p`. `None` if the plane does not exist or a
    /// borrowed view outlived its source.
    pub fn plane(&self, p: usize) -> Option<PlaneView<'_>> {
        if p >= self.num_planes {
            return None;
        }
        self.view(p, self.line_bytes(p), self.plane_h(p) as usize)
    }

    /// Write access to plane `p`. `None` unless the plane's backing is
    /// exclusively owned by this frame.
    pub fn plane_mut(&mut self, p: usize) -> Option<PlaneMut<'_>> {
        if p >= self.num_planes {
            return None;
        }
        let (line_bytes, rows) = (self.line_bytes(p), self.plane_h(p) as usize);
        self.view_mut(p, line_bytes, rows)
    }

    /// The palette of palettized formats, as one row of `PALETTE_SIZE` bytes.
    pub fn palette(&self) -> Option<PlaneView<'_>> {
        if !self.fmt.has_palette() {
            return None;
        }
        self.view(1, PALETTE_SIZE, 1)
    }

    pub fn palette_mut(&mut self) -> Option<PlaneMut<'_>> {
        if !self.fmt.has_palette() {
            return None;
        }
        self.view_mut(1, PALETTE_SIZE, 1)
    }

    /// Copy pixel data from `src`. Both frames must have the same format
    /// and size, and this frame must be writable.
    pub fn copy_from(&mut self, src: &Frame) {
        assert_eq!(self.imgfmt(), src.imgfmt(), "copy between different formats");
        assert!(
            self.w() == src.w() && self.h() == src.h(),
            "copy between different sizes"
        );
        assert!(self.is_writable(), "copy into a shared frame");

        for n in 0..self.num_planes {
            let from = src
                .plane(n)
                .unwrap_or_else(|| panic!("source plane {} is not readable", n));
            let to = self
                .plane_mut(n)
                .unwrap_or_else(|| panic!("destination plane {} is borrowed or shared", n));
            pic::copy_pic(
                to.data,
                to.offset,
                to.stride,
                from.data(),
                from.offset,
                from.stride,
                from.line_bytes,
                from.rows,
            );
        }
        if let (Some(from), Some(mut to)) = (src.palette(), self.palette_mut()) {
            to.row_mut(0).copy_from_slice(from.row(0));
        }
    }

    /// Copy per-frame attributes (timestamps, fields, rotation, stereo,
    /// aspect, color tags and palette) from `src`, then make the color tags
    /// consistent with this frame's format.
    pub fn copy_attributes(&mut self, src: &Frame) {
        self.pict_type = src.pict_type;
        self.fields = src.fields;
        self.pts = src.pts;
        self.dts = src.dts;
        self.pkt_duration = src.pkt_duration;

        let same_size = self.w() == src.w() && self.h() == src.h();
        let same_yuvness = self.fmt.category.is_yuv() == src.fmt.category.is_yuv();
        let (d, s) = (&mut self.params, &src.params);
        d.rotate = s.rotate;
        d.stereo_in = s.stereo_in;
        d.stereo_out = s.stereo_out;
        if same_size {
            d.p_w = s.p_w;
            d.p_h = s.p_h;
        }
        d.color.primaries = s.color.primaries;
        d.color.gamma = s.color.gamma;
        d.color.sig_peak = s.color.sig_peak;
        d.color.light = s.color.light;
        if same_yuvness {
            d.color.space = s.color.space;
            d.color.levels = s.color.levels;
            d.chroma_location = s.chroma_location;
        }
        self.params.guess_csp();

        if self.fmt.has_palette()
            && src.fmt.has_palette()
            && self.planes[1].is_some()
            && src.planes[1].is_some()
            && self.make_writable().is_ok()
        {
            if let (Some(from), Some(mut to)) = (src.palette(), self.palette_mut()) {
                to.row_mut(0).copy_from_slice(from.row(0));
            }
        }
    }

    fn check_region(&self, rc: Rect) {
        assert!(rc.x0 <= rc.x1 && rc.y0 <= rc.y1, "inverted region");
        assert!(
            rc.x1 <= self.w() && rc.y1 <= self.h(),
            "region exceeds {}x{} image",
            self.w(),
            self.h()
        );
        assert!(
            rc.x0 % self.fmt.align_x == 0 && rc.y0 % self.fmt.align_y == 0,
            "region origin {},{} not aligned for {}",
            rc.x0,
            rc.y0,
            self.imgfmt()
        );
    }

    // Byte displacement of pixel (x0, y0) within plane `p`.
    fn plane_delta(&self, p: usize, x0: u32, y0: u32) -> isize {
        let stride = self.planes[p].as_ref().map_or(0, PlaneRef::stride);
        let x_bytes = (x0 >> self.fmt.xs[p]) as usize * self.fmt.bpp[p] as usize / 8;
        (y0 >> self.fmt.ys[p]) as isize * stride + x_bytes as isize
    }

    /// Crop to `(x0, y0)-(x1, y1)`, bottom/right exclusive. The origin must
    /// be aligned to the format's chroma subsampling.
    pub fn crop(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        self.crop_rect(Rect::new(x0, y0, x1, y1));
    }

    pub fn crop_rect(&mut self, rc: Rect) {
        self.check_region(rc);
        for p in 0..self.num_planes {
            let delta = self.plane_delta(p, rc.x0, rc.y0);
            if let Some(plane) = self.planes[p].as_mut() {
                plane.offset = offset_by(plane.offset, delta);
            }
        }
        self.set_size(rc.width(), rc.height());
    }

    /// Fill `(x0, y0)-(x1, y1)` with black. The bottom/right border need
    /// not be aligned, but pixels up to the next alignment may be cleared.
    pub fn clear(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        self.clear_rect(Rect::new(x0, y0, x1, y1));
    }

    pub fn clear_rect(&mut self, rc: Rect) {
        self.check_region(rc);
        if rc.is_empty() {
            return;
        }
        let (area_w, area_h) = (rc.width(), rc.height());
        let pattern = self.fmt.clear_pattern();

        for p in 0..self.num_planes {
            let bpp = self.fmt.bpp[p] as usize;
            let bytes = (chroma_div_up(area_w, self.fmt.xs[p]) as usize * bpp).div_ceil(8);
            let rows = chroma_div_up(area_h, self.fmt.ys[p]) as usize;
            let delta = self.plane_delta(p, rc.x0, rc.y0);
            let plane = self.plane_mut(p).unwrap_or_else(|| {
                panic!("clear on a shared or borrowed frame (plane {})", p)
            });
            let offset = offset_by(plane.offset, delta);
            if bpp <= 8 {
                pic::fill_pic(plane.data, offset, plane.stride, pattern[p][0], bytes, rows);
            } else {
                pic::fill16_pic(
                    plane.data,
                    offset,
                    plane.stride,
                    pattern[p],
                    bytes.div_ceil(2),
                    rows,
                );
            }
        }
    }

    /// Flip vertically by pointing row 0 at the last row and negating the
    /// strides. No pixels move.
    pub fn vflip(&mut self) {
        for p in 0..self.num_planes {
            let plane_h = self.plane_h(p) as isize;
            if plane_h == 0 {
                continue;
            }
            if let Some(plane) = self.planes[p].as_mut() {
                plane.offset = offset_by(plane.offset, plane.stride * (plane_h - 1));
                plane.stride = -plane.stride;
            }
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("params", &format_args!("{}", self.params))
            .field("planes", &self.planes)
            .field("bufs", &self.bufs)
            .field("hwctx", &self.hwctx.is_some())
            .finish()
    }
}
