//! Integration tests for the decoder frame bridge.
//!
//! Exercises vidbuf-core frames crossing into vidbuf-media decoder frames
//! and back.

use crossbeam_channel::unbounded;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use vidbuf_core::{
    BufferRef, ChromaLocation, Csp, CspLevels, CspPrim, CspTrc, Frame, ImgFmt, PictureType,
    Stereo3d,
};
use vidbuf_media::{
    frame_from_ext, frame_into_ext, frame_to_ext, ExtColorSpace, ExtFrame, ExtHwFramesContext,
    ExtPixelFormat, ExtPlane,
};

// ── Helpers ────────────────────────────────────────────────────

/// A decoder frame for planar 4:2:0 with each plane in its own buffer.
fn decoder_frame(w: i32, h: i32, released: &Arc<AtomicUsize>) -> ExtFrame {
    let mut ext = ExtFrame::new();
    ext.format = ExtPixelFormat::Yuv420p;
    ext.width = w;
    ext.height = h;
    ext.colorspace = ExtColorSpace::Bt709;
    for p in 0..3 {
        let (pw, ph) = if p == 0 { (w, h) } else { ((w + 1) / 2, (h + 1) / 2) };
        let stride = (pw + 15) / 16 * 16;
        let data: Vec<u8> = (0..stride * ph).map(|i| (i as u8) ^ (p as u8 * 0x55)).collect();
        let released = released.clone();
        ext.buf[p] = Some(BufferRef::from_boxed(data.into_boxed_slice(), move |_| {
            released.fetch_add(1, Ordering::SeqCst);
        }));
        ext.data[p] = Some(ExtPlane { buf: p, offset: 0 });
        ext.linesize[p] = stride;
    }
    ext
}

fn rows(frame: &Frame, p: usize) -> Vec<Vec<u8>> {
    frame.plane(p).unwrap().iter_rows().map(<[u8]>::to_vec).collect()
}

// ── Zero-copy exchange ─────────────────────────────────────────

#[test]
fn decoder_buffers_live_until_last_frame_reference() {
    crate::init_tracing();
    let released = Arc::new(AtomicUsize::new(0));
    let ext = decoder_frame(30, 20, &released);
    let frame = frame_from_ext(&ext).unwrap();
    assert_eq!(frame.params().color.space, Csp::Bt709);
    assert_eq!(frame.plane_w(1), 15);

    drop(ext);
    assert_eq!(released.load(Ordering::SeqCst), 0);
    let copy = frame.new_copy().unwrap();
    drop(frame);
    assert_eq!(released.load(Ordering::SeqCst), 3);
    assert_eq!(copy.imgfmt(), ImgFmt::Yuv420p);
}

#[test]
fn round_trip_preserves_metadata_and_pixels() {
    let released = Arc::new(AtomicUsize::new(0));
    let ext = decoder_frame(30, 20, &released);
    let mut frame = frame_from_ext(&ext).unwrap();
    frame.pict_type = PictureType::I;
    frame.fields.top_first = true;
    {
        let params = frame.params_mut();
        params.set_display_size(40, 20);
        params.color.levels = CspLevels::Tv;
        params.color.primaries = CspPrim::Bt709;
        params.color.gamma = CspTrc::Bt1886;
        params.chroma_location = ChromaLocation::Left;
        params.rotate = 180;
        params.stereo_out = Stereo3d::Sbs2l;
    }

    let back = frame_from_ext(&frame_to_ext(&frame).unwrap()).unwrap();
    assert_eq!(back.imgfmt(), frame.imgfmt());
    assert_eq!((back.w(), back.h()), (30, 20));
    assert_eq!(back.params().display_size(), (40, 20));
    assert_eq!(back.params().color, frame.params().color);
    assert_eq!(back.params().chroma_location, ChromaLocation::Left);
    assert_eq!(back.pict_type, PictureType::I);
    assert_eq!(back.fields, frame.fields);
    #[cfg(feature = "opaque-ref")]
    {
        assert_eq!(back.params().rotate, 180);
        assert_eq!(back.params().stereo_out, Stereo3d::Sbs2l);
    }
    for p in 0..3 {
        assert_eq!(rows(&back, p), rows(&frame, p));
    }
}

#[test]
fn frames_cross_threads_through_the_bridge() {
    let released = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = unbounded::<ExtFrame>();

    let producer = {
        let released = released.clone();
        thread::spawn(move || {
            for _ in 0..8 {
                let frame = frame_from_ext(&decoder_frame(16, 8, &released)).unwrap();
                tx.send(frame_into_ext(frame).unwrap()).unwrap();
            }
        })
    };

    let consumer = thread::spawn(move || {
        let mut count = 0;
        for ext in rx {
            let frame = frame_from_ext(&ext).unwrap();
            drop(ext);
            assert!(frame.is_writable());
            count += 1;
        }
        count
    });

    producer.join().unwrap();
    assert_eq!(consumer.join().unwrap(), 8);
    assert_eq!(released.load(Ordering::SeqCst), 8 * 3);
}

// ── Hardware frames ────────────────────────────────────────────

#[test]
fn hardware_surface_returns_to_pool_once() {
    let returned = Arc::new(AtomicBool::new(false));
    let ctx = Arc::new(ExtHwFramesContext {
        sw_format: ExtPixelFormat::P010le,
        width: 3840,
        height: 2160,
    });

    let mut ext = ExtFrame::new();
    ext.format = ExtPixelFormat::Vaapi;
    ext.width = 3840;
    ext.height = 2160;
    ext.hw_frames_ctx = Some(ctx);
    ext.buf[0] = {
        let returned = returned.clone();
        Some(BufferRef::custom(move || {
            assert!(!returned.swap(true, Ordering::SeqCst));
        }))
    };

    let frame = frame_from_ext(&ext).unwrap();
    drop(ext);
    assert_eq!(frame.params().hw_subfmt, ImgFmt::P010);
    assert!(!frame.is_writable());
    assert!(frame.new_copy().is_err());

    let mut params = *frame.params();
    params.guess_csp();
    assert_eq!(params.color.space, Csp::Bt709);

    let r = frame.new_ref().unwrap();
    drop(frame);
    assert!(!returned.load(Ordering::SeqCst));
    drop(r);
    assert!(returned.load(Ordering::SeqCst));
}
