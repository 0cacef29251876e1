//! Integration tests for reference counting and copy-on-write.
//!
//! Exercises frame sharing across every CPU-addressable format.

use proptest::prelude::*;
use vidbuf_core::{Frame, ImgFmt};

// ── Helpers ────────────────────────────────────────────────────

fn addressable_formats() -> Vec<ImgFmt> {
    ImgFmt::ALL
        .iter()
        .copied()
        .filter(|f| *f != ImgFmt::None && !f.is_hwaccel())
        .collect()
}

fn filled(imgfmt: ImgFmt, w: u32, h: u32, seed: u8) -> Frame {
    let mut frame = Frame::alloc(imgfmt, w, h).unwrap();
    for p in 0..frame.num_planes() {
        let mut plane = frame.plane_mut(p).unwrap();
        for y in 0..plane.rows() {
            for (x, b) in plane.row_mut(y).iter_mut().enumerate() {
                *b = seed.wrapping_add((x * 31 + y * 17 + p * 5) as u8);
            }
        }
    }
    if let Some(mut pal) = frame.palette_mut() {
        for (i, b) in pal.row_mut(0).iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(3);
        }
    }
    frame
}

fn pixels(frame: &Frame) -> Vec<Vec<u8>> {
    let mut rows = Vec::new();
    for p in 0..frame.num_planes() {
        rows.extend(frame.plane(p).unwrap().iter_rows().map(<[u8]>::to_vec));
    }
    if let Some(pal) = frame.palette() {
        rows.push(pal.row(0).to_vec());
    }
    rows
}

// ── Sharing ────────────────────────────────────────────────────

#[test]
fn new_ref_outlives_original_for_all_formats() {
    crate::init_tracing();
    for imgfmt in addressable_formats() {
        let frame = filled(imgfmt, 19, 11, 7);
        let expected = pixels(&frame);
        let r = frame.new_ref().unwrap();
        drop(frame);
        assert_eq!(pixels(&r), expected, "{}", imgfmt);
    }
}

#[test]
fn writability_transitions() {
    let frame = filled(ImgFmt::P010, 32, 18, 0);
    assert!(frame.is_writable());

    let a = frame.new_ref().unwrap();
    let b = a.new_ref().unwrap();
    assert!(!frame.is_writable() && !a.is_writable() && !b.is_writable());

    drop(frame);
    drop(a);
    assert!(b.is_writable());
}

#[test]
fn make_writable_leaves_other_references_alone() {
    let frame = filled(ImgFmt::Yuv422p, 24, 8, 3);
    let expected = pixels(&frame);

    let mut w = frame.new_ref().unwrap();
    w.make_writable().unwrap();
    w.clear(0, 0, 24, 8);

    assert_eq!(pixels(&frame), expected);
    assert_ne!(pixels(&w), expected);
}

#[test]
fn dummy_view_pins_source_read_only() {
    let mut frame = filled(ImgFmt::Gbrp, 8, 8, 1);
    let view = frame.new_dummy_ref();
    assert!(frame.plane_mut(0).is_none());
    drop(view);
    assert!(frame.plane_mut(0).is_some());
}

#[test]
fn crop_of_shared_frame_keeps_data() {
    let frame = filled(ImgFmt::Nv12, 64, 32, 9);
    let mut cropped = frame.new_ref().unwrap();
    cropped.crop(16, 8, 48, 24);
    assert_eq!(
        cropped.plane(0).unwrap().row(0),
        &frame.plane(0).unwrap().row(8)[16..48]
    );
    assert_eq!(
        cropped.plane(1).unwrap().row(0),
        &frame.plane(1).unwrap().row(4)[16..48]
    );

    // Copy-on-write keeps only the cropped area.
    cropped.make_writable().unwrap();
    assert_eq!((cropped.w(), cropped.h()), (32, 16));
    assert_eq!(
        cropped.plane(0).unwrap().row(15),
        &frame.plane(0).unwrap().row(23)[16..48]
    );
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn make_writable_is_idempotent(
        fmt_index in 0usize..64,
        w in 1u32..70,
        h in 1u32..40,
        seed in any::<u8>(),
    ) {
        let formats = addressable_formats();
        let imgfmt = formats[fmt_index % formats.len()];
        let frame = filled(imgfmt, w, h, seed);

        let mut once = frame.new_ref().unwrap();
        once.make_writable().unwrap();
        let mut twice = frame.new_ref().unwrap();
        twice.make_writable().unwrap();
        twice.make_writable().unwrap();

        prop_assert_eq!(once.imgfmt(), twice.imgfmt());
        prop_assert_eq!((once.w(), once.h()), (twice.w(), twice.h()));
        prop_assert_eq!(pixels(&once), pixels(&twice));
        prop_assert_eq!(pixels(&once), pixels(&frame));
    }

    #[test]
    fn shared_frame_is_never_writable(
        refs in 1usize..6,
    ) {
        let frame = filled(ImgFmt::Rgba, 4, 4, 0);
        let shared: Vec<_> = (0..refs).map(|_| frame.new_ref().unwrap()).collect();
        prop_assert!(!frame.is_writable());
        prop_assert!(shared.iter().all(|f| !f.is_writable()));
        drop(frame);
        prop_assert_eq!(shared[0].is_writable(), refs == 1);
    }
}
