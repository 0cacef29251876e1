//! Integration tests for frames shared between pipeline stages.
//!
//! Decode, filter and render stages run on their own threads and pass frame
//! references over channels, the way a player pipeline does.

use crossbeam_channel::{bounded, unbounded};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use vidbuf_core::{layout, Frame, ImgFmt};

// ── Helpers ────────────────────────────────────────────────────

/// A frame adopted from "decoder" memory whose release is counted.
fn adopted_frame(index: u8, released: &Arc<AtomicUsize>) -> Frame {
    let size = layout::alloc_size(ImgFmt::Yuv420p, 64, 36, 32).unwrap();
    let data = vec![index; size + 31].into_boxed_slice();
    let released = released.clone();
    Frame::from_buffer(ImgFmt::Yuv420p, 64, 36, 32, data, move |_| {
        released.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap()
}

// ── Cross-thread release ───────────────────────────────────────

#[test]
fn release_runs_once_on_dropping_thread() {
    crate::init_tracing();
    let released = Arc::new(AtomicUsize::new(0));
    let release_thread = Arc::new(Mutex::new(None));

    let frame = {
        let size = layout::alloc_size(ImgFmt::Gray8, 16, 16, 16).unwrap();
        let data = vec![0u8; size + 15].into_boxed_slice();
        let released = released.clone();
        let release_thread = release_thread.clone();
        Frame::from_buffer(ImgFmt::Gray8, 16, 16, 16, data, move |_| {
            released.fetch_add(1, Ordering::SeqCst);
            *release_thread.lock().unwrap() = Some(thread::current().id());
        })
        .unwrap()
    };

    let r = frame.new_ref().unwrap();
    drop(frame);
    let worker = thread::spawn(move || {
        drop(r);
        thread::current().id()
    });
    let worker_id = worker.join().unwrap();

    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert_eq!(*release_thread.lock().unwrap(), Some(worker_id));
}

#[test]
fn three_stage_pipeline_releases_every_frame() {
    const FRAMES: u8 = 32;
    let released = Arc::new(AtomicUsize::new(0));

    let (to_filter, filter_rx) = bounded::<Frame>(4);
    let (to_render, render_rx) = bounded::<Frame>(4);
    let (to_stats, stats_rx) = unbounded::<Frame>();

    let decoder = {
        let released = released.clone();
        thread::spawn(move || {
            for i in 0..FRAMES {
                let mut frame = adopted_frame(i, &released);
                frame.pts = Some(f64::from(i) / 25.0);
                to_filter.send(frame).unwrap();
            }
        })
    };

    let filter = thread::spawn(move || {
        for frame in filter_rx {
            // Keep a reference for statistics while the frame moves on.
            to_stats.send(frame.new_ref().unwrap()).unwrap();
            let mut out = frame.new_ref().unwrap();
            drop(frame);
            out.make_writable().unwrap();
            out.clear(0, 0, 16, 16);
            to_render.send(out).unwrap();
        }
    });

    let renderer = thread::spawn(move || {
        let mut shown = Vec::new();
        for frame in render_rx {
            assert_eq!(frame.plane(0).unwrap().row(0)[0], 0);
            shown.push(frame.pts);
        }
        shown
    });

    decoder.join().unwrap();
    filter.join().unwrap();
    let shown = renderer.join().unwrap();
    assert_eq!(shown.len(), usize::from(FRAMES));
    assert!(shown.windows(2).all(|w| w[0] < w[1]));

    // The statistics references are the last ones to the decoder memory.
    let stats: Vec<Frame> = stats_rx.try_iter().collect();
    assert_eq!(stats.len(), usize::from(FRAMES));
    for (i, frame) in stats.iter().enumerate() {
        assert_eq!(frame.plane(0).unwrap().row(0)[0], i as u8);
        assert!(frame.is_writable());
    }
    assert_eq!(released.load(Ordering::SeqCst), 0);
    drop(stats);
    assert_eq!(released.load(Ordering::SeqCst), usize::from(FRAMES));
}

#[test]
fn concurrent_readers_share_one_backing() {
    let frame = Arc::new({
        let mut f = Frame::alloc(ImgFmt::Rgba, 128, 64).unwrap();
        f.plane_mut(0).unwrap().fill(0x5a);
        f
    });

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let frame = frame.clone();
            thread::spawn(move || {
                let r = frame.new_ref().unwrap();
                tracing::debug!("reader holds {:?}", r.buffer(0));
                let ok = r.plane(0).unwrap().iter_rows().all(|row| row.iter().all(|&b| b == 0x5a));
                ok
            })
        })
        .collect();

    for reader in readers {
        assert!(reader.join().unwrap());
    }
    assert!(frame.is_writable());
}
