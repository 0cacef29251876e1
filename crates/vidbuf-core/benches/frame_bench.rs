//! Benchmarks for vidbuf-core frame operations.
//!
//! Run with: cargo bench -p vidbuf-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vidbuf_core::{layout::ImageLayout, Frame, ImageParams, ImgFmt};

fn bench_layout(c: &mut Criterion) {
    c.bench_function("layout_yuv420p_1080p", |bencher| {
        bencher.iter(|| ImageLayout::compute(black_box(ImgFmt::Yuv420p), 1920, 1080, 64));
    });

    c.bench_function("layout_p010_2160p", |bencher| {
        bencher.iter(|| ImageLayout::compute(black_box(ImgFmt::P010), 3840, 2160, 64));
    });
}

fn bench_alloc(c: &mut Criterion) {
    c.bench_function("alloc_yuv420p_1080p", |bencher| {
        bencher.iter(|| Frame::alloc(black_box(ImgFmt::Yuv420p), 1920, 1080));
    });
}

fn bench_refcounting(c: &mut Criterion) {
    let frame = Frame::alloc(ImgFmt::Nv12, 1920, 1080).unwrap();

    c.bench_function("new_ref_nv12_1080p", |bencher| {
        bencher.iter(|| black_box(&frame).new_ref());
    });

    // Copy-on-write of a shared frame: one full copy per iteration.
    c.bench_function("make_writable_shared_nv12_1080p", |bencher| {
        bencher.iter(|| {
            let mut r = frame.new_ref().unwrap();
            r.make_writable().unwrap();
            r
        });
    });
}

fn bench_pixel_ops(c: &mut Criterion) {
    let mut frame = Frame::alloc(ImgFmt::Yuv420p, 1920, 1080).unwrap();

    c.bench_function("clear_yuv420p_1080p", |bencher| {
        bencher.iter(|| frame.clear(0, 0, 1920, 1080));
    });

    let src = Frame::alloc(ImgFmt::Yuv420p10, 1920, 1080).unwrap();
    let mut dst = Frame::alloc(ImgFmt::Yuv420p10, 1920, 1080).unwrap();
    c.bench_function("copy_yuv420p10_1080p", |bencher| {
        bencher.iter(|| dst.copy_from(black_box(&src)));
    });
}

fn bench_guess_csp(c: &mut Criterion) {
    let params = ImageParams::new(ImgFmt::Yuv420p, 1920, 1080);

    c.bench_function("guess_csp_yuv", |bencher| {
        bencher.iter(|| {
            let mut p = black_box(params);
            p.guess_csp();
            p
        });
    });
}

criterion_group!(
    benches,
    bench_layout,
    bench_alloc,
    bench_refcounting,
    bench_pixel_ops,
    bench_guess_csp
);
criterion_main!(benches);
