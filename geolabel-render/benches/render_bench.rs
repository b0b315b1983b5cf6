use criterion::{criterion_group, criterion_main, Criterion};

use geolabel_core::PixelPoint;
use geolabel_render::{render_center_mark, render_marker, MarkerStyle, RenderBuffer};

fn bench_render_marker(c: &mut Criterion) {
    let base = RenderBuffer::filled(512, 512, [200, 200, 200, 255]);
    let style = MarkerStyle::default();

    c.bench_function("marker_512x512", |b| {
        b.iter(|| render_marker(&base, PixelPoint::new(256.0, 256.0), &style));
    });
}

fn bench_render_marker_large(c: &mut Criterion) {
    let base = RenderBuffer::filled(2048, 2048, [200, 200, 200, 255]);
    let style = MarkerStyle::with_radius(40);

    c.bench_function("marker_2048x2048_r40", |b| {
        b.iter(|| render_marker(&base, PixelPoint::new(1000.0, 900.0), &style));
    });
}

fn bench_center_mark(c: &mut Criterion) {
    let base = RenderBuffer::filled(512, 512, [200, 200, 200, 255]);
    let style = MarkerStyle::default();

    c.bench_function("center_mark_512x512", |b| {
        b.iter(|| render_center_mark(&base, PixelPoint::new(256.0, 256.0), &style));
    });
}

criterion_group!(
    benches,
    bench_render_marker,
    bench_render_marker_large,
    bench_center_mark
);
criterion_main!(benches);
