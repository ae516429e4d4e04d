use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eframe::egui::{Pos2, Vec2};
use std::time::{Duration, Instant};

use miru::viewport::{Tick, ViewConfig, ViewTransform};

fn bench_anchored_zoom(c: &mut Criterion) {
    c.bench_function("zoom_to_point_immediate", |b| {
        let mut vt = ViewTransform::new(ViewConfig::default());
        vt.set_media_size(Vec2::new(4000.0, 3000.0));
        b.iter(|| {
            vt.zoom_to_point(black_box(1.1), Pos2::new(640.0, 360.0), false);
            vt.zoom_to_point(black_box(1.0 / 1.1), Pos2::new(640.0, 360.0), false);
            black_box(vt.view_params());
        })
    });
}

fn bench_instant_fit(c: &mut Criterion) {
    c.bench_function("instant_fit_4k_media", |b| {
        let mut vt = ViewTransform::new(ViewConfig::default());
        vt.set_media_size(Vec2::new(3840.0, 2160.0));
        b.iter(|| {
            vt.instant_fit(black_box(Vec2::new(1280.0, 720.0)));
            black_box(vt.view_params());
        })
    });
}

fn bench_full_animation(c: &mut Criterion) {
    c.bench_function("animated_zoom_10_steps", |b| {
        let mut vt = ViewTransform::new(ViewConfig::default());
        vt.set_media_size(Vec2::new(1920.0, 1080.0));
        // Simulated monotonic clock, advanced by the tick outcomes
        let mut now = Instant::now();
        b.iter(|| {
            vt.zoom_to_point(black_box(2.0), Pos2::new(960.0, 540.0), true);
            loop {
                match vt.tick(now) {
                    Tick::Idle | Tick::Finished => break,
                    Tick::Deferred(delay) => now += delay,
                    Tick::Advanced => now += Duration::from_millis(20),
                }
            }
            // Undo so the next iteration has headroom below the zoom limit
            vt.zoom_to_point(0.5, Pos2::new(960.0, 540.0), false);
        })
    });
}

criterion_group!(
    benches,
    bench_anchored_zoom,
    bench_instant_fit,
    bench_full_animation
);
criterion_main!(benches);
