use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hvpager::accumulate::AccumulatorState;
use hvpager::{
    HeadlessSurface, HeadlessWidget, Pager, PagerConfig, RecordingPresentation, WheelInput,
};

fn accumulator_feed(c: &mut Criterion) {
    let cfg = PagerConfig::default();
    let edge = cfg.gesture.reverse_from_slogan;
    c.bench_function("accumulator_feed", |b| {
        let mut acc = AccumulatorState::default();
        let mut now = 0.0;
        b.iter(|| {
            now += 8.0;
            black_box(acc.feed(black_box(-7.0), now, &edge, cfg.gesture.jitter_floor_px))
        })
    });
}

fn wheel_burst(c: &mut Criterion) {
    c.bench_function("wheel_burst_through_full_sequence", |b| {
        b.iter(|| {
            let mut pager = Pager::new(
                PagerConfig::default(),
                HeadlessSurface::default(),
                HeadlessWidget::default(),
                RecordingPresentation::default(),
            )
            .expect("default config");
            pager.load(0.0);
            let mut now = 0.0;
            for _ in 0..400 {
                now += 8.0;
                black_box(pager.on_wheel(WheelInput::pixels(12.0), now));
                pager.tick(now);
            }
            black_box(pager.snapshot())
        })
    });
}

criterion_group!(benches, accumulator_feed, wheel_burst);
criterion_main!(benches);
