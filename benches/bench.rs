use criterion::{criterion_group, criterion_main, Criterion};

use journey_tracker_core::{
    config::TrackerConfig,
    gps_processor::{Fix, Point, VelocityEstimator},
    map_renderer::CommandRecorder,
    position_source::ChannelPositionSource,
    JourneyTracker,
};

fn walk(n: i64) -> Vec<Fix> {
    (0..n)
        .map(|i| Fix {
            latitude: 47.378177 - 0.0000625 * i as f64,
            longitude: 8.540192,
            accuracy_m: 5.,
            timestamp_ms: 1719820800000 + i * 5000,
        })
        .collect()
}

fn haversine(c: &mut Criterion) {
    let zurich = Point::new(47.3769, 8.5417);
    let geneva = Point::new(46.2044, 6.1432);
    c.bench_function("haversine", |b| {
        b.iter(|| std::hint::black_box(zurich.haversine_distance_km(&geneva)))
    });
}

fn velocity_estimator(c: &mut Criterion) {
    let fixes = walk(10_000);
    c.bench_function("velocity_estimator", |b| {
        b.iter(|| {
            let mut estimator = VelocityEstimator::new();
            for fix in &fixes {
                std::hint::black_box(estimator.estimate(fix));
            }
        })
    });
}

fn tracker(c: &mut Criterion) {
    let fixes = walk(1_000);
    c.bench_function("tracker", |b| {
        b.iter(|| {
            let mut tracker = JourneyTracker::new(
                ChannelPositionSource::new(),
                CommandRecorder::new(),
                TrackerConfig::default(),
            );
            tracker.start_journey("bench").unwrap();
            for fix in &fixes {
                tracker.position_source_mut().push_fix(fix.clone());
                tracker.pump_events().unwrap();
                tracker.renderer_mut().take_commands();
            }
            std::hint::black_box(tracker.stop_journey().unwrap().is_some());
        })
    });
}

criterion_group!(benches, haversine, velocity_estimator, tracker);
criterion_main!(benches);
