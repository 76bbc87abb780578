//! Benchmarks for temporal normalization

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use linea_core::{BucketWidth, TimePoint};
use linea_time::{DisplayMode, SeriesPoint, TemporalNormalizer};

fn candles(n: usize) -> Vec<SeriesPoint> {
    (0..n)
        .map(|i| SeriesPoint::new(TimePoint::from_secs(1_700_000_000 + i as i64 * 60), i as f64))
        .collect()
}

fn bench_shift_series_named_zone(c: &mut Criterion) {
    c.bench_function("shift_series_10k_new_york", |b| {
        let input = candles(10_000);
        b.iter(|| {
            let mut normalizer =
                TemporalNormalizer::new(DisplayMode::Named(chrono_tz::America::New_York));
            black_box(normalizer.shift_series(black_box(input.clone())))
        })
    });
}

fn bench_shift_series_utc_identity(c: &mut Criterion) {
    c.bench_function("shift_series_10k_utc", |b| {
        let input = candles(10_000);
        b.iter(|| {
            let mut normalizer = TemporalNormalizer::new(DisplayMode::Utc);
            black_box(normalizer.shift_series(black_box(input.clone())))
        })
    });
}

fn bench_shift_point_streaming(c: &mut Criterion) {
    c.bench_function("shift_point_streaming", |b| {
        let mut normalizer =
            TemporalNormalizer::new(DisplayMode::Named(chrono_tz::America::New_York))
                .with_bucket(BucketWidth::ONE_MINUTE);
        let mut t = 1_700_000_000i64;
        b.iter(|| {
            t += 1;
            black_box(normalizer.place(black_box(TimePoint::from_secs(t))))
        })
    });
}

criterion_group!(
    benches,
    bench_shift_series_named_zone,
    bench_shift_series_utc_identity,
    bench_shift_point_streaming
);
criterion_main!(benches);
