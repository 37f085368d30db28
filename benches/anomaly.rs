//! Benchmarks for the FFT, decomposition and full detection pipeline.

use anofox_anomaly::detection::fft::{fft_in_place, real_to_complex};
use anofox_anomaly::detection::{detect, AnomalyConfig};
use anofox_anomaly::seasonality::decompose;
use anofox_anomaly::utils::median;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_series(n: usize, period: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
                + 0.1 * ((i * 7919 % 101) as f64 / 101.0 - 0.5)
        })
        .collect()
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft");

    for size in [64, 256, 1024, 4096].iter() {
        let signal = generate_series(*size, 16);
        group.bench_with_input(BenchmarkId::new("radix2", size), size, |b, &n| {
            b.iter(|| {
                let mut samples = real_to_complex(black_box(&signal), n);
                fft_in_place(&mut samples, n);
                samples
            })
        });
    }

    group.finish();
}

fn bench_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("median");

    for size in [17, 129, 1025].iter() {
        let values = generate_series(*size, 7);
        group.bench_with_input(BenchmarkId::new("select", size), size, |b, _| {
            b.iter(|| median(black_box(&values)))
        });
    }

    group.finish();
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");

    for size in [256, 1024, 4096].iter() {
        let series = generate_series(*size, 16);
        group.bench_with_input(BenchmarkId::new("median_stl", size), size, |b, _| {
            b.iter(|| decompose(black_box(&series), 17, 15, 8, 2))
        });
    }

    group.finish();
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");

    for size in [256, 1024, 4096].iter() {
        let mut series = generate_series(*size, 16);
        series[size / 2] += 10.0;
        let config = AnomalyConfig::new(256, 8, 2);
        group.bench_with_input(BenchmarkId::new("pipeline", size), size, |b, _| {
            b.iter(|| detect(black_box(&series), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fft, bench_median, bench_decompose, bench_detect);
criterion_main!(benches);
