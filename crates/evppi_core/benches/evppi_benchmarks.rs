//! Criterion benchmarks for evppi_core sampling and estimation
//!
//! Run with: cargo bench -p evppi_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use evppi_core::config::EvppiConfig;
use evppi_core::evppi::estimate_evppi;
use evppi_core::model::MonteCarloResult;
use evppi_core::smoothing::{BinnedMeans, PenalizedSpline, Smoother};

fn config_with_samples(n_samples: usize) -> EvppiConfig {
    EvppiConfig {
        n_samples,
        ..Default::default()
    }
}

fn sample(n_samples: usize) -> MonteCarloResult {
    config_with_samples(n_samples)
        .run()
        .expect("default configuration is valid")
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");

    for n_samples in [1_000, 10_000, 100_000].iter() {
        let config = config_with_samples(*n_samples);
        group.bench_with_input(BenchmarkId::new("samples", n_samples), n_samples, |b, _| {
            b.iter(|| black_box(&config).run())
        });
    }

    group.finish();
}

fn bench_smoothers(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoother_fit");
    let result = sample(5_000);
    let x = result.samples.column_vec(0);
    let y = result.outcomes.column_vec(0);

    let spline = PenalizedSpline::default();
    group.bench_function("penalized_spline", |b| {
        b.iter(|| spline.fit(black_box(&x), black_box(&y)))
    });

    let binned = BinnedMeans::default();
    group.bench_function("binned_means", |b| {
        b.iter(|| binned.fit(black_box(&x), black_box(&y)))
    });

    group.finish();
}

fn bench_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_evppi");

    for n_samples in [1_000, 10_000].iter() {
        let result = sample(*n_samples);
        let spline = PenalizedSpline::default();
        group.bench_with_input(BenchmarkId::new("samples", n_samples), n_samples, |b, _| {
            b.iter(|| estimate_evppi(black_box(&result), &spline))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_monte_carlo, bench_smoothers, bench_estimation);
criterion_main!(benches);
