//! Criterion benchmarks for pricer_core numerics.
//!
//! Measures Gauss-Legendre integration for each shared rule size and Brent
//! root finding on a smooth and a steep objective.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::math::quadrature::{GaussLegendre, SharedRule};
use pricer_core::math::solvers::BrentSolver;

/// Benchmark integration of a Gaussian density over a finite range.
fn bench_quadrature(c: &mut Criterion) {
    let mut group = c.benchmark_group("gauss_legendre");
    let density = |x: f64| (-0.5 * x * x).exp();

    for size in [
        SharedRule::Six,
        SharedRule::Twelve,
        SharedRule::Twenty,
        SharedRule::SixtyFour,
    ] {
        let rule = GaussLegendre::shared(size);
        group.bench_with_input(
            BenchmarkId::new("integrate", size.points()),
            &rule,
            |b, rule| b.iter(|| rule.integrate(density, black_box(-4.0), black_box(1.5))),
        );
    }

    group.bench_function("build_64", |b| {
        b.iter(|| GaussLegendre::new(black_box(64)))
    });

    group.finish();
}

/// Benchmark Brent root finding.
fn bench_brent(c: &mut Criterion) {
    let mut group = c.benchmark_group("brent");
    let solver = BrentSolver::<f64>::with_defaults();

    group.bench_function("log_two", |b| {
        b.iter(|| solver.find_root(|x: f64| x.exp() - 2.0, black_box(0.0), black_box(1.0)))
    });
    group.bench_function("steep_cubic", |b| {
        b.iter(|| {
            solver.find_root(
                |x: f64| 1e3 * (x - 0.3).powi(3) + 1e-3,
                black_box(-1.0),
                black_box(1.0),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_quadrature, bench_brent);
criterion_main!(benches);
