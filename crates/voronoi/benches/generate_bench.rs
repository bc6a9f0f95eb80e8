//! Criterion benchmark for `generate` over random point sets.
//! Focus sizes: n in {10, 100, 1000, 10000}.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use voronoi::{generate, Point};

fn random_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
        .collect()
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for &n in &[10usize, 100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("random_square", n), &n, |b, &n| {
            b.iter_batched(
                || random_points(n, 7),
                |pts| {
                    let _d = generate(
                        &pts,
                        Some((Point::new(0.0, 0.0), Point::new(1000.0, 1000.0))),
                    )
                    .unwrap();
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
