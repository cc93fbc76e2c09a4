use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tinmesh::Tin;

fn random_points(n: usize, rng: &mut SmallRng) -> Vec<(f64, f64, f64)> {
  (0..n)
    .map(|_| (rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0), 0.0))
    .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
  let mut rng = SmallRng::seed_from_u64(0xdeadbeef);
  let mut group = c.benchmark_group("incremental_insertion");
  for &n in &[100usize, 1_000, 10_000] {
    let points = random_points(n, &mut rng);
    group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
      b.iter(|| {
        let mut tin = Tin::new(1.0).unwrap();
        for &(x, y, z) in points {
          let _ = tin.add(x, y, z);
        }
        tin
      })
    });
  }
  group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
