use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tinmesh::Tin;

/// Points quantized onto a common circle, which drives many `in_circle`
/// calls to a near-zero double-precision determinant and forces the
/// adaptive `DoubleDouble` fallback. Exercises the predicate escalation
/// path the way a dense, nearly-cocircular survey point cloud would.
fn cocircular_points(n: usize, radius: f64) -> Vec<(f64, f64, f64)> {
  (0..n)
    .map(|i| {
      let theta = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
      (radius * theta.cos(), radius * theta.sin(), 0.0)
    })
    .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
  let points = cocircular_points(400, 1000.0);

  c.bench_function("predicate_escalation/cocircular_400", |b| {
    b.iter(|| {
      let mut tin = Tin::new(1.0).unwrap();
      for &(x, y, z) in &points {
        let _ = tin.add(x, y, z);
      }
      let counters = tin.predicate_counters();
      black_box((counters.calls(), counters.escalations()))
    })
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
