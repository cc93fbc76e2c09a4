use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tinmesh::data::LinearConstraint;
use tinmesh::Tin;

fn dense_tin(n: usize, rng: &mut SmallRng) -> Tin {
  let mut tin = Tin::new(1.0).unwrap();
  for _ in 0..n {
    let x = rng.gen_range(-500.0..500.0);
    let y = rng.gen_range(-500.0..500.0);
    let _ = tin.add(x, y, 0.0);
  }
  tin
}

/// A zig-zag polyline crossing the whole point cloud, forcing the tracer
/// to flip or split its way through many existing triangles per segment.
fn crossing_polyline(segments: usize) -> Vec<(f64, f64, f64)> {
  (0..=segments)
    .map(|i| {
      let t = i as f64 / segments as f64;
      let x = -480.0 + t * 960.0;
      let y = if i % 2 == 0 { -480.0 } else { 480.0 };
      (x, y, 0.0)
    })
    .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
  let mut rng = SmallRng::seed_from_u64(0xc0ffee);
  let base = dense_tin(2_000, &mut rng);
  let polyline = crossing_polyline(40);

  c.bench_function("constraint_insertion/40_segment_polyline_over_2000_points", |b| {
    b.iter_batched(
      || base.clone(),
      |mut tin| {
        let constraint = LinearConstraint::new(polyline.clone(), ());
        black_box(tin.add_constraints(vec![constraint], Vec::new(), false).unwrap())
      },
      criterion::BatchSize::LargeInput,
    )
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
