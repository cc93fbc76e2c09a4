//! Find the initial non-degenerate triangle a fresh [`crate::Tin`] bootstraps
//! from: random trials, falling back to a principal-axis analysis and then
//! an exhaustive search.

use crate::data::VertexIndex;
use crate::numeric::Thresholds;
use crate::predicates::{area, orientation, Orientation, Point, PredicateCounters};
use crate::random::XorShift64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
  Valid([VertexIndex; 3]),
  InsufficientPointSet,
  TrivialPointSet,
  CollinearPointSet,
}

fn bootstrap_area_threshold(nominal_point_spacing: f64) -> f64 {
  (3f64.sqrt() / 4.0 / 64.0) * nominal_point_spacing
}

/// `points[i]` must be addressable by `VertexIndex(i as u32 + 1)` (the ghost
/// sits at index 0 and is never a candidate here).
pub fn bootstrap(
  points: &[Point],
  thresholds: &Thresholds,
  counters: &PredicateCounters,
  rng: &mut XorShift64,
) -> BootstrapOutcome {
  let n = points.len();
  if n < 3 {
    return BootstrapOutcome::InsufficientPointSet;
  }
  let threshold = bootstrap_area_threshold(thresholds.nominal_point_spacing());

  let mut best: Option<(usize, usize, usize, f64)> = None;
  let trials = ((n as f64).cbrt() as usize).clamp(3, 16);
  for _ in 0..trials {
    let (i, j, k) = random_triple(n, rng);
    let a = area(points[i], points[j], points[k], thresholds, counters).abs();
    if best.map_or(true, |(_, _, _, best_a)| a > best_a) {
      best = Some((i, j, k, a));
    }
  }

  if let Some((i, j, k, a)) = best {
    if a >= threshold {
      return finish(points, i, j, k, thresholds, counters);
    }
  }

  if let Some((i, j, k)) = principal_axis_fallback(points) {
    let a = area(points[i], points[j], points[k], thresholds, counters).abs();
    if a >= threshold {
      return finish(points, i, j, k, thresholds, counters);
    }
  }

  for i in 0..n {
    for j in (i + 1)..n {
      for k in (j + 1)..n {
        let a = area(points[i], points[j], points[k], thresholds, counters).abs();
        if a >= threshold {
          return finish(points, i, j, k, thresholds, counters);
        }
      }
    }
  }

  if points.iter().all(|&p| p == points[0]) {
    BootstrapOutcome::TrivialPointSet
  } else {
    BootstrapOutcome::CollinearPointSet
  }
}

fn random_triple(n: usize, rng: &mut XorShift64) -> (usize, usize, usize) {
  loop {
    let i = rng.next_below(n as u32) as usize;
    let j = rng.next_below(n as u32) as usize;
    let k = rng.next_below(n as u32) as usize;
    if i != j && j != k && i != k {
      return (i, j, k);
    }
  }
}

fn finish(
  points: &[Point],
  i: usize,
  j: usize,
  k: usize,
  thresholds: &Thresholds,
  counters: &PredicateCounters,
) -> BootstrapOutcome {
  let (i, j, k) = match orientation(points[i], points[j], points[k], thresholds, counters) {
    Orientation::CounterClockwise => (i, j, k),
    _ => (i, k, j),
  };
  BootstrapOutcome::Valid([
    VertexIndex(i as u32 + 1),
    VertexIndex(j as u32 + 1),
    VertexIndex(k as u32 + 1),
  ])
}

/// Variance-covariance analysis of the point cloud: compute the dominant
/// axis and return the two points extremal along it plus the point
/// extremal perpendicular to it, to probe for a non-degenerate triangle in
/// an otherwise nearly-collinear cloud.
fn principal_axis_fallback(points: &[Point]) -> Option<(usize, usize, usize)> {
  let n = points.len();
  if n < 3 {
    return None;
  }
  let (mut mx, mut my) = (0.0, 0.0);
  for &(x, y) in points {
    mx += x;
    my += y;
  }
  mx /= n as f64;
  my /= n as f64;

  let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
  for &(x, y) in points {
    let (dx, dy) = (x - mx, y - my);
    sxx += dx * dx;
    sxy += dx * dy;
    syy += dy * dy;
  }
  let theta = 0.5 * (2.0 * sxy).atan2(sxx - syy);
  let (ax, ay) = (theta.cos(), theta.sin());
  let (px, py) = (-ay, ax);

  let mut along_min = (0, f64::INFINITY);
  let mut along_max = (0, f64::NEG_INFINITY);
  let mut perp_max = (0, f64::NEG_INFINITY);
  for (idx, &(x, y)) in points.iter().enumerate() {
    let (dx, dy) = (x - mx, y - my);
    let along = dx * ax + dy * ay;
    let perp = (dx * px + dy * py).abs();
    if along < along_min.1 {
      along_min = (idx, along);
    }
    if along > along_max.1 {
      along_max = (idx, along);
    }
    if perp > perp_max.1 {
      perp_max = (idx, perp);
    }
  }

  let (i, j, k) = (along_min.0, along_max.0, perp_max.0);
  if i == j || j == k || i == k {
    None
  } else {
    Some((i, j, k))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn setup() -> (Thresholds, PredicateCounters, XorShift64) {
    (Thresholds::new(1.0).unwrap(), PredicateCounters::new(), XorShift64::default())
  }

  #[test]
  fn finds_triangle_among_well_spread_points() {
    let (t, c, mut rng) = setup();
    let pts = [(0.0, 0.0), (1.0, 0.0), (0.5, 1.0)];
    match bootstrap(&pts, &t, &c, &mut rng) {
      BootstrapOutcome::Valid(vs) => {
        let set: std::collections::HashSet<_> = vs.iter().map(|v| v.0).collect();
        assert_eq!(set.len(), 3);
      }
      other => panic!("expected Valid, got {:?}", other),
    }
  }

  #[test]
  fn detects_collinear_point_set() {
    let (t, c, mut rng) = setup();
    let pts = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)];
    assert_eq!(bootstrap(&pts, &t, &c, &mut rng), BootstrapOutcome::CollinearPointSet);
  }

  #[test]
  fn detects_trivial_point_set() {
    let (t, c, mut rng) = setup();
    let pts = [(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)];
    assert_eq!(bootstrap(&pts, &t, &c, &mut rng), BootstrapOutcome::TrivialPointSet);
  }

  #[test]
  fn rejects_too_few_points() {
    let (t, c, mut rng) = setup();
    let pts = [(0.0, 0.0), (1.0, 0.0)];
    assert_eq!(bootstrap(&pts, &t, &c, &mut rng), BootstrapOutcome::InsufficientPointSet);
  }

  #[test]
  fn result_is_counterclockwise() {
    let (t, c, mut rng) = setup();
    let pts = [(0.0, 1.0), (0.0, 0.0), (1.0, 0.0)];
    if let BootstrapOutcome::Valid([i, j, k]) = bootstrap(&pts, &t, &c, &mut rng) {
      let idx = |v: VertexIndex| pts[(v.0 - 1) as usize];
      assert_eq!(orientation(idx(i), idx(j), idx(k), &t, &c), Orientation::CounterClockwise);
    } else {
      panic!("expected Valid");
    }
  }
}
