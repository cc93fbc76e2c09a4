//! Stochastic Lawson's walk: point location by side-testing and transferring
//! across triangle edges toward the query point.

use crate::data::{EdgeIndex, EdgePool, VertexIndex};
use crate::numeric::Thresholds;
use crate::predicates::{half_plane, Point, PredicateCounters};
use crate::random::XorShift64;
use crate::Error;

const MAX_WALK_STEPS: u32 = 100_000;

/// Locate `(x, y)` starting from `start`, returning an edge of the
/// enclosing triangle (or, for points outside the hull, a perimeter edge
/// whose exterior strip contains the point).
pub fn locate(
  pool: &EdgePool,
  vertices: &[(f64, f64)],
  start: EdgeIndex,
  target: Point,
  thresholds: &Thresholds,
  counters: &PredicateCounters,
  rng: &mut XorShift64,
) -> Result<EdgeIndex, Error> {
  let coord = |v: VertexIndex| vertices[v.0 as usize];
  let mut e = start;
  let mut steps = 0u32;

  loop {
    steps += 1;
    if steps > MAX_WALK_STEPS {
      return Err(Error::IterationLimitExceeded);
    }

    if pool.is_ghost_edge(e) || pool.is_ghost_vertex(pool.apex(e)) {
      return perimeter_walk(pool, vertices, e, target, thresholds, counters);
    }

    let a = coord(pool.origin(e));
    let b = coord(pool.destination(e));
    let h = half_plane(a, b, target, thresholds, counters);
    if h > 0.0 {
      e = pool.dual(e);
      continue;
    }

    let fwd = pool.forward(e);
    let rev = pool.reverse(e);
    let mut order = [fwd, rev];
    if rng.next_below(2) == 1 {
      order.swap(0, 1);
    }

    let mut rejected = None;
    for &cand in &order {
      if pool.is_ghost_edge(cand) {
        continue;
      }
      let ca = coord(pool.origin(cand));
      let cb = coord(pool.destination(cand));
      let hc = half_plane(ca, cb, target, thresholds, counters);
      if hc > 0.0 {
        rejected = Some(cand);
        break;
      }
    }

    match rejected {
      Some(cand) => e = pool.dual(cand),
      None => return Ok(e),
    }
  }
}

/// Walk perimeter edges starting from the ghost edge `e` until the query
/// point's projection falls in the strip subtended by a hull edge.
fn perimeter_walk(
  pool: &EdgePool,
  vertices: &[(f64, f64)],
  e: EdgeIndex,
  target: Point,
  thresholds: &Thresholds,
  counters: &PredicateCounters,
) -> Result<EdgeIndex, Error> {
  let coord = |v: VertexIndex| vertices[v.0 as usize];
  // The ghost triangle containing `e` has exactly one non-ghost edge;
  // reach it by walking forward, then orient it as the canonical hull
  // direction (the one whose dual's apex is the ghost vertex).
  let mut cur = e;
  let mut real_edge = None;
  for _ in 0..3 {
    if !pool.is_ghost_edge(cur) {
      real_edge = Some(cur);
      break;
    }
    cur = pool.forward(cur);
  }
  let real_edge = real_edge.ok_or(Error::InvariantViolated)?;
  let mut hull_edge = if pool.is_perimeter_edge(real_edge) {
    real_edge
  } else {
    real_edge.dual()
  };

  let mut steps = 0u32;
  loop {
    steps += 1;
    if steps > MAX_WALK_STEPS {
      return Err(Error::IterationLimitExceeded);
    }

    let a = coord(pool.origin(hull_edge));
    let b = coord(pool.destination(hull_edge));
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
      ((target.0 - a.0) * dx + (target.1 - a.1) * dy) / len_sq
    } else {
      0.5
    };

    if t < 0.0 {
      hull_edge = prev_hull_edge(pool, hull_edge);
    } else if t > 1.0 {
      hull_edge = next_hull_edge(pool, hull_edge);
    } else {
      return Ok(hull_edge);
    }
  }
}

/// The hull edge following `hull_edge`, reached by rotating ccw around its
/// destination vertex past the ghost spoke.
fn next_hull_edge(pool: &EdgePool, hull_edge: EdgeIndex) -> EdgeIndex {
  let mut spoke = pool.dual(hull_edge);
  loop {
    spoke = pool.rotate_ccw(spoke);
    if pool.is_ghost_vertex(pool.destination(spoke)) {
      break;
    }
  }
  pool.rotate_ccw(spoke)
}

/// The hull edge preceding `hull_edge`, reached by rotating ccw around its
/// origin vertex until one step past would cross the ghost spoke.
fn prev_hull_edge(pool: &EdgePool, hull_edge: EdgeIndex) -> EdgeIndex {
  let mut spoke = hull_edge;
  loop {
    let next = pool.rotate_ccw(spoke);
    if pool.is_ghost_vertex(pool.destination(next)) {
      break;
    }
    spoke = next;
  }
  pool.dual(spoke)
}
