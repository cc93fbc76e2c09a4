//! Constraint insertion: trace each segment through the mesh, laying it
//! down by flipping unconstrained crossings or splitting at a Steiner
//! vertex, then flood-fill border/interior indices across the region it
//! bounds.

use crate::data::{ConstraintWarning, EdgeIndex, EdgePool, RealVertex, Vertex, VertexIndex, VertexStatus, NO_CONSTRAINT};
use crate::numeric::Thresholds;
use crate::predicates::{orientation, Orientation, Point, PredicateCounters};
use crate::Error;

use super::insertion::{flip, restore_delaunay};

const MAX_TRACE_STEPS: u32 = 100_000;

fn side(a: Point, b: Point, x: Point, t: &Thresholds, c: &PredicateCounters) -> i32 {
  match orientation(a, b, x, t, c) {
    Orientation::CounterClockwise => 1,
    Orientation::Clockwise => -1,
    Orientation::Collinear => 0,
  }
}

/// Rotate around `from` looking for an existing edge `from -> to`.
fn find_edge_between(pool: &EdgePool, from: VertexIndex, to: VertexIndex) -> Option<EdgeIndex> {
  let start = {
    let mut e = None;
    for base in pool.iter_base_edges() {
      if pool.origin(base) == from {
        e = Some(base);
        break;
      }
      if pool.origin(base.dual()) == from {
        e = Some(base.dual());
        break;
      }
    }
    e
  }?;
  let mut spoke = start;
  for _ in 0..4096 {
    if pool.destination(spoke) == to {
      return Some(spoke);
    }
    spoke = pool.rotate_ccw(spoke);
    if spoke == start {
      break;
    }
  }
  None
}

/// Intersection of segment `(p, q)` with segment `(r, s)`, assumed to
/// actually cross.
fn segment_intersection(p: Point, q: Point, r: Point, s: Point) -> Point {
  let (dx1, dy1) = (q.0 - p.0, q.1 - p.1);
  let (dx2, dy2) = (s.0 - r.0, s.1 - r.1);
  let denom = dx1 * dy2 - dy1 * dx2;
  if denom.abs() < f64::EPSILON {
    return ((p.0 + q.0) / 2.0, (p.1 + q.1) / 2.0);
  }
  let t = ((r.0 - p.0) * dy2 - (r.1 - p.1) * dx2) / denom;
  (p.0 + t * dx1, p.1 + t * dy1)
}

/// Find the edge of the triangle fan at `p` whose opposite side the ray
/// toward `q` crosses.
fn find_departing_edge(
  pool: &EdgePool,
  vertices: &[(f64, f64)],
  p: VertexIndex,
  q: VertexIndex,
  thresholds: &Thresholds,
  counters: &PredicateCounters,
) -> Result<EdgeIndex, Error> {
  let coord = |v: VertexIndex| vertices[v.0 as usize];
  let mut spoke = {
    let mut found = None;
    for base in pool.iter_base_edges() {
      if pool.origin(base) == p && !pool.is_ghost_vertex(pool.destination(base)) {
        found = Some(base);
        break;
      }
      if pool.origin(base.dual()) == p && !pool.is_ghost_vertex(pool.destination(base.dual())) {
        found = Some(base.dual());
        break;
      }
    }
    found.ok_or(Error::InvariantViolated)?
  };
  let start = spoke;
  let pq = (coord(p), coord(q));
  for _ in 0..4096 {
    let next = pool.rotate_ccw(spoke);
    let s_cur = side(pq.0, pq.1, coord(pool.destination(spoke)), thresholds, counters);
    let s_next = side(pq.0, pq.1, coord(pool.destination(next)), thresholds, counters);
    if s_cur >= 0 && s_next <= 0 && !(s_cur == 0 && s_next == 0) {
      return Ok(pool.forward(spoke));
    }
    spoke = next;
    if spoke == start {
      break;
    }
  }
  Err(Error::InvariantViolated)
}

/// Lay a single constrained segment `p -> q` into the mesh. Returns a
/// [`ConstraintWarning::DuplicateSegment`] if the segment coincided with an
/// edge already carrying a different constraint's index (the existing
/// constraint is left in place rather than overwritten).
pub fn trace_and_constrain_segment(
  pool: &mut EdgePool,
  vertices: &mut Vec<(f64, f64)>,
  vertex_table: &mut Vec<Vertex>,
  thresholds: &Thresholds,
  counters: &PredicateCounters,
  p: VertexIndex,
  q: VertexIndex,
  constraint_index: i32,
  mark_as_border: bool,
) -> Result<Option<ConstraintWarning>, Error> {
  if let Some(edge) = find_edge_between(pool, p, q) {
    if let Some(existing) = conflicting_index(pool, edge, mark_as_border) {
      if existing != constraint_index {
        return Ok(Some(ConstraintWarning::DuplicateSegment { a: p, b: q }));
      }
    }
    mark_constrained(pool, edge, constraint_index, mark_as_border);
    return Ok(None);
  }

  let coord = |v: VertexIndex| vertices[v.0 as usize];
  let mut ce = find_departing_edge(pool, vertices, p, q, thresholds, counters)?;
  let mut steps = 0u32;

  loop {
    steps += 1;
    if steps > MAX_TRACE_STEPS {
      return Err(Error::IterationLimitExceeded);
    }

    let te = pool.dual(ce);
    let fa = pool.apex(te);

    if fa == q {
      // The final crossed edge's far apex is q itself: the triangle on
      // the other side of `ce` already touches q, so flipping `ce` (if
      // possible) lays the constraint directly.
      if !pool.is_constrained(ce) {
        flip(pool, ce);
      }
      if let Some(edge) = find_edge_between(pool, p, q) {
        if let Some(existing) = conflicting_index(pool, edge, mark_as_border) {
          if existing != constraint_index {
            return Ok(Some(ConstraintWarning::DuplicateSegment { a: p, b: q }));
          }
        }
        mark_constrained(pool, edge, constraint_index, mark_as_border);
        return Ok(None);
      }
    }

    if !pool.is_constrained(ce) {
      // Attempt a flip; if it produces the direct p-q edge we are done,
      // otherwise keep tracing with the freshly oriented diagonal.
      flip(pool, ce);
      if let Some(edge) = find_edge_between(pool, p, q) {
        if let Some(existing) = conflicting_index(pool, edge, mark_as_border) {
          if existing != constraint_index {
            return Ok(Some(ConstraintWarning::DuplicateSegment { a: p, b: q }));
          }
        }
        mark_constrained(pool, edge, constraint_index, mark_as_border);
        return Ok(None);
      }
      ce = find_departing_edge(pool, vertices, p, q, thresholds, counters)?;
      continue;
    }

    // `ce` is constrained and can't be flipped: split it at its
    // intersection with `pq`, continue tracing from the new vertex.
    let a = coord(pool.origin(ce));
    let b = coord(pool.destination(ce));
    let (ix, iy) = segment_intersection(coord(p), coord(q), a, b);
    let m_idx = VertexIndex(vertex_table.len() as u32);
    vertex_table.push(Vertex::Real(RealVertex {
      x: ix,
      y: iy,
      z: 0.0,
      index: -1,
      status: VertexStatus::SYNTHETIC,
    }));
    vertices.push((ix, iy));
    let split_result = pool.split_edge(ce, m_idx)?;
    let outer = vec![
      split_result,
      pool.forward(split_result),
      pool.reverse(split_result),
      pool.dual(split_result),
    ];
    restore_delaunay(pool, vertices, thresholds, counters, outer)?;

    let first_half = trace_and_constrain_segment(
      pool,
      vertices,
      vertex_table,
      thresholds,
      counters,
      p,
      m_idx,
      constraint_index,
      mark_as_border,
    )?;
    let second_half = trace_and_constrain_segment(
      pool,
      vertices,
      vertex_table,
      thresholds,
      counters,
      m_idx,
      q,
      constraint_index,
      mark_as_border,
    )?;
    return Ok(first_half.or(second_half));
  }
}

/// If `edge` (on the side this constraint would mark) already carries a
/// constraint index, return it.
fn conflicting_index(pool: &EdgePool, edge: EdgeIndex, mark_as_border: bool) -> Option<i32> {
  let idx = if mark_as_border {
    pool.border_index(edge)
  } else {
    pool.constraint_line_index(edge)
  };
  if idx == NO_CONSTRAINT {
    None
  } else {
    Some(idx)
  }
}

fn mark_constrained(pool: &mut EdgePool, edge: EdgeIndex, constraint_index: i32, mark_as_border: bool) {
  if mark_as_border {
    pool.set_border_index(edge, constraint_index);
  } else {
    pool.set_constraint_line_index(edge, constraint_index);
    pool.set_constraint_line_index(edge.dual(), constraint_index);
  }
}

/// Flood-fill `interior_index = constraint_index` across every triangle
/// strictly inside the region bounded by border edges carrying
/// `constraint_index`, starting from `seed` (a half-edge whose left face
/// is known to lie inside). Stops at any edge already marked as a border.
pub fn flood_fill_region(pool: &mut EdgePool, seed: EdgeIndex, constraint_index: i32) -> Result<(), Error> {
  let mut stack = vec![seed];
  let mut visited = std::collections::HashSet::new();
  let mut steps = 0u64;

  while let Some(e) = stack.pop() {
    steps += 1;
    if steps > 1_000_000 {
      return Err(Error::IterationLimitExceeded);
    }
    if !visited.insert(e.0) {
      continue;
    }
    if pool.is_ghost_edge(e) {
      continue;
    }
    // The face to the left of `e` is inside the region regardless of
    // whether `e` also happens to be a border (a border edge's own
    // interior-facing side still belongs to the triangle being filled).
    pool.set_interior_index(e, constraint_index);

    for next in [pool.forward(e), pool.reverse(e)] {
      // Same face as `e`: always continue around it.
      if !visited.contains(&next.0) {
        stack.push(next);
      }
      // Only cross into the neighboring face if `next` isn't itself a
      // border, so the fill can't escape the region.
      if pool.border_index(next) == NO_CONSTRAINT {
        let across = next.dual();
        if !pool.is_ghost_edge(across) && !visited.contains(&across.0) {
          stack.push(across);
        }
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::{RealVertex, VertexStatus};

  fn v(i: u32) -> VertexIndex {
    VertexIndex(i)
  }

  fn square_mesh() -> (EdgePool, Vec<(f64, f64)>) {
    // Two triangles covering a unit square: (0,0),(1,0),(1,1),(0,1),
    // split along the (0,0)-(1,1) diagonal.
    let ghost = v(0);
    let (v0, v1, v2, v3) = (v(1), v(2), v(3), v(4));
    let mut pool = EdgePool::new(ghost);
    let e01 = pool.allocate_edge(v0, v1).unwrap();
    let e12 = pool.allocate_edge(v1, v2).unwrap();
    let e20 = pool.allocate_edge(v2, v0).unwrap();
    pool.link(e01, e12);
    pool.link(e12, e20);
    pool.link(e20, e01);

    let e02 = e20.dual();
    let e23 = pool.allocate_edge(v2, v3).unwrap();
    let e30 = pool.allocate_edge(v3, v0).unwrap();
    pool.link(e02, e23);
    pool.link(e23, e30);
    pool.link(e30, e02);

    let gv0 = pool.allocate_edge(ghost, v0).unwrap();
    let gv1 = pool.allocate_edge(ghost, v1).unwrap();
    let gv2 = pool.allocate_edge(ghost, v2).unwrap();
    let gv3 = pool.allocate_edge(ghost, v3).unwrap();

    pool.link(e01.dual(), gv0.dual());
    pool.link(gv0.dual(), gv1);
    pool.link(gv1, e01.dual());

    pool.link(e12.dual(), gv1.dual());
    pool.link(gv1.dual(), gv2);
    pool.link(gv2, e12.dual());

    pool.link(e23.dual(), gv2.dual());
    pool.link(gv2.dual(), gv3);
    pool.link(gv3, e23.dual());

    pool.link(e30.dual(), gv3.dual());
    pool.link(gv3.dual(), gv0);
    pool.link(gv0, e30.dual());

    let vertices = vec![(f64::NAN, f64::NAN), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
    (pool, vertices)
  }

  #[test]
  fn find_edge_between_locates_existing_edge() {
    let (pool, _vertices) = square_mesh();
    let e = find_edge_between(&pool, v(1), v(2));
    assert!(e.is_some());
    assert_eq!(pool.origin(e.unwrap()), v(1));
    assert_eq!(pool.destination(e.unwrap()), v(2));
  }

  #[test]
  fn flood_fill_marks_interior_without_crossing_border() {
    let (mut pool, _vertices) = square_mesh();
    let e01 = find_edge_between(&pool, v(1), v(2)).unwrap();
    // Mark the whole hull as a border so flood fill from inside the
    // square doesn't escape.
    for base in pool.iter_base_edges_skip_ghosts().collect::<Vec<_>>() {
      if pool.is_perimeter_edge(base) {
        pool.set_border_index(base, 7);
      }
    }
    let diagonal = pool.forward(e01).dual();
    flood_fill_region(&mut pool, diagonal, 7).unwrap();
    assert_eq!(pool.interior_index(diagonal), 7);
  }

  #[test]
  fn trace_marks_existing_edge_directly() {
    let (mut pool, mut vertices) = square_mesh();
    let mut vertex_table: Vec<Vertex> = vertices
      .iter()
      .map(|&(x, y)| {
        Vertex::Real(RealVertex {
          x,
          y,
          z: 0.0,
          index: 0,
          status: VertexStatus::empty(),
        })
      })
      .collect();
    let t = Thresholds::new(1.0).unwrap();
    let c = PredicateCounters::new();
    let warning =
      trace_and_constrain_segment(&mut pool, &mut vertices, &mut vertex_table, &t, &c, v(1), v(2), 1, false).unwrap();
    assert!(warning.is_none());
    let e = find_edge_between(&pool, v(1), v(2)).unwrap();
    assert!(pool.is_constrained(e));
  }

  #[test]
  fn retracing_with_a_different_index_reports_duplicate() {
    let (mut pool, mut vertices) = square_mesh();
    let mut vertex_table: Vec<Vertex> = vertices
      .iter()
      .map(|&(x, y)| {
        Vertex::Real(RealVertex {
          x,
          y,
          z: 0.0,
          index: 0,
          status: VertexStatus::empty(),
        })
      })
      .collect();
    let t = Thresholds::new(1.0).unwrap();
    let c = PredicateCounters::new();
    trace_and_constrain_segment(&mut pool, &mut vertices, &mut vertex_table, &t, &c, v(1), v(2), 1, false).unwrap();
    let warning =
      trace_and_constrain_segment(&mut pool, &mut vertices, &mut vertex_table, &t, &c, v(1), v(2), 2, false).unwrap();
    assert_eq!(warning, Some(ConstraintWarning::DuplicateSegment { a: v(1), b: v(2) }));
    let e = find_edge_between(&pool, v(1), v(2)).unwrap();
    assert_eq!(pool.constraint_line_index(e), 1);
  }
}
