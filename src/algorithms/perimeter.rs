//! Public read surface: perimeter walk, triangle iteration, and the
//! refinement-facing edge split.

use crate::data::{Bounds, EdgeIndex, EdgePool, Triangle, Vertex, VertexIndex, VertexStatus};
use crate::Error;

const MAX_PERIMETER_STEPS: u32 = 100_000;

/// Walk the convex (or constrained) hull starting from any ghost edge,
/// returning the ordered cycle of real perimeter edges.
pub fn get_perimeter(pool: &EdgePool) -> Result<Vec<EdgeIndex>, Error> {
  let ghost_edge = match pool.get_starting_ghost_edge() {
    Some(e) => e,
    None => return Ok(Vec::new()),
  };

  let mut cur = ghost_edge;
  let mut found = None;
  for _ in 0..3 {
    if !pool.is_ghost_edge(cur) {
      found = Some(cur);
      break;
    }
    cur = pool.forward(cur);
  }
  let first_real = found.ok_or(Error::InvariantViolated)?;
  let start = if pool.is_perimeter_edge(first_real) {
    first_real
  } else {
    first_real.dual()
  };

  let mut result = Vec::new();
  let mut e = start;
  let mut steps = 0u32;
  loop {
    steps += 1;
    if steps > MAX_PERIMETER_STEPS {
      return Err(Error::IterationLimitExceeded);
    }
    result.push(e);

    let mut spoke = pool.dual(e);
    loop {
      spoke = pool.rotate_ccw(spoke);
      if pool.is_ghost_vertex(pool.destination(spoke)) {
        break;
      }
    }
    e = pool.rotate_ccw(spoke);
    if e == start {
      return Ok(result);
    }
  }
}

/// Lazily enumerate every real (non-ghost) triangle as a visited-bitset
/// walk over base edges.
pub fn get_triangles(pool: &EdgePool) -> Vec<Triangle> {
  let max = pool.max_edge_index();
  let mut visited = vec![false; max as usize + 2];
  let mut out = Vec::new();

  for e in pool.iter_base_edges_skip_ghosts() {
    if visited[e.0 as usize] {
      continue;
    }
    let f1 = pool.forward(e);
    let f2 = pool.forward(f1);
    if pool.forward(f2) != e {
      continue;
    }
    let a = pool.origin(e);
    let b = pool.origin(f1);
    let c = pool.origin(f2);
    if pool.is_ghost_vertex(a) || pool.is_ghost_vertex(b) || pool.is_ghost_vertex(c) {
      continue;
    }
    visited[e.0 as usize] = true;
    visited[f1.0 as usize] = true;
    visited[f2.0 as usize] = true;
    out.push(Triangle { a, b, c });
  }
  out
}

pub fn get_bounds(vertices: &[Vertex]) -> Bounds {
  let mut b = Bounds::empty();
  for v in vertices {
    if v.is_ghost() {
      continue;
    }
    let (x, y) = v.xy();
    b.include(x, y);
  }
  b
}

/// Split edge `e` at parameter `t` (clamped away from the endpoints),
/// interpolating `z`, and return the new vertex's index. The new vertex
/// inherits `ConstraintMember` status if `e` is constrained.
pub fn split_edge_at_parameter(
  pool: &mut EdgePool,
  vertices: &mut Vec<(f64, f64)>,
  vertex_table: &mut Vec<Vertex>,
  e: EdgeIndex,
  t: f64,
  z: f64,
) -> Result<VertexIndex, Error> {
  const EPS: f64 = 1e-9;
  let t = t.clamp(EPS, 1.0 - EPS);
  let a = vertices[pool.origin(e).0 as usize];
  let b = vertices[pool.destination(e).0 as usize];
  let x = a.0 + t * (b.0 - a.0);
  let y = a.1 + t * (b.1 - a.1);

  let mut status = VertexStatus::SYNTHETIC;
  if pool.is_constrained(e) {
    status |= VertexStatus::CONSTRAINT_MEMBER;
  }

  let m_idx = VertexIndex(vertex_table.len() as u32);
  vertex_table.push(Vertex::Real(crate::data::RealVertex {
    x,
    y,
    z,
    index: -1,
    status,
  }));
  vertices.push((x, y));
  pool.split_edge(e, m_idx)?;
  Ok(m_idx)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::VertexIndex;

  fn v(i: u32) -> VertexIndex {
    VertexIndex(i)
  }

  fn bootstrap_mesh() -> EdgePool {
    let ghost = v(0);
    let (v0, v1, v2) = (v(1), v(2), v(3));
    let mut pool = EdgePool::new(ghost);
    let e01 = pool.allocate_edge(v0, v1).unwrap();
    let e12 = pool.allocate_edge(v1, v2).unwrap();
    let e20 = pool.allocate_edge(v2, v0).unwrap();
    pool.link(e01, e12);
    pool.link(e12, e20);
    pool.link(e20, e01);

    let gv0 = pool.allocate_edge(ghost, v0).unwrap();
    let gv1 = pool.allocate_edge(ghost, v1).unwrap();
    let gv2 = pool.allocate_edge(ghost, v2).unwrap();

    pool.link(e01.dual(), gv0.dual());
    pool.link(gv0.dual(), gv1);
    pool.link(gv1, e01.dual());

    pool.link(e12.dual(), gv1.dual());
    pool.link(gv1.dual(), gv2);
    pool.link(gv2, e12.dual());

    pool.link(e20.dual(), gv2.dual());
    pool.link(gv2.dual(), gv0);
    pool.link(gv0, e20.dual());
    pool
  }

  #[test]
  fn perimeter_of_single_triangle_has_three_edges() {
    let pool = bootstrap_mesh();
    let perimeter = get_perimeter(&pool).unwrap();
    assert_eq!(perimeter.len(), 3);
    for e in &perimeter {
      assert!(pool.is_perimeter_edge(*e));
    }
  }

  #[test]
  fn single_triangle_mesh_yields_one_triangle() {
    let pool = bootstrap_mesh();
    let triangles = get_triangles(&pool);
    assert_eq!(triangles.len(), 1);
  }
}
