//! Paged arena of quad-edge records with free-list recycling.
//!
//! Pages are allocated lazily, `PAGE_PAIRS` quad-edges (`2 * PAGE_PAIRS`
//! half-edge records) at a time. Freed pairs go on a free list and are
//! handed back out before a new page is grown, so stable `EdgeIndex`
//! values survive churn without the arena growing unboundedly.

use super::quad_edge::{EdgeIndex, EdgeRecord};
use super::vertex::VertexIndex;
use crate::Error;

const PAGE_PAIRS: usize = 1024;
const PAGE_RECORDS: usize = PAGE_PAIRS * 2;

/// Sentinel origin used by [`EdgePool::allocate_undefined_edge`] before the
/// caller patches in real endpoints.
pub const UNSET_VERTEX: VertexIndex = VertexIndex(u32::MAX);

#[derive(Clone)]
pub struct EdgePool {
  pages: Vec<Box<[EdgeRecord]>>,
  allocated: Vec<bool>,
  free: Vec<EdgeIndex>,
  next_fresh: u32,
  ghost: VertexIndex,
  disposed: bool,
}

impl EdgePool {
  pub fn new(ghost: VertexIndex) -> Self {
    EdgePool {
      pages: Vec::new(),
      allocated: Vec::new(),
      free: Vec::new(),
      next_fresh: 0,
      ghost,
      disposed: false,
    }
  }

  /// Pre-reserve roughly `3n` edges across pages, per the expected edge
  /// count of an `n`-vertex triangulation.
  pub fn reserve_hint(&mut self, n: usize) {
    self.grow_to(n.saturating_mul(3).saturating_mul(2));
  }

  fn grow_to(&mut self, min_records: usize) {
    while self.pages.len() * PAGE_RECORDS < min_records {
      self.pages.push(vec![EdgeRecord::default(); PAGE_RECORDS].into_boxed_slice());
      self.allocated.extend(std::iter::repeat(false).take(PAGE_RECORDS));
    }
  }

  #[inline]
  fn record(&self, e: EdgeIndex) -> &EdgeRecord {
    let i = e.0 as usize;
    &self.pages[i / PAGE_RECORDS][i % PAGE_RECORDS]
  }

  #[inline]
  fn record_mut(&mut self, e: EdgeIndex) -> &mut EdgeRecord {
    let i = e.0 as usize;
    &mut self.pages[i / PAGE_RECORDS][i % PAGE_RECORDS]
  }

  fn check_disposed(&self) -> Result<(), Error> {
    if self.disposed {
      Err(Error::PoolDisposed)
    } else {
      Ok(())
    }
  }

  pub fn dispose(&mut self) {
    self.disposed = true;
  }

  pub fn is_disposed(&self) -> bool {
    self.disposed
  }

  // -- allocation ---------------------------------------------------------

  fn fresh_base(&mut self) -> EdgeIndex {
    if let Some(recycled) = self.free.pop() {
      return recycled;
    }
    let base = EdgeIndex(self.next_fresh);
    self.next_fresh += 2;
    self.grow_to(self.next_fresh as usize);
    base
  }

  pub fn allocate_edge(&mut self, a: VertexIndex, b: VertexIndex) -> Result<EdgeIndex, Error> {
    self.check_disposed()?;
    let base = self.fresh_base();
    let dual = base.dual();
    self.allocated[base.0 as usize] = true;
    self.allocated[dual.0 as usize] = true;
    *self.record_mut(base) = EdgeRecord::unattached(base, a);
    *self.record_mut(dual) = EdgeRecord::unattached(dual, b);
    Ok(base)
  }

  pub fn allocate_undefined_edge(&mut self) -> Result<EdgeIndex, Error> {
    self.allocate_edge(UNSET_VERTEX, UNSET_VERTEX)
  }

  pub fn deallocate(&mut self, e: EdgeIndex) -> Result<(), Error> {
    self.check_disposed()?;
    let base = e.base();
    let dual = base.dual();
    if !self.allocated[base.0 as usize] {
      return Err(Error::InvariantViolated);
    }
    self.allocated[base.0 as usize] = false;
    self.allocated[dual.0 as usize] = false;
    self.free.push(base);
    Ok(())
  }

  pub fn max_edge_index(&self) -> u32 {
    self.next_fresh
  }

  pub fn get_starting_edge(&self) -> Option<EdgeIndex> {
    (0..self.next_fresh)
      .step_by(2)
      .map(EdgeIndex)
      .find(|&e| self.allocated[e.0 as usize] && !self.is_ghost_edge(e))
  }

  pub fn get_starting_ghost_edge(&self) -> Option<EdgeIndex> {
    (0..self.next_fresh)
      .step_by(2)
      .map(EdgeIndex)
      .find(|&e| self.allocated[e.0 as usize] && self.is_ghost_edge(e))
  }

  /// All allocated base edges (one direction of each quad-edge pair).
  pub fn iter_base_edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
    (0..self.next_fresh)
      .step_by(2)
      .map(EdgeIndex)
      .filter(move |&e| self.allocated[e.0 as usize])
  }

  pub fn iter_base_edges_skip_ghosts(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
    self.iter_base_edges().filter(move |&e| !self.is_ghost_edge(e))
  }

  // -- navigation -----------------------------------------------------------

  #[inline]
  pub fn dual(&self, e: EdgeIndex) -> EdgeIndex {
    e.dual()
  }

  #[inline]
  pub fn forward(&self, e: EdgeIndex) -> EdgeIndex {
    self.record(e).forward
  }

  #[inline]
  pub fn reverse(&self, e: EdgeIndex) -> EdgeIndex {
    self.record(e).reverse
  }

  #[inline]
  pub fn origin(&self, e: EdgeIndex) -> VertexIndex {
    self.record(e).origin
  }

  /// The "other" endpoint of `e`, i.e. the origin of its twin.
  #[inline]
  pub fn destination(&self, e: EdgeIndex) -> VertexIndex {
    self.origin(e.dual())
  }

  /// Third vertex of the triangle to the left of `e`: `origin(reverse(e))`.
  #[inline]
  pub fn apex(&self, e: EdgeIndex) -> VertexIndex {
    self.origin(self.reverse(e))
  }

  /// Next half-edge counterclockwise around `origin(e)`: `dual(reverse(e))`.
  #[inline]
  pub fn rotate_ccw(&self, e: EdgeIndex) -> EdgeIndex {
    self.reverse(e).dual()
  }

  #[inline]
  pub fn is_ghost_vertex(&self, v: VertexIndex) -> bool {
    v == self.ghost
  }

  pub fn is_ghost_edge(&self, e: EdgeIndex) -> bool {
    self.is_ghost_vertex(self.origin(e)) || self.is_ghost_vertex(self.destination(e))
  }

  /// Whether `e` is a hull-boundary edge: the face across it (its right
  /// side, reached through `dual`) is the ghost triangle.
  pub fn is_perimeter_edge(&self, e: EdgeIndex) -> bool {
    !self.is_ghost_edge(e) && self.is_ghost_vertex(self.apex(e.dual()))
  }

  pub fn set_forward(&mut self, e: EdgeIndex, target: EdgeIndex) {
    self.record_mut(e).forward = target;
  }

  pub fn set_reverse(&mut self, e: EdgeIndex, target: EdgeIndex) {
    self.record_mut(e).reverse = target;
  }

  /// Splice `e`'s forward link to `target`, and `target`'s reverse link
  /// back to `e`, keeping the two invariants paired.
  pub fn link(&mut self, e: EdgeIndex, target: EdgeIndex) {
    self.set_forward(e, target);
    self.set_reverse(target, e);
  }

  pub fn set_origin(&mut self, e: EdgeIndex, v: VertexIndex) {
    self.record_mut(e).origin = v;
  }

  pub fn constraint_line_index(&self, e: EdgeIndex) -> i32 {
    self.record(e).constraint_line_index
  }

  pub fn border_index(&self, e: EdgeIndex) -> i32 {
    self.record(e).border_index
  }

  pub fn interior_index(&self, e: EdgeIndex) -> i32 {
    self.record(e).interior_index
  }

  pub fn set_constraint_line_index(&mut self, e: EdgeIndex, idx: i32) {
    self.record_mut(e).constraint_line_index = idx;
  }

  pub fn set_border_index(&mut self, e: EdgeIndex, idx: i32) {
    self.record_mut(e).border_index = idx;
  }

  pub fn set_interior_index(&mut self, e: EdgeIndex, idx: i32) {
    self.record_mut(e).interior_index = idx;
  }

  pub fn clear_constraints(&mut self, e: EdgeIndex) {
    self.record_mut(e).clear_constraints();
  }

  pub fn is_constrained(&self, e: EdgeIndex) -> bool {
    self.record(e).is_constrained() || self.record(e.dual()).is_constrained()
  }

  pub fn copy_constraints(&mut self, from: EdgeIndex, to: EdgeIndex) {
    let r = *self.record(from);
    let dst = self.record_mut(to);
    dst.constraint_line_index = r.constraint_line_index;
    dst.border_index = r.border_index;
    dst.interior_index = r.interior_index;
  }

  /// Splice vertex `m` into the middle of edge `a -> b` (`e`), turning the
  /// two triangles adjacent to `e` into four. Returns the edge `a -> m`
  /// (the original pair, repurposed in place). Constraint bits of `e` and
  /// its dual are inherited by the two halves; the two new diagonals to
  /// the adjacent apices are left unconstrained.
  pub fn split_edge(&mut self, e: EdgeIndex, m: VertexIndex) -> Result<EdgeIndex, Error> {
    self.check_disposed()?;
    let dual_e = e.dual();
    let a = self.origin(e);
    let b = self.origin(dual_e);

    let fwd_e = self.forward(e);
    let rev_e = self.reverse(e);
    let c = self.origin(rev_e);

    let fwd_dual = self.forward(dual_e);
    let rev_dual = self.reverse(dual_e);
    let d = self.origin(rev_dual);

    let e_flags = *self.record(e);
    let dual_flags = *self.record(dual_e);

    let mb = self.allocate_edge(m, b)?;
    let mc = self.allocate_edge(m, c)?;
    let md = self.allocate_edge(m, d)?;

    // mb inherits e's flags (same side as the original a->b), mb.dual
    // inherits dual_e's flags (same side as the original b->a).
    self.record_mut(mb).constraint_line_index = e_flags.constraint_line_index;
    self.record_mut(mb).border_index = e_flags.border_index;
    self.record_mut(mb).interior_index = e_flags.interior_index;
    let mb_dual = mb.dual();
    self.record_mut(mb_dual).constraint_line_index = dual_flags.constraint_line_index;
    self.record_mut(mb_dual).border_index = dual_flags.border_index;
    self.record_mut(mb_dual).interior_index = dual_flags.interior_index;

    // Repurpose (e, dual_e) in place to represent a -> m.
    self.set_origin(dual_e, m);

    // Triangle (a, m, c): e, mc, rev_e.
    self.link(e, mc);
    self.link(mc, rev_e);
    self.link(rev_e, e);

    // Triangle (m, b, c): mb, fwd_e, dual(mc).
    let mc_dual = mc.dual();
    self.link(mb, fwd_e);
    self.link(fwd_e, mc_dual);
    self.link(mc_dual, mb);

    // Triangle (b, m, d): dual(mb), md, rev_dual.
    self.link(mb_dual, md);
    self.link(md, rev_dual);
    self.link(rev_dual, mb_dual);

    // Triangle (m, a, d): dual_e, fwd_dual, dual(md).
    let md_dual = md.dual();
    self.link(dual_e, fwd_dual);
    self.link(fwd_dual, md_dual);
    self.link(md_dual, dual_e);

    Ok(e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn v(i: u32) -> VertexIndex {
    VertexIndex(i)
  }

  /// Build a minimal closed bootstrap mesh: real triangle (v0,v1,v2) ccw
  /// plus the three ghost triangles fanning out from `g`.
  fn bootstrap_mesh() -> (EdgePool, EdgeIndex, EdgeIndex, EdgeIndex) {
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

    // G01: v1 -> v0 -> g -> v1
    pool.link(e01.dual(), gv0.dual());
    pool.link(gv0.dual(), gv1);
    pool.link(gv1, e01.dual());

    // G12: v2 -> v1 -> g -> v2
    pool.link(e12.dual(), gv1.dual());
    pool.link(gv1.dual(), gv2);
    pool.link(gv2, e12.dual());

    // G20: v0 -> v2 -> g -> v0
    pool.link(e20.dual(), gv2.dual());
    pool.link(gv2.dual(), gv0);
    pool.link(gv0, e20.dual());

    (pool, e01, e12, e20)
  }

  #[test]
  fn link_reciprocity_holds() {
    let (pool, e01, e12, e20) = bootstrap_mesh();
    for e in [e01, e12, e20] {
      assert_eq!(pool.reverse(pool.forward(e)), e);
      assert_eq!(pool.forward(pool.reverse(e)), e);
      assert_eq!(pool.dual(pool.dual(e)), e);
    }
  }

  #[test]
  fn triangle_closure_holds() {
    let (pool, e01, _, _) = bootstrap_mesh();
    assert_eq!(pool.forward(pool.forward(pool.forward(e01))), e01);
  }

  #[test]
  fn hull_edges_are_perimeter_edges() {
    let (pool, e01, e12, e20) = bootstrap_mesh();
    for e in [e01, e12, e20] {
      assert!(pool.is_perimeter_edge(e));
    }
  }

  #[test]
  fn rotation_around_vertex_cycles_back() {
    let (pool, e01, _, _) = bootstrap_mesh();
    let r1 = pool.rotate_ccw(e01);
    let r2 = pool.rotate_ccw(r1);
    let r3 = pool.rotate_ccw(r2);
    assert_eq!(r3, e01);
    assert_eq!(pool.origin(r1), pool.origin(e01));
    assert_eq!(pool.origin(r2), pool.origin(e01));
  }

  #[test]
  fn deallocate_then_reallocate_recycles_index() {
    let mut pool = EdgePool::new(v(0));
    let e = pool.allocate_edge(v(1), v(2)).unwrap();
    pool.deallocate(e).unwrap();
    let e2 = pool.allocate_edge(v(3), v(4)).unwrap();
    assert_eq!(e, e2);
  }

  #[test]
  fn double_deallocate_is_an_error() {
    let mut pool = EdgePool::new(v(0));
    let e = pool.allocate_edge(v(1), v(2)).unwrap();
    pool.deallocate(e).unwrap();
    assert!(pool.deallocate(e).is_err());
  }

  #[test]
  fn disposed_pool_rejects_allocation() {
    let mut pool = EdgePool::new(v(0));
    pool.dispose();
    assert!(pool.allocate_edge(v(1), v(2)).is_err());
  }
}
