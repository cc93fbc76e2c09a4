//! The quad-edge record: a pair of half-edges (even "base" + odd "dual"
//! index) carrying `forward`/`reverse` links and per-side constraint bits.

use super::vertex::VertexIndex;

/// Stable index of a half-edge. `base_index` is even; `dual_index =
/// base_index | 1`. Freed edges may have their slot reused, so callers must
/// not retain an `EdgeIndex` across a call that could free it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EdgeIndex(pub u32);

impl EdgeIndex {
  #[inline]
  pub fn is_base(self) -> bool {
    self.0 % 2 == 0
  }

  #[inline]
  pub fn base(self) -> EdgeIndex {
    EdgeIndex(self.0 & !1)
  }

  /// The other half of this quad-edge pair. An involution: `dual(dual(e))
  /// == e`.
  #[inline]
  pub fn dual(self) -> EdgeIndex {
    EdgeIndex(self.0 ^ 1)
  }
}

impl From<u32> for EdgeIndex {
  fn from(v: u32) -> Self {
    EdgeIndex(v)
  }
}

impl From<EdgeIndex> for u32 {
  fn from(v: EdgeIndex) -> Self {
    v.0
  }
}

pub const NO_CONSTRAINT: i32 = -1;

/// One half-edge's storage slot.
#[derive(Clone, Copy, Debug)]
pub struct EdgeRecord {
  pub origin: VertexIndex,
  pub forward: EdgeIndex,
  pub reverse: EdgeIndex,
  pub constraint_line_index: i32,
  pub border_index: i32,
  pub interior_index: i32,
}

impl EdgeRecord {
  pub fn unattached(self_index: EdgeIndex, origin: VertexIndex) -> Self {
    EdgeRecord {
      origin,
      forward: self_index,
      reverse: self_index,
      constraint_line_index: NO_CONSTRAINT,
      border_index: NO_CONSTRAINT,
      interior_index: NO_CONSTRAINT,
    }
  }

  pub fn is_constrained(&self) -> bool {
    self.constraint_line_index != NO_CONSTRAINT || self.border_index != NO_CONSTRAINT
  }

  pub fn is_constraint_region_border(&self) -> bool {
    self.border_index != NO_CONSTRAINT
  }

  pub fn is_constraint_region_interior(&self) -> bool {
    self.interior_index != NO_CONSTRAINT
  }

  pub fn is_constraint_region_member(&self) -> bool {
    self.border_index != NO_CONSTRAINT || self.interior_index != NO_CONSTRAINT
  }

  pub fn is_constraint_line_member(&self) -> bool {
    self.constraint_line_index != NO_CONSTRAINT
  }

  pub fn clear_constraints(&mut self) {
    self.constraint_line_index = NO_CONSTRAINT;
    self.border_index = NO_CONSTRAINT;
    self.interior_index = NO_CONSTRAINT;
  }
}

impl Default for EdgeRecord {
  fn default() -> Self {
    EdgeRecord {
      origin: VertexIndex(0),
      forward: EdgeIndex(0),
      reverse: EdgeIndex(0),
      constraint_line_index: NO_CONSTRAINT,
      border_index: NO_CONSTRAINT,
      interior_index: NO_CONSTRAINT,
    }
  }
}
