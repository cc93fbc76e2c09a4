//! Vertex storage: real vertices, the ghost sentinel, and coincident-point
//! merger groups.

use bitflags::bitflags;

bitflags! {
  #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
  pub struct VertexStatus: u8 {
    const SYNTHETIC         = 0b0001;
    const CONSTRAINT_MEMBER = 0b0010;
    const WITHHELD          = 0b0100;
    const NULL              = 0b1000;
  }
}

/// Rule for resolving `z` when multiple inserted points coincide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZMergeRule {
  Min,
  Mean,
  Max,
}

impl Default for ZMergeRule {
  fn default() -> Self {
    ZMergeRule::Mean
  }
}

/// A single real, user-supplied point.
#[derive(Clone, Debug)]
pub struct RealVertex {
  pub x: f64,
  pub y: f64,
  pub z: f64,
  pub index: i32,
  pub status: VertexStatus,
}

/// Multiple real vertices that coincide within `vertex_tolerance`.
#[derive(Clone, Debug)]
pub struct MergerGroup {
  pub x: f64,
  pub y: f64,
  pub members: Vec<RealVertex>,
  pub rule: ZMergeRule,
}

impl MergerGroup {
  fn z(&self) -> f64 {
    match self.rule {
      ZMergeRule::Min => self
        .members
        .iter()
        .map(|m| m.z)
        .fold(f64::INFINITY, f64::min),
      ZMergeRule::Max => self
        .members
        .iter()
        .map(|m| m.z)
        .fold(f64::NEG_INFINITY, f64::max),
      ZMergeRule::Mean => {
        self.members.iter().map(|m| m.z).sum::<f64>() / self.members.len() as f64
      }
    }
  }
}

/// A vertex slot in the [`crate::Tin`]'s vertex table: a real point, a
/// merger group of coincident real points, or the ghost sentinel that
/// closes the mesh at infinity.
#[derive(Clone, Debug)]
pub enum Vertex {
  Real(RealVertex),
  Group(MergerGroup),
  Ghost,
}

impl Vertex {
  pub fn xy(&self) -> (f64, f64) {
    match self {
      Vertex::Real(v) => (v.x, v.y),
      Vertex::Group(g) => (g.x, g.y),
      Vertex::Ghost => (f64::NAN, f64::NAN),
    }
  }

  pub fn z(&self) -> f64 {
    match self {
      Vertex::Real(v) => v.z,
      Vertex::Group(g) => g.z(),
      Vertex::Ghost => f64::NAN,
    }
  }

  pub fn is_ghost(&self) -> bool {
    matches!(self, Vertex::Ghost)
  }

  pub fn status(&self) -> VertexStatus {
    match self {
      Vertex::Real(v) => v.status,
      Vertex::Group(g) => g
        .members
        .iter()
        .fold(VertexStatus::empty(), |acc, m| acc | m.status),
      Vertex::Ghost => VertexStatus::NULL,
    }
  }

  /// Upgrade a `Real` slot in place to a `Group` containing both the
  /// original vertex and the newly-coincident one.
  pub fn merge_in(&mut self, incoming: RealVertex, rule: ZMergeRule) {
    let (x, y) = self.xy();
    match self {
      Vertex::Real(existing) => {
        let existing = existing.clone();
        *self = Vertex::Group(MergerGroup {
          x,
          y,
          members: vec![existing, incoming],
          rule,
        });
      }
      Vertex::Group(g) => {
        g.members.push(incoming);
      }
      Vertex::Ghost => unreachable!("the ghost vertex is never a merge target"),
    }
  }
}

/// Stable index into the [`crate::Tin`]'s vertex table. Index `0` is
/// reserved for the ghost vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VertexIndex(pub u32);

impl VertexIndex {
  pub const GHOST: VertexIndex = VertexIndex(0);
}

impl From<u32> for VertexIndex {
  fn from(v: u32) -> Self {
    VertexIndex(v)
  }
}

impl From<VertexIndex> for u32 {
  fn from(v: VertexIndex) -> Self {
    v.0
  }
}

impl std::ops::Index<VertexIndex> for Vec<Vertex> {
  type Output = Vertex;
  fn index(&self, index: VertexIndex) -> &Vertex {
    &self[index.0 as usize]
  }
}

impl std::ops::IndexMut<VertexIndex> for Vec<Vertex> {
  fn index_mut(&mut self, index: VertexIndex) -> &mut Vertex {
    &mut self[index.0 as usize]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn merge_upgrades_real_to_group() {
    let mut v = Vertex::Real(RealVertex {
      x: 1.0,
      y: 2.0,
      z: 3.0,
      index: 0,
      status: VertexStatus::empty(),
    });
    v.merge_in(
      RealVertex {
        x: 1.0,
        y: 2.0,
        z: 9.0,
        index: 1,
        status: VertexStatus::empty(),
      },
      ZMergeRule::Mean,
    );
    assert!(matches!(v, Vertex::Group(_)));
    assert_eq!(v.z(), 6.0);
    assert_eq!(v.xy(), (1.0, 2.0));
  }

  #[test]
  fn ghost_vertex_has_nan_coordinates() {
    let g = Vertex::Ghost;
    let (x, y) = g.xy();
    assert!(x.is_nan() && y.is_nan());
    assert!(g.is_ghost());
  }
}
