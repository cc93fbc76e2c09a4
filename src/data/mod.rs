//! Mesh storage: vertices, the quad-edge pool, and constraint bookkeeping.

pub mod constraint;
pub mod edge_pool;
pub mod quad_edge;
pub mod vertex;

pub use constraint::{ConstraintRecord, ConstraintWarning, LinearConstraint, PolygonConstraint};
pub use edge_pool::EdgePool;
pub use quad_edge::{EdgeIndex, EdgeRecord, NO_CONSTRAINT};
pub use vertex::{MergerGroup, RealVertex, Vertex, VertexIndex, VertexStatus, ZMergeRule};

/// Axis-aligned bounding box of the vertices currently in the mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub min_x: f64,
  pub min_y: f64,
  pub max_x: f64,
  pub max_y: f64,
}

impl Bounds {
  pub fn empty() -> Self {
    Bounds {
      min_x: f64::INFINITY,
      min_y: f64::INFINITY,
      max_x: f64::NEG_INFINITY,
      max_y: f64::NEG_INFINITY,
    }
  }

  pub fn include(&mut self, x: f64, y: f64) {
    self.min_x = self.min_x.min(x);
    self.min_y = self.min_y.min(y);
    self.max_x = self.max_x.max(x);
    self.max_y = self.max_y.max(y);
  }

  pub fn is_empty(&self) -> bool {
    self.min_x > self.max_x
  }
}

/// A concrete view of one real (non-ghost) triangle, named by its three
/// vertices in counterclockwise order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
  pub a: VertexIndex,
  pub b: VertexIndex,
  pub c: VertexIndex,
}

/// Breakdown of the triangle count across a mesh's faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriangleCount {
  pub valid: usize,
  pub ghost: usize,
  pub constrained: usize,
}
