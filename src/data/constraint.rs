//! User-facing constraint descriptions and the bookkeeping that tracks how
//! each one was installed into the mesh.

use super::vertex::VertexIndex;

/// A polyline of `(x, y, z)` points to be laid into the mesh as constrained
/// segments. Every vertex is inserted (possibly merging into an existing
/// coincident vertex) before any segment is traced, so a constraint's own
/// endpoints need not already be part of the `Tin`.
#[derive(Clone, Debug)]
pub struct LinearConstraint<A = ()> {
  pub vertices: Vec<(f64, f64, f64)>,
  pub application_data: A,
}

impl<A> LinearConstraint<A> {
  pub fn new(vertices: Vec<(f64, f64, f64)>, application_data: A) -> Self {
    LinearConstraint { vertices, application_data }
  }
}

/// A closed ring of constrained edges bounding a region, optionally marked
/// as a hole to be excluded rather than included.
#[derive(Clone, Debug)]
pub struct PolygonConstraint<A = ()> {
  pub vertices: Vec<(f64, f64, f64)>,
  pub defines_region: bool,
  pub is_hole: bool,
  pub application_data: A,
}

impl<A> PolygonConstraint<A> {
  pub fn new(vertices: Vec<(f64, f64, f64)>, is_hole: bool, application_data: A) -> Self {
    PolygonConstraint {
      vertices,
      defines_region: true,
      is_hole,
      application_data,
    }
  }

  pub fn line_only(vertices: Vec<(f64, f64, f64)>, application_data: A) -> Self {
    PolygonConstraint {
      vertices,
      defines_region: false,
      is_hole: false,
      application_data,
    }
  }
}

/// Bookkeeping for a constraint once installed, so that border/interior
/// index assignments in the mesh can be traced back to it.
#[derive(Clone, Debug)]
pub struct ConstraintRecord {
  pub line_index: i32,
  pub is_region: bool,
  pub is_hole: bool,
}

/// A non-fatal issue encountered while installing constraints. Collected
/// and returned to the caller rather than logged, since this crate carries
/// no logging dependency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstraintWarning {
  /// The same segment (in either direction) was already constrained under
  /// a different line index; the existing constraint was left in place.
  DuplicateSegment { a: VertexIndex, b: VertexIndex },
  /// A segment whose endpoints coincided (within vertex tolerance) after
  /// merging was skipped rather than inserted.
  DegenerateSegment { a: VertexIndex, b: VertexIndex },
}
