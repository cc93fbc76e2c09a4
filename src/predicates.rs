//! Robust geometric predicates: double precision first, with adaptive
//! fallback to [`DoubleDouble`] when the result is too close to zero to
//! trust.
//!
//! Every predicate here takes raw `(f64, f64)` coordinate pairs rather than
//! [`crate::data::Vertex`] references, so they can be reused from insertion,
//! the walk, and constraint tracing without borrowing the vertex table.

use crate::numeric::{DoubleDouble, Thresholds};
use std::cell::Cell;

pub type Point = (f64, f64);

/// Call counts for the adaptive predicates, split out by how often the
/// double-precision fast path had to escalate to extended precision. Not a
/// logging facility — just data a caller can inspect.
#[derive(Debug, Default, Clone)]
pub struct PredicateCounters {
  calls: Cell<u64>,
  escalations: Cell<u64>,
}

impl PredicateCounters {
  pub fn new() -> Self {
    PredicateCounters::default()
  }

  #[inline]
  fn record_call(&self) {
    self.calls.set(self.calls.get() + 1);
  }

  #[inline]
  fn record_escalation(&self) {
    self.escalations.set(self.escalations.get() + 1);
  }

  pub fn calls(&self) -> u64 {
    self.calls.get()
  }

  pub fn escalations(&self) -> u64 {
    self.escalations.get()
  }

  pub fn reset(&self) {
    self.calls.set(0);
    self.escalations.set(0);
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
  CounterClockwise,
  Clockwise,
  Collinear,
}

fn dd_from(x: f64) -> DoubleDouble {
  DoubleDouble::from_f64(x)
}

fn dd_sub(a: f64, b: f64) -> DoubleDouble {
  // Plain subtraction is exact whenever there's no catastrophic
  // cancellation across wildly different magnitudes, which is the only
  // case this fallback path exists for; two_sum guards the general case.
  let (s, e) = crate::numeric::two_sum(a, -b);
  DoubleDouble::new(s, e)
}

/// `(c - a) x (b - a)`, the twice-signed-area cross product.
fn half_plane_dd(a: Point, b: Point, c: Point) -> DoubleDouble {
  let cax = dd_sub(c.0, a.0);
  let cay = dd_sub(c.1, a.1);
  let bax = dd_sub(b.0, a.0);
  let bay = dd_sub(b.1, a.1);
  cax * bay - cay * bax
}

/// Cross product `(c-a) x (b-a)`. Positive when `a, b, c` turn clockwise
/// (i.e. `c` is to the right of directed line `a -> b`), matching the
/// orientation test used throughout the mesh.
pub fn half_plane(a: Point, b: Point, c: Point, t: &Thresholds, counters: &PredicateCounters) -> f64 {
  counters.record_call();
  let h = (c.0 - a.0) * (b.1 - a.1) - (c.1 - a.1) * (b.0 - a.0);
  if h.abs() < t.half_plane_threshold {
    counters.record_escalation();
    half_plane_dd(a, b, c).to_f64()
  } else {
    h
  }
}

/// Sign test over [`half_plane`]: `+1` ccw, `-1` cw, `0` collinear.
pub fn orientation(a: Point, b: Point, c: Point, t: &Thresholds, counters: &PredicateCounters) -> Orientation {
  let h = half_plane(a, b, c, t, counters);
  if h > 0.0 {
    Orientation::Clockwise
  } else if h < 0.0 {
    Orientation::CounterClockwise
  } else {
    Orientation::Collinear
  }
}

/// Signed area of triangle `(a, b, c)`, escalating to extended precision
/// under the (coarser) `in_circle_threshold`, matching the reference
/// algorithm's use of area as an input to circumcircle computation.
pub fn area(a: Point, b: Point, c: Point, t: &Thresholds, counters: &PredicateCounters) -> f64 {
  counters.record_call();
  let h = (c.0 - a.0) * (b.1 - a.1) - (c.1 - a.1) * (b.0 - a.0);
  if h.abs() < t.in_circle_threshold {
    counters.record_escalation();
    (half_plane_dd(a, b, c).to_f64()) * -0.5
  } else {
    h * -0.5
  }
}

fn in_circle_det(a: Point, b: Point, c: Point, d: Point) -> f64 {
  let (ax, ay) = (a.0 - d.0, a.1 - d.1);
  let (bx, by) = (b.0 - d.0, b.1 - d.1);
  let (cx, cy) = (c.0 - d.0, c.1 - d.1);
  let a2 = ax * ax + ay * ay;
  let b2 = bx * bx + by * by;
  let c2 = cx * cx + cy * cy;
  ax * (by * c2 - b2 * cy) - ay * (bx * c2 - b2 * cx) + a2 * (bx * cy - by * cx)
}

fn in_circle_det_dd(a: Point, b: Point, c: Point, d: Point) -> DoubleDouble {
  let ax = dd_sub(a.0, d.0);
  let ay = dd_sub(a.1, d.1);
  let bx = dd_sub(b.0, d.0);
  let by = dd_sub(b.1, d.1);
  let cx = dd_sub(c.0, d.0);
  let cy = dd_sub(c.1, d.1);
  let a2 = ax * ax + ay * ay;
  let b2 = bx * bx + by * by;
  let c2 = cx * cx + cy * cy;
  ax * (by * c2 - b2 * cy) - ay * (bx * c2 - b2 * cx) + a2 * (bx * cy - by * cx)
}

/// Shewchuk's in-circle determinant. Positive iff `d` is strictly inside
/// the circumcircle of the ccw-oriented triangle `(a, b, c)`.
pub fn in_circle(
  a: Point,
  b: Point,
  c: Point,
  d: Point,
  t: &Thresholds,
  counters: &PredicateCounters,
) -> f64 {
  counters.record_call();
  let det = in_circle_det(a, b, c, d);
  if det.abs() < t.in_circle_threshold {
    counters.record_escalation();
    in_circle_det_dd(a, b, c, d).to_f64()
  } else {
    det
  }
}

#[derive(Clone, Copy, Debug)]
pub struct Circumcircle {
  pub center: Point,
  pub radius_sq: f64,
}

impl Circumcircle {
  pub fn is_degenerate(&self) -> bool {
    !self.radius_sq.is_finite()
  }
}

/// Solve for the circumcircle of `(a, b, c)`. Returns a center of
/// `(+inf, +inf)` and `radius_sq = +inf` for genuinely degenerate
/// (collinear) input.
pub fn circumcircle(a: Point, b: Point, c: Point, t: &Thresholds, counters: &PredicateCounters) -> Circumcircle {
  counters.record_call();
  let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
  let (d, escalated) = if d.abs() < t.circumcircle_determinant_threshold {
    counters.record_escalation();
    let dd = dd_from(a.0) * (dd_from(b.1) - dd_from(c.1))
      + dd_from(b.0) * (dd_from(c.1) - dd_from(a.1))
      + dd_from(c.0) * (dd_from(a.1) - dd_from(b.1));
    ((dd + dd).to_f64(), true)
  } else {
    (d, false)
  };
  if d.abs() < t.precision_threshold && escalated {
    return Circumcircle {
      center: (f64::INFINITY, f64::INFINITY),
      radius_sq: f64::INFINITY,
    };
  }
  let a2 = a.0 * a.0 + a.1 * a.1;
  let b2 = b.0 * b.0 + b.1 * b.1;
  let c2 = c.0 * c.0 + c.1 * c.1;
  let ux = (a2 * (b.1 - c.1) + b2 * (c.1 - a.1) + c2 * (a.1 - b.1)) / d;
  let uy = (a2 * (c.0 - b.0) + b2 * (a.0 - c.0) + c2 * (b.0 - a.0)) / d;
  let radius_sq = (a.0 - ux).powi(2) + (a.1 - uy).powi(2);
  Circumcircle {
    center: (ux, uy),
    radius_sq,
  }
}
