use crate::Error;

/// Precision thresholds derived from a single nominal point spacing.
///
/// All downstream predicate and tolerance decisions go through these
/// values, so that the whole library scales consistently with the density
/// of the input point set instead of hard-coding an absolute epsilon.
#[derive(Clone, Copy, Debug)]
pub struct Thresholds {
  nominal_point_spacing: f64,
  pub precision_threshold: f64,
  pub half_plane_threshold: f64,
  pub in_circle_threshold: f64,
  pub delaunay_threshold: f64,
  pub circumcircle_determinant_threshold: f64,
  pub vertex_tolerance: f64,
  pub vertex_tolerance_sq: f64,
}

impl Thresholds {
  pub fn new(nominal_point_spacing: f64) -> Result<Self, Error> {
    if !(nominal_point_spacing.is_finite()) || nominal_point_spacing <= 0.0 {
      return Err(Error::InsufficientInput);
    }
    let ulp_s = nominal_point_spacing.abs() * f64::EPSILON;
    let precision_threshold = 256.0 * ulp_s;
    let half_plane_threshold = 256.0 * precision_threshold;
    let in_circle_threshold = 2f64.powi(20) * precision_threshold;
    let delaunay_threshold = 256.0 * precision_threshold;
    let circumcircle_determinant_threshold = 32.0 * in_circle_threshold;
    let vertex_tolerance = nominal_point_spacing / 1.0e5;
    let vertex_tolerance_sq = vertex_tolerance * vertex_tolerance;
    Ok(Thresholds {
      nominal_point_spacing,
      precision_threshold,
      half_plane_threshold,
      in_circle_threshold,
      delaunay_threshold,
      circumcircle_determinant_threshold,
      vertex_tolerance,
      vertex_tolerance_sq,
    })
  }

  pub fn nominal_point_spacing(&self) -> f64 {
    self.nominal_point_spacing
  }
}
