//! Numeric primitives: extended-precision arithmetic and derived tolerances.

mod double_double;
mod thresholds;

pub use double_double::{fast_two_sum, two_product, two_sum, DoubleDouble};
pub use thresholds::Thresholds;
