//! Mesh algorithms: bootstrap, point location, incremental insertion,
//! constraint tracing, and the perimeter/triangle read surface.

pub mod bootstrap;
pub mod constraints;
pub mod insertion;
pub mod perimeter;
pub mod walk;
