//! Geometry core for marker-anchored overlay projection.
//!
//! This crate is intentionally small and purely 2D. It knows nothing
//! about cameras, images or rendering: only points, the bilinear blend
//! primitive, line intersection, vector factors and quad validation.
//! Everything operates on a single fixed scalar type (`f64`).

mod blend;
mod error;
mod factor;
mod intersect;
mod logger;
mod quad;

pub use blend::{blend, blend_edges};
pub use error::GeometryError;
pub use factor::{corner_factors, GridStepFactors, VectorFactor};
pub use intersect::intersect;
pub use logger::init_with_level;
pub use quad::{OrderedQuad, QuadBox, MAX_ANGLE_DEVIATION_DEG};

/// Pixel-space point.
pub type Point = nalgebra::Point2<f64>;
/// Pixel-space displacement.
pub type Vector = nalgebra::Vector2<f64>;

/// Threshold below which spans, norms and cross products count as zero.
pub(crate) const GEOMETRY_EPS: f64 = 1e-12;
