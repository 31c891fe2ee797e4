use serde::{Deserialize, Serialize};

use crate::{GeometryError, GEOMETRY_EPS};

/// Dimensionless blend coefficients along two edge vectors of a
/// reference quad. `beta` scales the first edge, `alpha` the second;
/// derived once per calibration from physical distance ratios and
/// reused every frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorFactor {
    pub alpha: f64,
    pub beta: f64,
}

impl VectorFactor {
    pub const ZERO: Self = Self {
        alpha: 0.0,
        beta: 0.0,
    };

    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Flip both coefficients. Used for reference markers that sit on
    /// the far side of the corner they anchor.
    pub fn inverted(self) -> Self {
        Self {
            alpha: -self.alpha,
            beta: -self.beta,
        }
    }
}

/// Convert the four physical reference-to-corner distance vectors into
/// blend factors relative to the reference span: one `(dx / ref_width,
/// dy / ref_height)` pair per corner.
pub fn corner_factors(
    ref_width: f64,
    ref_height: f64,
    distances: &[[f64; 2]; 4],
) -> Result<[VectorFactor; 4], GeometryError> {
    if ref_width.abs() < GEOMETRY_EPS || ref_height.abs() < GEOMETRY_EPS {
        return Err(GeometryError::ZeroReferenceSpan);
    }
    Ok(distances.map(|[dx, dy]| VectorFactor::new(dx / ref_width, dy / ref_height)))
}

/// Uniform per-cell stepping factors for the storage grid.
///
/// Each step covers one box plus half the inter-box offset, expressed
/// relative to the reference corner span, so the grid builder can walk
/// an edge without re-deriving geometry per step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridStepFactors {
    x_factor: f64,
    y_factor: f64,
}

impl GridStepFactors {
    pub fn new(
        box_width: f64,
        box_height: f64,
        offset_x: f64,
        offset_y: f64,
        ref_width: f64,
        ref_height: f64,
    ) -> Result<Self, GeometryError> {
        if ref_width.abs() < GEOMETRY_EPS || ref_height.abs() < GEOMETRY_EPS {
            return Err(GeometryError::ZeroReferenceSpan);
        }
        Ok(Self {
            x_factor: (box_width + offset_x / 2.0) / ref_width,
            y_factor: (box_height + offset_y / 2.0) / ref_height,
        })
    }

    /// Factor pair for the grid node `col` steps along the column axis
    /// and `row` steps along the row axis from the stepping corner.
    pub fn at(&self, col: usize, row: usize) -> VectorFactor {
        VectorFactor::new(col as f64 * self.x_factor, row as f64 * self.y_factor)
    }
}
