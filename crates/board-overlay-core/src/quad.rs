use serde::{Deserialize, Serialize};

use crate::{GeometryError, Point, Vector, GEOMETRY_EPS};

/// Mean corner-angle deviation from 90° (degrees) above which a
/// reconstructed quad is rejected.
pub const MAX_ANGLE_DEVIATION_DEG: f64 = 20.0;

/// Four points in fixed canonical order: top-left, bottom-left,
/// bottom-right, top-right.
///
/// The order encodes adjacency; every downstream formula assumes it
/// together with a locally convex, non-self-intersecting shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderedQuad {
    corners: [Point; 4],
}

impl OrderedQuad {
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Exactly four points in canonical order, otherwise `None`.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let corners: [Point; 4] = points.try_into().ok()?;
        Some(Self::new(corners))
    }

    /// Order four marker centers detected as a top pair and a bottom
    /// pair. Each pair is sorted left to right, which is all the
    /// detection frontend guarantees about them.
    pub fn from_marker_pairs(top: [Point; 2], bottom: [Point; 2]) -> Self {
        let [mut t0, mut t1] = top;
        let [mut b0, mut b1] = bottom;
        if t0.x > t1.x {
            std::mem::swap(&mut t0, &mut t1);
        }
        if b0.x > b1.x {
            std::mem::swap(&mut b0, &mut b1);
        }
        Self::new([t0, b0, b1, t1])
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    pub fn top_left(&self) -> Point {
        self.corners[0]
    }

    pub fn bottom_left(&self) -> Point {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.corners[2]
    }

    pub fn top_right(&self) -> Point {
        self.corners[3]
    }

    /// Mean deviation of the four interior corner angles from 90°, in
    /// degrees. A zero-length edge makes an angle undefined and is
    /// reported as [`GeometryError::ZeroLengthEdge`].
    pub fn right_angle_score(&self) -> Result<f64, GeometryError> {
        let [tl, bl, br, tr] = self.corners;
        let angles = [
            angle_deg(tr - tl, bl - tl)?,
            angle_deg(tl - bl, br - bl)?,
            angle_deg(bl - br, tr - br)?,
            angle_deg(tl - tr, br - tr)?,
        ];
        Ok(angles.iter().map(|a| (90.0 - a).abs()).sum::<f64>() / angles.len() as f64)
    }

    /// Gate before the quad (or anything derived from it) is trusted
    /// for display. Degenerate corners fail the gate.
    pub fn is_well_formed(&self) -> bool {
        matches!(self.right_angle_score(), Ok(score) if score < MAX_ANGLE_DEVIATION_DEG)
    }
}

/// A quadrilateral sub-region: an assembly placement target on the
/// board or a single storage grid cell. Corner order as [`OrderedQuad`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadBox {
    pub corners: [Point; 4],
}

impl QuadBox {
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }
}

/// Angle between two vectors in degrees.
fn angle_deg(u: Vector, v: Vector) -> Result<f64, GeometryError> {
    let nu = u.norm();
    let nv = v.norm();
    if nu < GEOMETRY_EPS || nv < GEOMETRY_EPS {
        return Err(GeometryError::ZeroLengthEdge);
    }
    let cos = (u.dot(&v) / (nu * nv)).clamp(-1.0, 1.0);
    Ok(cos.acos().to_degrees())
}
