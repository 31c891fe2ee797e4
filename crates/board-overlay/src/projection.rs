//! Corner reconstruction from detected reference markers.

use board_overlay_core::{blend, OrderedQuad, VectorFactor};

/// Rebuild the true corner quadrilateral of the observed object from
/// the four detected marker centers.
///
/// Each target corner is blended from its own two adjacent detected
/// points (0 from {1, 3}, 1 from {0, 2}, 2 from {3, 1}, 3 from
/// {2, 0}), which keeps the affine approximation local to that
/// corner's neighborhood and partially compensates for perspective
/// distortion without a homography solve. Corner ordering is
/// preserved.
pub fn reconstruct_corners(detected: &OrderedQuad, factors: &[VectorFactor; 4]) -> OrderedQuad {
    let [tl, bl, br, tr] = *detected.corners();
    OrderedQuad::new([
        blend(tl, bl, tr, factors[0]),
        blend(bl, tl, br, factors[1]),
        blend(br, tr, bl, factors[2]),
        blend(tr, br, tl, factors[3]),
    ])
}
