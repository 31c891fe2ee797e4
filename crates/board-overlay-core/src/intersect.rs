use crate::{GeometryError, Point, GEOMETRY_EPS};

/// Intersection of the infinite line through `p`, `q` with the
/// infinite line through `r`, `s`.
///
/// Parallel (or coincident) lines return
/// [`GeometryError::ParallelLines`] instead of letting the division
/// produce a non-finite point.
pub fn intersect(p: Point, q: Point, r: Point, s: Point) -> Result<Point, GeometryError> {
    let x = r - p;
    let d1 = q - p;
    let d2 = s - r;

    let denom = d1.perp(&d2);
    if denom.abs() < GEOMETRY_EPS {
        return Err(GeometryError::ParallelLines);
    }

    let t1 = x.perp(&d2) / denom;
    Ok(p + d1 * t1)
}
