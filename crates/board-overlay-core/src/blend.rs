use crate::{Point, Vector, VectorFactor};

/// Blend a new point from two edge vectors anchored at `origin`:
///
/// `origin + beta * (a - origin) + alpha * (b - origin)`
///
/// This is the single arithmetic primitive behind corner
/// reconstruction, assembly placement and grid stepping. It performs
/// no perspective correction; within the span of the two edges the
/// physical-to-image mapping is taken as an affine blend. Total: with
/// both edges degenerate the result collapses to `origin`.
#[inline]
pub fn blend(origin: Point, a: Point, b: Point, f: VectorFactor) -> Point {
    blend_edges(origin, a - origin, b - origin, f)
}

/// Edge-vector form of [`blend`] for callers whose second edge is not
/// anchored at `origin` (assembly placement chains two board edges).
#[inline]
pub fn blend_edges(origin: Point, edge_a: Vector, edge_b: Vector, f: VectorFactor) -> Point {
    origin + edge_a * f.beta + edge_b * f.alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_point_eq(p: Point, q: Point) {
        assert_relative_eq!(p.x, q.x, epsilon = 1e-9);
        assert_relative_eq!(p.y, q.y, epsilon = 1e-9);
    }

    #[test]
    fn basis_factors_hit_the_defining_points() {
        let o = Point::new(2.0, 3.0);
        let a = Point::new(2.0, 10.0);
        let b = Point::new(9.0, 3.0);

        assert_point_eq(blend(o, a, b, VectorFactor::ZERO), o);
        assert_point_eq(blend(o, a, b, VectorFactor::new(1.0, 0.0)), b);
        assert_point_eq(blend(o, a, b, VectorFactor::new(0.0, 1.0)), a);
    }

    #[test]
    fn degenerate_edges_collapse_to_origin() {
        let o = Point::new(-1.5, 4.0);
        assert_point_eq(blend(o, o, o, VectorFactor::new(0.7, -0.3)), o);
    }

    #[test]
    fn blend_is_affine_in_both_factors() {
        let o = Point::new(0.0, 0.0);
        let a = Point::new(0.0, 4.0);
        let b = Point::new(6.0, 0.0);

        let p = blend(o, a, b, VectorFactor::new(0.5, 0.25));
        assert_point_eq(p, Point::new(3.0, 1.0));
    }
}
