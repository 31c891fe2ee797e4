//! Storage grid generation: edge rows, interior nodes, cell assembly.
//!
//! The grid is perspective-consistent without a homography: the top
//! and bottom edge rows step along the rack edges with uniform grid
//! factors, interior rows blend boundary points up the side edges, and
//! interior nodes fall out of intersecting each column segment with
//! its row segment.

use board_overlay_core::{
    blend, intersect, GeometryError, GridStepFactors, OrderedQuad, Point, QuadBox,
};

/// Node scaffold of the storage grid: top and bottom edge rows of
/// length `columns + 1` plus the interior middle rows ordered top to
/// bottom.
#[derive(Clone, Debug)]
pub struct GridPoints {
    pub top: Vec<Point>,
    pub middle: Vec<Vec<Point>>,
    pub bottom: Vec<Point>,
}

/// Compute the full node scaffold for a `rows` x `columns` grid nested
/// in the reconstructed rack quad.
///
/// Fails with [`GeometryError::ParallelLines`] when a column segment
/// is parallel to a row segment, which only happens on degenerate
/// rack quads; callers treat that as a dropped frame.
pub fn grid_points(
    rack: &OrderedQuad,
    rows: u32,
    columns: u32,
    steps: &GridStepFactors,
) -> Result<GridPoints, GeometryError> {
    let (top, bottom) = edge_rows(rack, columns, steps);
    let middle = middle_rows(rack, rows, columns, &top, &bottom, steps)?;
    Ok(GridPoints {
        top,
        middle,
        bottom,
    })
}

/// Top and bottom edge point sequences. The rack corners are the
/// endpoints; interior points step along the edges with the column
/// grid factors.
fn edge_rows(rack: &OrderedQuad, columns: u32, steps: &GridStepFactors) -> (Vec<Point>, Vec<Point>) {
    let [tl, bl, br, tr] = *rack.corners();
    let mut top = Vec::with_capacity(columns as usize + 1);
    let mut bottom = Vec::with_capacity(columns as usize + 1);

    top.push(tl);
    bottom.push(bl);
    for col in 1..columns as usize {
        let f = steps.at(col, 0);
        top.push(blend(tl, bl, tr, f));
        bottom.push(blend(bl, tl, br, f));
    }
    top.push(tr);
    bottom.push(br);

    (top, bottom)
}

/// Interior rows, ordered top to bottom.
///
/// Row factors are measured upward from the bottom corners, so the
/// top-most interior row carries the largest step index. Left and
/// right boundary points blend up the side edges; interior nodes are
/// intersections of the column segment with the row segment.
fn middle_rows(
    rack: &OrderedQuad,
    rows: u32,
    columns: u32,
    top: &[Point],
    bottom: &[Point],
    steps: &GridStepFactors,
) -> Result<Vec<Vec<Point>>, GeometryError> {
    let [tl, bl, br, tr] = *rack.corners();
    let mut out = Vec::with_capacity(rows.saturating_sub(1) as usize);

    for row in (1..rows as usize).rev() {
        let f = steps.at(0, row);
        let left = blend(bl, tl, br, f);
        let right = blend(br, tr, bl, f);

        let mut nodes = Vec::with_capacity(columns as usize + 1);
        nodes.push(left);
        for col in 1..columns as usize {
            nodes.push(intersect(top[col], bottom[col], left, right)?);
        }
        nodes.push(right);
        out.push(nodes);
    }

    Ok(out)
}

/// Assemble one cell per grid position, row-major.
///
/// The first interior row is bounded above by the top edge row and the
/// last is bounded below by the bottom edge row. A single-row grid
/// falls back to the edge sequences alone; the same fallback covers a
/// 1x1 rack as one full-size cell, and a single-column grid works
/// through the regular path.
pub fn build_cells(points: &GridPoints, rows: u32, columns: u32) -> Vec<QuadBox> {
    let c = columns as usize;
    let mut cells = Vec::with_capacity(rows as usize * c);

    if rows <= 1 {
        for k in 0..c {
            cells.push(QuadBox::new([
                points.top[k],
                points.bottom[k],
                points.bottom[k + 1],
                points.top[k + 1],
            ]));
        }
        return cells;
    }

    let r = rows as usize;
    for i in 0..r {
        let upper: &[Point] = if i == 0 { &points.top } else { &points.middle[i - 1] };
        let lower: &[Point] = if i + 1 == r {
            &points.bottom
        } else {
            &points.middle[i]
        };
        for k in 0..c {
            cells.push(QuadBox::new([upper[k], lower[k], lower[k + 1], upper[k + 1]]));
        }
    }

    cells
}
