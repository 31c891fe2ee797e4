//! Assembly placement boxes for board components.
//!
//! Every occurrence of a component turns into one quadrilateral
//! placement target nested inside the reconstructed board quad. The
//! four box corners come from the same bilinear blend primitive as the
//! corner reconstruction, applied with board-edge vectors and
//! normalized coordinate ratios as factors.

use board_overlay_core::{blend_edges, OrderedQuad, QuadBox, VectorFactor};

use crate::layout::{BoardAttributes, ComponentSpec};

/// Axis convention of the physical layout relative to the camera.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Orientation {
    Normal,
    Rotated,
}

impl Orientation {
    fn of(board: &BoardAttributes) -> Self {
        if board.rotated {
            Self::Rotated
        } else {
            Self::Normal
        }
    }
}

/// Which half of the board an occurrence sits in. Selects the pair of
/// board edges (and the base corner) the placement corners are blended
/// from, anchoring the affine approximation to the half nearest the
/// component.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum BoardHalf {
    Upper,
    Lower,
}

/// Board-local placement data for one occurrence, already resolved for
/// the axis convention.
#[derive(Clone, Copy, Debug)]
struct Occurrence {
    coord_x: f64,
    coord_y: f64,
    center_x: f64,
    center_y: f64,
    half_width: f64,
    half_height: f64,
}

impl Occurrence {
    fn resolve(board: &BoardAttributes, component: &ComponentSpec, row: &[f64; 4]) -> Self {
        let [raw_x, raw_y, offset_x, offset_y] = *row;
        match Orientation::of(board) {
            Orientation::Normal => Self {
                coord_x: (board.origin.x - raw_x).abs(),
                coord_y: (board.origin.y - raw_y).abs(),
                center_x: offset_x,
                center_y: offset_y,
                half_width: component.width / 2.0,
                half_height: component.height / 2.0,
            },
            Orientation::Rotated => Self {
                coord_x: (board.origin.x - raw_y).abs(),
                coord_y: (board.origin.y - raw_x).abs(),
                center_x: offset_y,
                center_y: offset_x,
                half_width: component.height / 2.0,
                half_height: component.width / 2.0,
            },
        }
    }
}

/// Half-extent sign per output corner, canonical {tl, bl, br, tr}
/// order. The two halves use mirrored patterns because their blend
/// bases sit at opposite corners of the board.
fn corner_signs(half: BoardHalf) -> [(f64, f64); 4] {
    match half {
        BoardHalf::Lower => [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)],
        BoardHalf::Upper => [(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, -1.0)],
    }
}

fn placement_box(board_quad: &OrderedQuad, board: &BoardAttributes, occ: Occurrence) -> QuadBox {
    let [tl, bl, br, tr] = *board_quad.corners();
    let width = board.board_width;
    let height = board.board_height;

    let half = if occ.coord_y >= height / 2.0 {
        BoardHalf::Lower
    } else {
        BoardHalf::Upper
    };

    // Lower half blends from the bottom-left corner along the bottom
    // and right edges with inverted y ratios; upper half from the
    // top-left corner along the top and right edges.
    let (origin, edge_y, edge_x) = match half {
        BoardHalf::Lower => (bl, tr - br, br - bl),
        BoardHalf::Upper => (tl, br - tr, tr - tl),
    };

    let corners = corner_signs(half).map(|(sign_x, sign_y)| {
        let fx = (occ.coord_x + occ.center_x + sign_x * occ.half_width) / width;
        let fy = (occ.coord_y + occ.center_y + sign_y * occ.half_height) / height;
        let fy = match half {
            BoardHalf::Lower => 1.0 - fy,
            BoardHalf::Upper => fy,
        };
        blend_edges(origin, edge_y, edge_x, VectorFactor::new(fx, fy))
    });

    QuadBox::new(corners)
}

/// Build one placement box per occurrence of `component`, nested in
/// the reconstructed board quad.
pub fn build_assembly_placements(
    board_quad: &OrderedQuad,
    board: &BoardAttributes,
    component: &ComponentSpec,
) -> Vec<QuadBox> {
    component
        .coordinates
        .iter()
        .map(|row| placement_box(board_quad, board, Occurrence::resolve(board, component, row)))
        .collect()
}
