//! Calibration session: the immutable snapshot every frame-processing
//! call borrows.
//!
//! A calibration builds a fresh [`Session`] from the layout descriptor
//! and the white-reference color sample; nothing is ever mutated in
//! place afterwards. A frame pipeline that still holds the previous
//! session keeps seeing a consistent set of descriptor values and
//! derived factors, which makes the calibrate-versus-frame handoff a
//! plain value swap.

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use board_overlay_core::{corner_factors, GridStepFactors, OrderedQuad, Point, QuadBox, VectorFactor};

use crate::error::{CalibrationError, FrameError};
use crate::layout::{ComponentSpec, LayoutDescriptor};
use crate::{grid, placement, projection};

/// Mean RGB of the white reference region, sampled by the frame
/// frontend at calibration time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorSample {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// White-balance multipliers for the external frame pre-processing
/// step. Session-scoped outputs; the geometry itself never reads them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorCorrection {
    pub blue_factor: f64,
    pub red_factor: f64,
}

impl ColorCorrection {
    /// Balance blue and red against the green channel of the white
    /// reference.
    pub fn from_sample(sample: ColorSample) -> Result<Self, CalibrationError> {
        if sample.red <= 0.0 || sample.blue <= 0.0 {
            return Err(CalibrationError::DegenerateColorSample);
        }
        Ok(Self {
            blue_factor: sample.green / sample.blue,
            red_factor: sample.green / sample.red,
        })
    }
}

/// Display strings for the host UI: the board name plus one line of
/// name / occurrence count / polarity per component.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationSummary {
    pub board_name: String,
    pub component_names: Vec<String>,
    pub occurrences: Vec<String>,
    pub polarities: Vec<String>,
}

/// Immutable-after-construction calibration state.
#[derive(Clone, Debug)]
pub struct Session {
    layout: LayoutDescriptor,
    board_factors: [VectorFactor; 4],
    storage_factors: [VectorFactor; 4],
    grid_steps: GridStepFactors,
    correction: ColorCorrection,
}

impl Session {
    /// Load the layout descriptor from `path` and derive every
    /// per-session factor.
    pub fn calibrate(
        sample: ColorSample,
        path: impl AsRef<Path>,
    ) -> Result<Self, CalibrationError> {
        let layout = LayoutDescriptor::load_json(path)?;
        Self::from_parts(sample, layout)
    }

    /// Build a session from an already-loaded descriptor.
    pub fn from_parts(
        sample: ColorSample,
        layout: LayoutDescriptor,
    ) -> Result<Self, CalibrationError> {
        let correction = ColorCorrection::from_sample(sample)?;

        let board = &layout.board;
        let board_factors = corner_factors(
            board.reference_width,
            board.reference_height,
            &board.dist_refs_to_corners,
        )?;

        // The storage markers sit on the far side of their corners
        // relative to the board markers, hence the inverted factors.
        let storage = &layout.storage;
        let storage_factors = corner_factors(
            storage.reference_mid_width,
            storage.reference_mid_height,
            &storage.dist_refs_to_corners,
        )?
        .map(VectorFactor::inverted);

        let grid_steps = GridStepFactors::new(
            storage.box_width,
            storage.box_height,
            storage.box_offset_x,
            storage.box_offset_y,
            storage.reference_corner_width,
            storage.reference_corner_height,
        )?;

        info!(
            "calibrated board `{}`: {} components, {}x{} storage grid",
            layout.board_name,
            layout.components.len(),
            storage.rows,
            storage.columns
        );

        Ok(Self {
            layout,
            board_factors,
            storage_factors,
            grid_steps,
            correction,
        })
    }

    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }

    pub fn color_correction(&self) -> ColorCorrection {
        self.correction
    }

    /// Display strings as the host UI expects them.
    pub fn summary(&self) -> CalibrationSummary {
        CalibrationSummary {
            board_name: self.layout.board_name.clone(),
            component_names: self
                .layout
                .components
                .iter()
                .map(|c| c.name.clone())
                .collect(),
            occurrences: self
                .layout
                .components
                .iter()
                .map(|c| c.occurrences.to_string())
                .collect(),
            polarities: self
                .layout
                .components
                .iter()
                .map(|c| (c.polarity as u8).to_string())
                .collect(),
        }
    }

    /// Reconstruct the board's corner quad from detected marker
    /// centers.
    pub fn reconstruct_board(&self, points: &[Point]) -> Result<OrderedQuad, FrameError> {
        let detected = ordered_quad(points)?;
        Ok(projection::reconstruct_corners(&detected, &self.board_factors))
    }

    /// Reconstruct the storage rack's corner quad from detected marker
    /// centers.
    pub fn reconstruct_storage(&self, points: &[Point]) -> Result<OrderedQuad, FrameError> {
        let detected = ordered_quad(points)?;
        Ok(projection::reconstruct_corners(
            &detected,
            &self.storage_factors,
        ))
    }

    /// One placement box per occurrence of the component at `index`.
    pub fn build_assembly_placements(
        &self,
        board_quad: &OrderedQuad,
        index: usize,
    ) -> Result<Vec<QuadBox>, FrameError> {
        let component = self.component(index)?;
        debug!(
            "placements for `{}`: {} occurrences",
            component.name, component.occurrences
        );
        Ok(placement::build_assembly_placements(
            board_quad,
            &self.layout.board,
            component,
        ))
    }

    /// All storage cells, row-major.
    pub fn build_storage_grid(&self, rack_quad: &OrderedQuad) -> Result<Vec<QuadBox>, FrameError> {
        let storage = &self.layout.storage;
        let points = grid::grid_points(rack_quad, storage.rows, storage.columns, &self.grid_steps)?;
        Ok(grid::build_cells(&points, storage.rows, storage.columns))
    }

    /// Zero-based storage cell index to highlight when withdrawing the
    /// component at `index`.
    pub fn withdrawal_box_index(&self, index: usize) -> Result<usize, FrameError> {
        Ok(self.component(index)?.box_number as usize - 1)
    }

    fn component(&self, index: usize) -> Result<&ComponentSpec, FrameError> {
        self.layout
            .components
            .get(index)
            .ok_or(FrameError::UnknownComponent { index })
    }
}

/// Canonicalize raw detected points into an [`OrderedQuad`], keeping
/// "wrong point count" and "misordered detection" distinguishable for
/// the caller.
fn ordered_quad(points: &[Point]) -> Result<OrderedQuad, FrameError> {
    let quad = OrderedQuad::from_points(points).ok_or(FrameError::PointCount {
        expected: 4,
        got: points.len(),
    })?;
    // Image y grows downward: the top-left marker must sit above the
    // bottom-left one, anything else means the pairs got swapped.
    if quad.top_left().y >= quad.bottom_left().y {
        return Err(FrameError::MisorderedQuad);
    }
    Ok(quad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::DEMO_LAYOUT;

    fn demo_session() -> Session {
        let layout = LayoutDescriptor::from_json_str(DEMO_LAYOUT).expect("layout");
        Session::from_parts(
            ColorSample {
                red: 200.0,
                green: 180.0,
                blue: 160.0,
            },
            layout,
        )
        .expect("session")
    }

    fn marker_points() -> Vec<Point> {
        vec![
            Point::new(100.0, 100.0),
            Point::new(100.0, 400.0),
            Point::new(600.0, 400.0),
            Point::new(600.0, 100.0),
        ]
    }

    #[test]
    fn color_factors_balance_against_green() {
        let session = demo_session();
        let correction = session.color_correction();
        assert_eq!(correction.blue_factor, 180.0 / 160.0);
        assert_eq!(correction.red_factor, 180.0 / 200.0);
    }

    #[test]
    fn zero_channel_sample_fails_calibration() {
        let layout = LayoutDescriptor::from_json_str(DEMO_LAYOUT).expect("layout");
        let err = Session::from_parts(
            ColorSample {
                red: 0.0,
                green: 180.0,
                blue: 160.0,
            },
            layout,
        )
        .expect_err("zero channel");
        assert!(matches!(err, CalibrationError::DegenerateColorSample));
    }

    #[test]
    fn summary_lists_components_in_descriptor_order() {
        let summary = demo_session().summary();
        assert_eq!(summary.board_name, "demo-board");
        assert_eq!(summary.component_names, vec!["R17", "C3"]);
        assert_eq!(summary.occurrences, vec!["2", "1"]);
        assert_eq!(summary.polarities, vec!["0", "1"]);
    }

    #[test]
    fn wrong_point_count_is_reported_not_crashed() {
        let session = demo_session();
        let err = session
            .reconstruct_board(&marker_points()[..3])
            .expect_err("three points");
        assert!(matches!(
            err,
            FrameError::PointCount {
                expected: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn swapped_marker_pairs_are_rejected() {
        let session = demo_session();
        let mut points = marker_points();
        points.swap(0, 1);
        let err = session.reconstruct_board(&points).expect_err("misordered");
        assert!(matches!(err, FrameError::MisorderedQuad));
    }

    #[test]
    fn board_reconstruction_moves_corners_inward() {
        let session = demo_session();
        let quad = session
            .reconstruct_board(&marker_points())
            .expect("reconstructed");

        // Board factors are positive along both neighbor edges, so
        // every corner moves strictly into the marker quad.
        assert!(quad.top_left().x > 100.0);
        assert!(quad.top_left().y > 100.0);
        assert!(quad.bottom_right().x < 600.0);
        assert!(quad.bottom_right().y < 400.0);
        assert!(quad.is_well_formed());
    }

    #[test]
    fn storage_reconstruction_moves_corners_outward() {
        let session = demo_session();
        let quad = session
            .reconstruct_storage(&marker_points())
            .expect("reconstructed");

        // Inverted factors push the rack corners outside the markers.
        assert!(quad.top_left().x < 100.0);
        assert!(quad.top_left().y < 100.0);
        assert!(quad.bottom_right().x > 600.0);
        assert!(quad.bottom_right().y > 400.0);
    }

    #[test]
    fn storage_grid_matches_the_descriptor_shape() {
        let session = demo_session();
        let rack = session
            .reconstruct_storage(&marker_points())
            .expect("reconstructed");
        let cells = session.build_storage_grid(&rack).expect("grid");
        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn withdrawal_index_is_zero_based() {
        let session = demo_session();
        assert_eq!(session.withdrawal_box_index(0).expect("R17"), 0);
        assert_eq!(session.withdrawal_box_index(1).expect("C3"), 4);
        assert!(matches!(
            session.withdrawal_box_index(9),
            Err(FrameError::UnknownComponent { index: 9 })
        ));
    }

    #[test]
    fn unknown_component_has_no_placements() {
        let session = demo_session();
        let board = session
            .reconstruct_board(&marker_points())
            .expect("reconstructed");
        assert!(matches!(
            session.build_assembly_placements(&board, 5),
            Err(FrameError::UnknownComponent { index: 5 })
        ));
    }

    #[test]
    fn placements_cover_every_occurrence() {
        let session = demo_session();
        let board = session
            .reconstruct_board(&marker_points())
            .expect("reconstructed");
        let boxes = session
            .build_assembly_placements(&board, 0)
            .expect("placements");
        assert_eq!(boxes.len(), 2);
    }
}
