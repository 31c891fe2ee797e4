//! Projection and sub-location engine for guided board assembly.
//!
//! Given (a) the physical layout of a conductor board and its
//! component storage rack and (b) the pixel positions of the reference
//! markers detected in a camera frame, this crate reconstructs the
//! true corner quadrilateral of each object in image space and derives
//! the nested sub-regions a renderer overlays on the live feed:
//! per-component placement boxes on the board and the cell grid of the
//! storage rack.
//!
//! Marker detection and rendering are external collaborators. All of
//! the work here is synchronous 2D point interpolation and line
//! intersection over an immutable [`Session`] snapshot; no homography
//! is solved, the mapping is approximated affinely near each region of
//! interest.

mod error;
mod grid;
mod layout;
mod placement;
mod projection;
mod session;

pub use board_overlay_core::{
    GeometryError, GridStepFactors, OrderedQuad, Point, QuadBox, VectorFactor,
    MAX_ANGLE_DEVIATION_DEG,
};
pub use error::{CalibrationError, FrameError};
pub use grid::{build_cells, grid_points, GridPoints};
pub use layout::{
    BoardAttributes, ComponentSpec, LayoutDescriptor, LayoutError, OriginVector,
    StorageAttributes,
};
pub use placement::build_assembly_placements;
pub use projection::reconstruct_corners;
pub use session::{CalibrationSummary, ColorCorrection, ColorSample, Session};
