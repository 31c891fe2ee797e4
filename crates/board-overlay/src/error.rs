use board_overlay_core::GeometryError;

use crate::layout::LayoutError;

/// Errors fatal to a calibration call. Reported to the caller, never
/// silently defaulted.
#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("white-reference color sample has a zero channel")]
    DegenerateColorSample,
}

/// Per-frame failures.
///
/// None of these are fatal: a single malformed frame must not
/// interrupt the live pipeline, so the caller skips the frame (or
/// holds the previous valid result) and carries on. The variants keep
/// "wrong input shape" distinguishable from "corrupted geometry".
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("expected {expected} detected points, got {got}")]
    PointCount { expected: usize, got: usize },
    #[error("detected quad violates top-left/bottom-left ordering")]
    MisorderedQuad,
    #[error("unknown component index {index}")]
    UnknownComponent { index: usize },
    #[error(transparent)]
    Degenerate(#[from] GeometryError),
}
