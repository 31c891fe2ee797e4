/// Degenerate-geometry conditions.
///
/// The conditions themselves are ordinary measurement or detection
/// failures; what matters is that they surface as typed errors instead
/// of non-finite coordinates, so a caller can drop the frame and keep
/// the last valid overlay.
#[derive(thiserror::Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum GeometryError {
    #[error("reference span is zero")]
    ZeroReferenceSpan,
    #[error("zero-length edge vector")]
    ZeroLengthEdge,
    #[error("lines are parallel")]
    ParallelLines,
}
