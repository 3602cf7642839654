//! Error taxonomy for the edge finder.

/// Failures of the analytic geometry: lines that do not meet, segments
/// without a direction, transforms that blow up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("lines are parallel and have no intersection")]
    ParallelLines,
    #[error("segment has zero length or non-finite endpoints")]
    DegenerateSegment,
    #[error("quadrilateral has zero width or height")]
    DegenerateQuad,
    #[error("homography is singular for the given correspondences")]
    SingularHomography,
    #[error("transformed coordinates are not finite")]
    NonFinite,
}

/// Error returned by [`crate::EdgeFinder`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EdgeFinderError {
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("insufficient input: {0}")]
    InsufficientInput(String),
    #[error("invalid region {width}x{height}")]
    InvalidRegion { width: usize, height: usize },
    #[error("invalid plate configuration: {0}")]
    InvalidConfig(String),
}
