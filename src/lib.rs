#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod edge_finder;
pub mod error;
pub mod geometry;
pub mod homography;
pub mod image;
pub mod refine;
pub mod text_lines;
pub mod transform;

// Building blocks used by the refiner.
pub mod edges;

// --- High-level re-exports -------------------------------------------------

// Main entry points: edge finder + results.
pub use crate::edge_finder::{EdgeCorners, EdgeFinder, EstimateBranch, PipelineContext};
pub use crate::error::{EdgeFinderError, GeometryError};

// Calibration and the default refiner.
pub use crate::config::PlateConfig;
pub use crate::refine::{CornerRefinement, CornerRefiner, EdgeScanParams, EdgeScanRefiner};

// High-level diagnostics returned by the edge finder.
pub use crate::diagnostics::{EdgeFinderReport, TimingBreakdown};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use plate_edges::prelude::*;
///
/// # fn main() -> Result<(), EdgeFinderError> {
/// let (w, h) = (640usize, 480usize);
/// let gray = vec![0u8; w * h];
/// let image = ImageU8 { w, h, stride: w, data: &gray };
/// let region = Rect::new(200, 180, 240, 120);
///
/// let band = [
///     Point::new(40.0, 45.0),
///     Point::new(200.0, 45.0),
///     Point::new(200.0, 75.0),
///     Point::new(40.0, 75.0),
/// ];
/// let lines = [TextLine::new(band, band)];
/// let config = PlateConfig::default();
/// let crop = image; // usually a resized cut of `region`
///
/// let finder: EdgeFinder = EdgeFinder::default();
/// let found = finder.find_edge_corners(&PipelineContext {
///     image,
///     crop,
///     region,
///     text_lines: &lines,
///     config: &config,
/// })?;
/// println!("corners={:?} confidence={:.3}", found.corners, found.confidence);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::geometry::{Point, Quad, Rect};
    pub use crate::image::ImageU8;
    pub use crate::text_lines::TextLine;
    pub use crate::{EdgeCorners, EdgeFinder, EdgeFinderError, PipelineContext, PlateConfig};
}
