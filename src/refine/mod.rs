//! Corner refinement inside the canonical crop.
//!
//! The edge finder hands a perspective-corrected, template-sized crop and the
//! text lines remapped into it to a [`CornerRefiner`]. The refiner returns the
//! plate corners in canonical coordinates together with a confidence score,
//! which the edge finder passes through untouched.
//!
//! Refiners never fail: when no plate border can be located they return a
//! best-effort quadrilateral and a confidence of zero.
//!
//! [`EdgeScanRefiner`] is the built-in implementation. It scans lines
//! parallel to the text's center lines for strong gradient support and pairs
//! the candidates using the expected plate proportions.

mod edge_scan;

pub use edge_scan::{EdgeScanParams, EdgeScanRefiner};

use crate::config::PlateConfig;
use crate::geometry::{Canonical, Quad};
use crate::image::ImageU8;
use crate::text_lines::TextLine;
use serde::Serialize;

/// Output of a refiner: corners in canonical-crop coordinates plus a score in
/// [0, 1].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CornerRefinement {
    pub corners: Quad<Canonical>,
    pub confidence: f32,
}

impl CornerRefinement {
    /// Whole canonical crop with zero confidence.
    pub fn fallback(crop: &ImageU8<'_>) -> Self {
        Self {
            corners: Quad::from_bounds(0.0, 0.0, crop.w as f32, crop.h as f32),
            confidence: 0.0,
        }
    }
}

/// Finds plate corners inside a canonical crop.
pub trait CornerRefiner {
    fn refine(
        &self,
        crop: ImageU8<'_>,
        lines: &[TextLine<Canonical>],
        config: &PlateConfig,
    ) -> CornerRefinement;
}

impl<R: CornerRefiner + ?Sized> CornerRefiner for &R {
    fn refine(
        &self,
        crop: ImageU8<'_>,
        lines: &[TextLine<Canonical>],
        config: &PlateConfig,
    ) -> CornerRefinement {
        (**self).refine(crop, lines, config)
    }
}
