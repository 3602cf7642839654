//! Plate edge finder.
//!
//! Pipeline for one plate candidate:
//! 1. Aggregate the crop-local text lines and build a first-pass plate
//!    quadrilateral from them ([`estimate`]).
//! 2. Map that quadrilateral into the full image, size a canonical crop with
//!    the plate's aspect ratio and resample the full image into it.
//! 3. Remap the text lines into the canonical crop and hand both to a
//!    [`CornerRefiner`].
//! 4. Map the refined corners back into the full image.
//!
//! [`EdgeFinder::find_edge_corners_detailed`] returns every intermediate in
//! an [`EdgeFinderReport`]; [`EdgeFinder::find_edge_corners_batch`] runs
//! independent candidates on the rayon pool.

pub mod estimate;

pub use estimate::{
    estimate_initial_quad, EstimateBranch, InitialEstimate, PlateSizing, MIN_CHAR_HEIGHT_PX,
};

use crate::config::PlateConfig;
use crate::diagnostics::{EdgeFinderReport, TimingBreakdown};
use crate::error::EdgeFinderError;
use crate::geometry::{Crop, Full, Quad, Rect};
use crate::image::ImageU8;
use crate::refine::{CornerRefiner, EdgeScanParams, EdgeScanRefiner};
use crate::text_lines::{TextLine, TextLineCollection};
use crate::transform::{CropSize, Transformation};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Read-only inputs for one plate candidate.
#[derive(Clone, Copy, Debug)]
pub struct PipelineContext<'a> {
    /// Full grayscale image.
    pub image: ImageU8<'a>,
    /// Plate candidate crop, possibly resized from `region`.
    pub crop: ImageU8<'a>,
    /// Where the crop was cut from in `image`.
    pub region: Rect,
    /// Text lines in crop-local coordinates.
    pub text_lines: &'a [TextLine<Crop>],
    pub config: &'a PlateConfig,
}

/// Plate corners in full-image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EdgeCorners {
    pub corners: Quad<Full>,
    /// Refiner confidence, passed through unchanged.
    pub confidence: f32,
}

/// Locates plate corners using a pluggable [`CornerRefiner`].
#[derive(Clone, Debug, Default)]
pub struct EdgeFinder<R = EdgeScanRefiner> {
    refiner: R,
}

impl EdgeFinder<EdgeScanRefiner> {
    pub fn new(params: EdgeScanParams) -> Self {
        Self {
            refiner: EdgeScanRefiner::new(params),
        }
    }
}

impl<R: CornerRefiner> EdgeFinder<R> {
    pub fn with_refiner(refiner: R) -> Self {
        Self { refiner }
    }

    pub fn refiner(&self) -> &R {
        &self.refiner
    }

    pub fn find_edge_corners(
        &self,
        ctx: &PipelineContext<'_>,
    ) -> Result<EdgeCorners, EdgeFinderError> {
        self.run(ctx, false).map(|report| report.edge_corners())
    }

    /// Same as [`find_edge_corners`](Self::find_edge_corners) but keeps the
    /// intermediates and the canonical image.
    pub fn find_edge_corners_detailed(
        &self,
        ctx: &PipelineContext<'_>,
    ) -> Result<EdgeFinderReport, EdgeFinderError> {
        self.run(ctx, true)
    }

    /// Processes independent candidates in parallel. Results keep the input
    /// order.
    pub fn find_edge_corners_batch(
        &self,
        contexts: &[PipelineContext<'_>],
    ) -> Vec<Result<EdgeCorners, EdgeFinderError>>
    where
        R: Sync,
    {
        contexts
            .par_iter()
            .map(|ctx| self.find_edge_corners(ctx))
            .collect()
    }

    fn run(
        &self,
        ctx: &PipelineContext<'_>,
        keep_image: bool,
    ) -> Result<EdgeFinderReport, EdgeFinderError> {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        ctx.config.validate()?;
        let transform = Transformation::new(ctx.image, &ctx.crop, ctx.region)?;
        if ctx.text_lines.is_empty() {
            return Err(EdgeFinderError::InsufficientInput(
                "no text lines for plate candidate".to_string(),
            ));
        }

        // 1) Initial estimate in crop coordinates
        let stage = Instant::now();
        let text = TextLineCollection::new(ctx.text_lines)?;
        let estimate = estimate_initial_quad(&text, ctx.crop.w, ctx.crop.h, ctx.config)?;
        timings.push("estimate", elapsed_ms(stage));
        debug!(
            "EdgeFinder: {:?} estimate {:?}",
            estimate.branch, estimate.corners
        );

        // 2) Canonical crop
        let stage = Instant::now();
        let mapped = transform.crop_to_full_quad(&estimate.corners);
        let template = CropSize::new(
            ctx.config.template_width_px as usize,
            ctx.config.template_height_px as usize,
        );
        let size = transform.crop_size(&mapped, template)?;
        let forward = transform.canonical_matrix(&mapped, size)?;
        let canonical = transform.resample(size, &forward)?;
        let lines = ctx
            .text_lines
            .iter()
            .map(|line| transform.remap_text_line(line, &forward))
            .collect::<Result<Vec<_>, _>>()?;
        timings.push("canonical_crop", elapsed_ms(stage));
        debug!(
            "EdgeFinder: mapped estimate {:?} -> canonical {}x{}",
            mapped, size.width, size.height
        );

        // 3) Refinement
        let stage = Instant::now();
        let refined = self
            .refiner
            .refine(canonical.as_view(), &lines, ctx.config);
        timings.push("refine", elapsed_ms(stage));
        debug!(
            "EdgeFinder: refiner confidence {:.3} corners {:?}",
            refined.confidence, refined.corners
        );

        // 4) Back to the full image
        let stage = Instant::now();
        let inverse = transform.inverse_canonical_matrix(size, &mapped)?;
        let corners = inverse.apply_quad(&refined.corners)?;
        timings.push("inverse_map", elapsed_ms(stage));
        timings.total_ms = elapsed_ms(total_start);
        debug!(
            "EdgeFinder: corners {:?} in {:.3} ms",
            corners, timings.total_ms
        );

        Ok(EdgeFinderReport {
            corners,
            confidence: refined.confidence,
            branch: estimate.branch,
            text_angle_deg: text.char_angle,
            sizing: estimate.sizing,
            initial_estimate: estimate.corners,
            mapped_estimate: mapped,
            canonical_size: size,
            canonical_corners: refined.corners,
            canonical_matrix: forward,
            inverse_matrix: inverse,
            timings,
            canonical_image: keep_image.then_some(canonical),
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
