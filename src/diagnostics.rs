//! Per-call diagnostics for the edge finder.
//!
//! [`EdgeFinderReport`] is returned by
//! [`EdgeFinder::find_edge_corners_detailed`](crate::EdgeFinder) and carries
//! every intermediate geometry plus a [`TimingBreakdown`] of the stages.

use crate::edge_finder::{EdgeCorners, EstimateBranch, PlateSizing};
use crate::geometry::{Canonical, Crop, Full, Quad};
use crate::homography::Homography;
use crate::image::GrayImageU8;
use crate::transform::CropSize;
use serde::{Deserialize, Serialize};

/// Timing entry describing a single stage of the edge finder.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one edge finder call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    pub fn stage(&self, label: &str) -> Option<&StageTiming> {
        self.stages.iter().find(|s| s.label == label)
    }
}

/// Everything computed while locating one plate.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeFinderReport {
    pub corners: Quad<Full>,
    pub confidence: f32,
    pub branch: EstimateBranch,
    /// Mean text-line angle in degrees, crop-local.
    pub text_angle_deg: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing: Option<PlateSizing>,
    /// Initial estimate in crop-local coordinates.
    pub initial_estimate: Quad<Crop>,
    /// Initial estimate mapped into the full image.
    pub mapped_estimate: Quad<Full>,
    pub canonical_size: CropSize,
    /// Refiner output before inverse mapping.
    pub canonical_corners: Quad<Canonical>,
    pub canonical_matrix: Homography<Full, Canonical>,
    pub inverse_matrix: Homography<Canonical, Full>,
    pub timings: TimingBreakdown,
    #[serde(skip)]
    pub canonical_image: Option<GrayImageU8>,
}

impl EdgeFinderReport {
    pub fn edge_corners(&self) -> EdgeCorners {
        EdgeCorners {
            corners: self.corners,
            confidence: self.confidence,
        }
    }
}
