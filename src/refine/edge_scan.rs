//! Gradient scan refiner.
//!
//! Algorithm
//! 1. Aggregate the canonical text lines; the center horizontal/vertical
//!    lines and the character height anchor the search.
//! 2. Compute Sobel gradients of the canonical crop.
//! 3. For every offset (in `offset_step_px` increments) outside the text,
//!    shift the center line by that offset and average the absolute gradient
//!    component along the line normal over `samples_per_line` bilinear
//!    samples. This yields one edge-strength profile per direction.
//! 4. Local maxima above `min_edge_strength` become candidates. Candidates on
//!    opposite sides are paired by strength, penalised by how far their
//!    separation is from the ideal plate height (or width).
//! 5. A side without support is placed at the ideal distance from its
//!    partner and contributes zero to the confidence.
//!
//! Offsets follow [`LineSegment::parallel_line`]: positive moves up for the
//! horizontal center line and right for the vertical one.

use super::{CornerRefinement, CornerRefiner};
use crate::config::PlateConfig;
use crate::edge_finder::MIN_CHAR_HEIGHT_PX;
use crate::edges::{sobel_gradients, Grad};
use crate::geometry::{Canonical, LineSegment, Quad};
use crate::image::{ImageF32, ImageU8};
use crate::text_lines::{TextLine, TextLineCollection};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Parameters of [`EdgeScanRefiner`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeScanParams {
    /// Distance between consecutive scanned lines (pixels).
    pub offset_step_px: f32,
    /// Bilinear samples taken along each scanned line.
    pub samples_per_line: usize,
    /// How far the horizontal scan extends past the text on each side, as a
    /// fraction of the center line length.
    pub horizontal_span_extension: f32,
    /// How far the vertical scan extends past the text on each side, as a
    /// fraction of the center line length.
    pub vertical_span_extension: f32,
    /// Search limit from the center line, as a multiple of the ideal plate
    /// size in that direction.
    pub search_extent: f32,
    /// Minimum mean normal gradient (Sobel units on [0, 1] intensities) for
    /// a line to count as an edge candidate.
    pub min_edge_strength: f32,
    /// Mean normal gradient that maps to full confidence.
    pub strong_edge_strength: f32,
    /// Maximum candidates kept per side.
    pub max_candidates: usize,
    /// Weight of the relative size mismatch when pairing candidates.
    pub size_weight: f32,
}

impl Default for EdgeScanParams {
    fn default() -> Self {
        Self {
            offset_step_px: 1.0,
            samples_per_line: 48,
            horizontal_span_extension: 0.1,
            vertical_span_extension: 1.0,
            search_extent: 0.9,
            min_edge_strength: 0.2,
            strong_edge_strength: 1.0,
            max_candidates: 6,
            size_weight: 1.0,
        }
    }
}

/// Default [`CornerRefiner`] scanning gradient profiles around the text.
#[derive(Clone, Debug, Default)]
pub struct EdgeScanRefiner {
    params: EdgeScanParams,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EdgeCandidate {
    offset: f32,
    strength: f32,
}

/// Chosen edge for one side; `strength` is zero for a placed fallback.
#[derive(Clone, Copy, Debug, PartialEq)]
struct EdgeChoice {
    offset: f32,
    strength: f32,
}

impl EdgeScanRefiner {
    pub fn new(params: EdgeScanParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EdgeScanParams {
        &self.params
    }

    fn refine_inner(
        &self,
        crop: &ImageU8<'_>,
        lines: &[TextLine<Canonical>],
        config: &PlateConfig,
    ) -> Option<CornerRefinement> {
        if crop.w < 3 || crop.h < 3 {
            debug!("EdgeScanRefiner: crop {}x{} too small", crop.w, crop.h);
            return None;
        }
        let text = TextLineCollection::new(lines).ok()?;
        if text.char_height < MIN_CHAR_HEIGHT_PX {
            debug!(
                "EdgeScanRefiner: char height {:.3} below floor",
                text.char_height
            );
            return None;
        }
        let ideal_height = text.char_height * config.char_height_to_plate_height_ratio();
        let ideal_width = text.char_height * config.char_height_to_plate_width_ratio();

        let grad = sobel_gradients(&ImageF32::from_u8(crop));

        let horizontal = text.center_horizontal_line;
        let vertical = text.center_vertical_line;
        let half_text_height = 0.5 * text.char_height;
        let half_text_width = 0.5 * text.longer_segment.length();

        let (top, bottom) = self.scan_direction(
            &grad,
            &horizontal,
            half_text_height,
            ideal_height,
            self.params.horizontal_span_extension,
        );
        let (right, left) = self.scan_direction(
            &grad,
            &vertical,
            half_text_width,
            ideal_width,
            self.params.vertical_span_extension,
        );
        debug!(
            "EdgeScanRefiner: top={:?} bottom={:?} left={:?} right={:?}",
            top, bottom, left, right
        );

        let top_line = horizontal.parallel_line(top.offset);
        let bottom_line = horizontal.parallel_line(bottom.offset);
        let left_line = vertical.parallel_line(left.offset);
        let right_line = vertical.parallel_line(right.offset);
        let corners = Quad::new(
            top_line.intersection(&left_line).ok()?,
            top_line.intersection(&right_line).ok()?,
            bottom_line.intersection(&right_line).ok()?,
            bottom_line.intersection(&left_line).ok()?,
        );

        let strong = self.params.strong_edge_strength.max(f32::EPSILON);
        let confidence = [top, bottom, left, right]
            .iter()
            .map(|c| (c.strength / strong).clamp(0.0, 1.0))
            .sum::<f32>()
            * 0.25;
        Some(CornerRefinement {
            corners,
            confidence,
        })
    }

    /// Scans both sides of `center` and returns the chosen (positive,
    /// negative) offsets.
    fn scan_direction(
        &self,
        grad: &Grad,
        center: &LineSegment<Canonical>,
        inner: f32,
        ideal: f32,
        extension: f32,
    ) -> (EdgeChoice, EdgeChoice) {
        let outer = (ideal * self.params.search_extent).max(inner);
        let positive = self.candidates(grad, center, inner, outer, 1.0, extension);
        let negative = self.candidates(grad, center, inner, outer, -1.0, extension);
        debug!(
            "EdgeScanRefiner: scan [{:.1}, {:.1}] -> {} positive, {} negative candidates",
            inner,
            outer,
            positive.len(),
            negative.len()
        );
        choose_pair(&positive, &negative, ideal, &self.params)
    }

    fn candidates(
        &self,
        grad: &Grad,
        center: &LineSegment<Canonical>,
        inner: f32,
        outer: f32,
        sign: f32,
        extension: f32,
    ) -> Vec<EdgeCandidate> {
        let step = self.params.offset_step_px.max(0.25);
        let mut profile: Vec<EdgeCandidate> = Vec::new();
        let mut dist = inner + step;
        while dist <= outer {
            let offset = sign * dist;
            let line = center.parallel_line(offset);
            profile.push(EdgeCandidate {
                offset,
                strength: line_strength(grad, &line, self.params.samples_per_line, extension),
            });
            dist += step;
        }

        let mut peaks: Vec<EdgeCandidate> = (0..profile.len())
            .filter(|&i| {
                let s = profile[i].strength;
                let prev = if i > 0 { profile[i - 1].strength } else { 0.0 };
                let next = profile.get(i + 1).map_or(0.0, |c| c.strength);
                s >= self.params.min_edge_strength && s >= prev && s >= next
            })
            .map(|i| profile[i])
            .collect();
        peaks.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        peaks.truncate(self.params.max_candidates);
        peaks
    }
}

impl CornerRefiner for EdgeScanRefiner {
    fn refine(
        &self,
        crop: ImageU8<'_>,
        lines: &[TextLine<Canonical>],
        config: &PlateConfig,
    ) -> CornerRefinement {
        match self.refine_inner(&crop, lines, config) {
            Some(found) => found,
            None => {
                warn!("EdgeScanRefiner: no usable geometry, returning whole crop");
                CornerRefinement::fallback(&crop)
            }
        }
    }
}

/// Mean absolute normal gradient along `line`; zero when fewer than half of
/// the samples fall inside the image.
fn line_strength(grad: &Grad, line: &LineSegment<Canonical>, samples: usize, extension: f32) -> f32 {
    let samples = samples.max(2);
    let n = line.normal();
    let t0 = -extension;
    let dt = (1.0 + 2.0 * extension) / (samples - 1) as f32;
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for i in 0..samples {
        let p = line.point_at(t0 + i as f32 * dt);
        if let Some((gx, gy)) = grad.sample(p.x, p.y) {
            sum += (gx * n[0] + gy * n[1]).abs();
            count += 1;
        }
    }
    if count * 2 < samples {
        0.0
    } else {
        sum / count as f32
    }
}

fn choose_pair(
    positive: &[EdgeCandidate],
    negative: &[EdgeCandidate],
    ideal: f32,
    params: &EdgeScanParams,
) -> (EdgeChoice, EdgeChoice) {
    let penalty_scale = params.size_weight * params.strong_edge_strength;
    let mut best: Option<(f32, EdgeChoice, EdgeChoice)> = None;
    for p in positive {
        for n in negative {
            let separation = p.offset - n.offset;
            let mismatch = ((separation - ideal) / ideal).abs();
            let score = p.strength + n.strength - penalty_scale * mismatch;
            if best.map_or(true, |(s, _, _)| score > s) {
                best = Some((
                    score,
                    EdgeChoice {
                        offset: p.offset,
                        strength: p.strength,
                    },
                    EdgeChoice {
                        offset: n.offset,
                        strength: n.strength,
                    },
                ));
            }
        }
    }
    if let Some((_, p, n)) = best {
        return (p, n);
    }

    match (positive.first(), negative.first()) {
        (Some(p), None) => (
            EdgeChoice {
                offset: p.offset,
                strength: p.strength,
            },
            EdgeChoice {
                offset: p.offset - ideal,
                strength: 0.0,
            },
        ),
        (None, Some(n)) => (
            EdgeChoice {
                offset: n.offset + ideal,
                strength: 0.0,
            },
            EdgeChoice {
                offset: n.offset,
                strength: n.strength,
            },
        ),
        _ => (
            EdgeChoice {
                offset: 0.5 * ideal,
                strength: 0.0,
            },
            EdgeChoice {
                offset: -0.5 * ideal,
                strength: 0.0,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::image::GrayImageU8;

    fn cand(offset: f32, strength: f32) -> EdgeCandidate {
        EdgeCandidate { offset, strength }
    }

    #[test]
    fn pairing_prefers_ideal_separation() {
        let params = EdgeScanParams::default();
        let positive = [cand(20.0, 1.0), cand(35.0, 1.0)];
        let negative = [cand(-20.0, 1.0)];
        let (p, n) = choose_pair(&positive, &negative, 40.0, &params);
        assert_eq!(p.offset, 20.0);
        assert_eq!(n.offset, -20.0);
    }

    #[test]
    fn missing_side_is_placed_at_ideal_distance() {
        let params = EdgeScanParams::default();
        let (p, n) = choose_pair(&[cand(18.0, 0.8)], &[], 40.0, &params);
        assert_eq!(p.offset, 18.0);
        assert_eq!(n.offset, -22.0);
        assert_eq!(n.strength, 0.0);

        let (p, n) = choose_pair(&[], &[], 40.0, &params);
        assert_eq!((p.offset, n.offset), (20.0, -20.0));
    }

    #[test]
    fn no_text_lines_falls_back_to_whole_crop() {
        let img = GrayImageU8::zeros(60, 30);
        let refinement =
            EdgeScanRefiner::default().refine(img.as_view(), &[], &PlateConfig::default());
        assert_eq!(refinement.confidence, 0.0);
        assert_eq!(refinement.corners, Quad::from_bounds(0.0, 0.0, 60.0, 30.0));
    }

    #[test]
    fn sub_pixel_char_height_falls_back_to_whole_crop() {
        let img = GrayImageU8::zeros(120, 60);
        let poly = [
            Point::new(10.0, 30.0),
            Point::new(110.0, 30.0),
            Point::new(110.0, 30.5),
            Point::new(10.0, 30.5),
        ];
        let lines = [TextLine::new(poly, poly)];
        let text = TextLineCollection::new(&lines).unwrap();
        assert!(text.char_height < MIN_CHAR_HEIGHT_PX);
        let refinement =
            EdgeScanRefiner::default().refine(img.as_view(), &lines, &PlateConfig::default());
        assert_eq!(refinement.confidence, 0.0);
        assert_eq!(refinement.corners, Quad::from_bounds(0.0, 0.0, 120.0, 60.0));
    }

    #[test]
    fn finds_bright_plate_on_dark_background() {
        // 120x60 crop, plate spans x in [10, 110), y in [8, 52).
        let (w, h) = (120usize, 60usize);
        let mut data = vec![20u8; w * h];
        for y in 8..52 {
            for x in 10..110 {
                data[y * w + x] = 220;
            }
        }
        // Characters: dark band x in [30, 90), y in [22, 38).
        for y in 22..38 {
            for x in 30..90 {
                data[y * w + x] = 40;
            }
        }
        let img = GrayImageU8::new(w, h, data);
        let band = [
            Point::new(30.0, 22.0),
            Point::new(90.0, 22.0),
            Point::new(90.0, 38.0),
            Point::new(30.0, 38.0),
        ];
        let lines = [TextLine::new(band, band)];
        let config = PlateConfig {
            plate_width_mm: 100.0,
            plate_height_mm: 44.0,
            char_height_mm: 16.0,
            ..Default::default()
        };
        let refinement = EdgeScanRefiner::default().refine(img.as_view(), &lines, &config);
        assert!(refinement.confidence > 0.5, "confidence {}", refinement.confidence);
        let tl = refinement.corners.top_left();
        let br = refinement.corners.bottom_right();
        assert!((tl.x - 9.5).abs() <= 1.5, "{tl:?}");
        assert!((tl.y - 7.5).abs() <= 1.5, "{tl:?}");
        assert!((br.x - 109.5).abs() <= 1.5, "{br:?}");
        assert!((br.y - 51.5).abs() <= 1.5, "{br:?}");
    }
}
