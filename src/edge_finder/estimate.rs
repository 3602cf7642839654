//! First-pass plate quadrilateral from text geometry alone.
//!
//! Two mutually exclusive branches:
//!
//! - **Text geometry**: when the longest character edge is more than
//!   [`LONG_SEGMENT_FACTOR`] character heights long, the plate size follows
//!   from the character height and the physical ratios, and the corners are
//!   intersections of lines offset from the text's center lines. The offsets
//!   are deliberately inflated so the estimate contains the whole plate.
//! - **Crop expansion**: otherwise the crop rectangle is grown by
//!   [`CROP_EXPANSION`] of its size on every side. Corners may be negative.

use crate::config::PlateConfig;
use crate::error::GeometryError;
use crate::geometry::{Crop, Quad};
use crate::text_lines::TextLineCollection;
use log::debug;
use serde::{Deserialize, Serialize};

/// The longest character edge must exceed this many character heights.
pub const LONG_SEGMENT_FACTOR: f32 = 3.0;
/// Width margin so characters near the plate ends are never clipped.
pub const WIDTH_MARGIN: f32 = 1.03;
/// Inflation of the ideal height when placing the top/bottom lines.
pub const VERTICAL_INFLATION: f32 = 1.5;
/// Inflation of the ideal width when placing the left/right lines.
pub const HORIZONTAL_INFLATION: f32 = 1.25;
/// Fraction of the crop size added on each side in the fallback branch.
pub const CROP_EXPANSION: f32 = 0.15;
/// Character heights below this (pixels) cannot size the plate.
pub const MIN_CHAR_HEIGHT_PX: f32 = 1.0;

/// Which branch produced the initial estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EstimateBranch {
    TextGeometry,
    CropExpansion,
}

/// Plate size and line offsets derived from the character height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateSizing {
    pub ideal_pixel_width: f32,
    pub ideal_pixel_height: f32,
    pub vertical_offset: f32,
    pub horizontal_offset: f32,
}

impl PlateSizing {
    pub fn from_char_height(char_height: f32, config: &PlateConfig) -> Self {
        let ideal_pixel_width =
            char_height * (config.char_height_to_plate_width_ratio() * WIDTH_MARGIN);
        let ideal_pixel_height = char_height * config.char_height_to_plate_height_ratio();
        Self {
            ideal_pixel_width,
            ideal_pixel_height,
            vertical_offset: ideal_pixel_height * VERTICAL_INFLATION / 2.0,
            horizontal_offset: ideal_pixel_width * HORIZONTAL_INFLATION / 2.0,
        }
    }
}

/// Initial estimate in crop-local coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialEstimate {
    pub branch: EstimateBranch,
    pub corners: Quad<Crop>,
    pub sizing: Option<PlateSizing>,
}

pub fn uses_text_geometry(text: &TextLineCollection<Crop>) -> bool {
    text.char_height >= MIN_CHAR_HEIGHT_PX
        && text.longest_segment_length() > text.char_height * LONG_SEGMENT_FACTOR
}

pub fn estimate_initial_quad(
    text: &TextLineCollection<Crop>,
    crop_width: usize,
    crop_height: usize,
    config: &PlateConfig,
) -> Result<InitialEstimate, GeometryError> {
    if uses_text_geometry(text) {
        let sizing = PlateSizing::from_char_height(text.char_height, config);
        debug!(
            "estimate: text geometry, char_height={:.3} ideal={:.3}x{:.3}",
            text.char_height, sizing.ideal_pixel_width, sizing.ideal_pixel_height
        );
        let corners = offset_quad(text, &sizing)?;
        Ok(InitialEstimate {
            branch: EstimateBranch::TextGeometry,
            corners,
            sizing: Some(sizing),
        })
    } else {
        debug!(
            "estimate: crop expansion, segment={:.3} char_height={:.3}",
            text.longest_segment_length(),
            text.char_height
        );
        Ok(InitialEstimate {
            branch: EstimateBranch::CropExpansion,
            corners: expanded_crop(crop_width, crop_height),
            sizing: None,
        })
    }
}

fn offset_quad(
    text: &TextLineCollection<Crop>,
    sizing: &PlateSizing,
) -> Result<Quad<Crop>, GeometryError> {
    let top = text.center_horizontal_line.parallel_line(sizing.vertical_offset);
    let bottom = text.center_horizontal_line.parallel_line(-sizing.vertical_offset);
    let left = text.center_vertical_line.parallel_line(-sizing.horizontal_offset);
    let right = text.center_vertical_line.parallel_line(sizing.horizontal_offset);

    Ok(Quad::new(
        top.intersection(&left)?,
        top.intersection(&right)?,
        bottom.intersection(&right)?,
        bottom.intersection(&left)?,
    ))
}

/// Crop rectangle grown by [`CROP_EXPANSION`] on each side.
pub fn expanded_crop(width: usize, height: usize) -> Quad<Crop> {
    let w = width as f32;
    let h = height as f32;
    let expand_x = w * CROP_EXPANSION;
    let expand_y = h * CROP_EXPANSION;
    Quad::from_bounds(-expand_x, -expand_y, w + expand_x, h + expand_y)
}
