//! Mapping between the plate candidate crop, the full image and the
//! canonical crop.
//!
//! The crop may have been resized after being cut from the full image, so the
//! crop → full mapping scales by `region / crop` before offsetting by the
//! region origin.

use crate::error::{EdgeFinderError, GeometryError};
use crate::geometry::{Canonical, Crop, Full, LineSegment, Point, Quad, Rect};
use crate::homography::Homography;
use crate::image::warp::warp_perspective;
use crate::image::{GrayImageU8, ImageU8};
use crate::text_lines::TextLine;
use serde::{Deserialize, Serialize};

/// Size of the canonical crop in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropSize {
    pub width: usize,
    pub height: usize,
}

impl CropSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Corners of the image rectangle `(0,0)…(width,height)`.
    pub fn corners(&self) -> Quad<Canonical> {
        Quad::from_bounds(0.0, 0.0, self.width as f32, self.height as f32)
    }
}

/// Coordinate transform for one plate candidate.
pub struct Transformation<'a> {
    full: ImageU8<'a>,
    region: Rect,
    scale_x: f32,
    scale_y: f32,
}

impl<'a> Transformation<'a> {
    pub fn new(full: ImageU8<'a>, crop: &ImageU8<'_>, region: Rect) -> Result<Self, EdgeFinderError> {
        if full.w == 0 || full.h == 0 {
            return Err(EdgeFinderError::InvalidRegion {
                width: full.w,
                height: full.h,
            });
        }
        if crop.w == 0 || crop.h == 0 {
            return Err(EdgeFinderError::InvalidRegion {
                width: crop.w,
                height: crop.h,
            });
        }
        if region.is_empty() {
            return Err(EdgeFinderError::InvalidRegion {
                width: region.width as usize,
                height: region.height as usize,
            });
        }
        Ok(Self {
            full,
            region,
            scale_x: region.width as f32 / crop.w as f32,
            scale_y: region.height as f32 / crop.h as f32,
        })
    }

    #[inline]
    pub fn crop_to_full(&self, p: Point<Crop>) -> Point<Full> {
        Point::new(
            p.x * self.scale_x + self.region.x as f32,
            p.y * self.scale_y + self.region.y as f32,
        )
    }

    #[inline]
    pub fn full_to_crop(&self, p: Point<Full>) -> Point<Crop> {
        Point::new(
            (p.x - self.region.x as f32) / self.scale_x,
            (p.y - self.region.y as f32) / self.scale_y,
        )
    }

    pub fn crop_to_full_quad(&self, quad: &Quad<Crop>) -> Quad<Full> {
        quad.map(|p| self.crop_to_full(p))
    }

    /// Canonical crop size that keeps the aspect ratio of `area` and fits
    /// within `template`.
    ///
    /// Width and height are measured between the midpoints of opposite edges.
    pub fn crop_size(&self, area: &Quad<Full>, template: CropSize) -> Result<CropSize, GeometryError> {
        let left = LineSegment::new(area.bottom_left(), area.top_left());
        let right = LineSegment::new(area.bottom_right(), area.top_right());
        let top = area.top_edge();
        let bottom = area.bottom_edge();
        let w = left.midpoint().distance(&right.midpoint());
        let h = bottom.midpoint().distance(&top.midpoint());
        if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
            return Err(GeometryError::DegenerateQuad);
        }
        let aspect = w / h;
        let mut width = template.width as f32;
        let mut height = (width / aspect).round();
        if height > template.height as f32 {
            height = template.height as f32;
            width = (height * aspect).round();
        }
        if width < 1.0 || height < 1.0 {
            return Err(GeometryError::DegenerateQuad);
        }
        Ok(CropSize::new(width as usize, height as usize))
    }

    /// Matrix taking `area` onto the corners of a `size` image.
    pub fn canonical_matrix(
        &self,
        area: &Quad<Full>,
        size: CropSize,
    ) -> Result<Homography<Full, Canonical>, GeometryError> {
        Homography::from_quads(area, &size.corners())
    }

    /// Matrix taking the corners of a `size` image back onto `area`.
    pub fn inverse_canonical_matrix(
        &self,
        size: CropSize,
        area: &Quad<Full>,
    ) -> Result<Homography<Canonical, Full>, GeometryError> {
        Homography::from_quads(&size.corners(), area)
    }

    /// Resample the full image into the canonical crop.
    pub fn resample(
        &self,
        size: CropSize,
        h: &Homography<Full, Canonical>,
    ) -> Result<GrayImageU8, GeometryError> {
        warp_perspective(&self.full, h, size.width, size.height)
    }

    /// Carry a crop-local point into canonical coordinates.
    pub fn crop_to_canonical(
        &self,
        p: Point<Crop>,
        h: &Homography<Full, Canonical>,
    ) -> Result<Point<Canonical>, GeometryError> {
        h.apply(self.crop_to_full(p))
    }

    /// Carry a crop-local text line into canonical coordinates.
    pub fn remap_text_line(
        &self,
        line: &TextLine<Crop>,
        h: &Homography<Full, Canonical>,
    ) -> Result<TextLine<Canonical>, GeometryError> {
        line.try_map(|p| self.crop_to_canonical(p, h))
    }
}
