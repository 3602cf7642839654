//! Perspective resampling.
//!
//! Output pixel `(x, y)` takes the bilinear source intensity at
//! `H⁻¹·(x, y)`; samples that fall outside the source are black. Rows are
//! filled in parallel.
use super::{GrayImageU8, ImageU8};
use crate::error::GeometryError;
use crate::geometry::Space;
use crate::homography::Homography;
use nalgebra::Vector3;
use rayon::prelude::*;

/// Resample `src` (in space `From`) into a `width × height` image in space
/// `To`, where `h` maps `From` into `To`.
pub fn warp_perspective<From: Space, To: Space>(
    src: &ImageU8<'_>,
    h: &Homography<From, To>,
    width: usize,
    height: usize,
) -> Result<GrayImageU8, GeometryError> {
    let inv = h.inverse()?.matrix;
    let mut out = GrayImageU8::zeros(width, height);
    if width == 0 || height == 0 {
        return Ok(out);
    }
    out.data_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                let v = inv * Vector3::new(x as f64, y as f64, 1.0);
                let w = v[2];
                if w.abs() <= f64::EPSILON {
                    continue;
                }
                let sx = (v[0] / w) as f32;
                let sy = (v[1] / w) as f32;
                if let Some(val) = src.sample_bilinear(sx, sy) {
                    *px = val.round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    Ok(out)
}
