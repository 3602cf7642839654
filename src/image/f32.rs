//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Used for gradient buffers in the refiner. Intensities converted from 8-bit
//! images are scaled to [0, 1].
use super::{ImageU8, ImageView, ImageViewMut};

#[derive(Clone, Debug)]
pub struct ImageF32 {
    pub w: usize,
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Convert an 8-bit view, scaling intensities to [0, 1].
    pub fn from_u8(src: &ImageU8<'_>) -> Self {
        let mut out = Self::new(src.w, src.h);
        for y in 0..src.h {
            let row_in = src.row(y);
            let row_out = out.row_mut(y);
            for (o, &v) in row_out.iter_mut().zip(row_in) {
                *o = v as f32 * (1.0 / 255.0);
            }
        }
        out
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Bilinear sample; `None` when the 2×2 footprint leaves the image.
    #[inline]
    pub fn sample_bilinear(&self, x: f32, y: f32) -> Option<f32> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let max_x = self.w.checked_sub(1)? as f32;
        let max_y = self.h.checked_sub(1)? as f32;
        if x >= max_x || y >= max_y {
            return None;
        }
        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let tx = x - x0 as f32;
        let ty = y - y0 as f32;
        let base = self.idx(x0, y0);
        let v00 = self.data[base];
        let v10 = self.data[base + 1];
        let v01 = self.data[base + self.stride];
        let v11 = self.data[base + self.stride + 1];
        let top = v00 * (1.0 - tx) + v10 * tx;
        let bottom = v01 * (1.0 - tx) + v11 * tx;
        Some(top * (1.0 - ty) + bottom * ty)
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[f32]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }

    #[inline]
    fn as_mut_slice(&mut self) -> Option<&mut [f32]> {
        if self.stride == self.w {
            Some(&mut self.data[..self.w * self.h])
        } else {
            None
        }
    }
}
