/// Axis-aligned bright plate with a dark text band on a dark background.
#[derive(Clone, Copy, Debug)]
pub struct PlateScene {
    pub width: usize,
    pub height: usize,
    /// Plate bounds `[x0, y0, x1, y1)` in pixels.
    pub plate: [usize; 4],
    /// Text band bounds `[x0, y0, x1, y1)` in pixels.
    pub text: [usize; 4],
}

impl PlateScene {
    /// Renders the scene: background 30, plate 220, text 40.
    pub fn render_u8(&self) -> Vec<u8> {
        assert!(
            self.width > 0 && self.height > 0,
            "image dimensions must be positive"
        );
        let inside = |b: &[usize; 4], x: usize, y: usize| x >= b[0] && x < b[2] && y >= b[1] && y < b[3];

        let mut img = vec![30u8; self.width * self.height];
        for y in 0..self.height {
            for x in 0..self.width {
                if inside(&self.text, x, y) {
                    img[y * self.width + x] = 40;
                } else if inside(&self.plate, x, y) {
                    img[y * self.width + x] = 220;
                }
            }
        }
        img
    }
}

/// Copies the `w × h` window at `(x0, y0)` out of a row-major buffer.
pub fn crop_u8(data: &[u8], stride: usize, x0: usize, y0: usize, w: usize, h: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(w * h);
    for y in y0..y0 + h {
        out.extend_from_slice(&data[y * stride + x0..y * stride + x0 + w]);
    }
    out
}

/// Nearest-neighbour resize, used to simulate a rescaled plate crop.
pub fn resize_nearest_u8(data: &[u8], w: usize, h: usize, out_w: usize, out_h: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(out_w * out_h);
    for y in 0..out_h {
        let sy = (y * h / out_h).min(h - 1);
        for x in 0..out_w {
            let sx = (x * w / out_w).min(w - 1);
            out.push(data[sy * w + sx]);
        }
    }
    out
}
