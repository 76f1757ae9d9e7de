//! Dense single-channel raster of normalized samples

use crate::core::{Error, Result};

/// Row-major 2D array of `f32` samples. Row 0 is the first image row after
/// any flip the decoder applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Raster {
    /// Create a raster from row-major samples.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidAsset(format!("empty raster {}x{}", width, height)));
        }
        if data.len() != width * height {
            return Err(Error::InvalidAsset(format!(
                "raster {}x{} needs {} samples, got {}",
                width,
                height,
                width * height,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Build a raster by evaluating `f(px, py)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for py in 0..height {
            for px in 0..width {
                data.push(f(px, py));
            }
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample at integer pixel (column `px`, row `py`). Panics out of range.
    pub fn get(&self, px: usize, py: usize) -> f32 {
        self.data[py * self.width + px]
    }

    /// Sample at a signed pixel, `None` outside the raster.
    pub fn try_get(&self, px: i64, py: i64) -> Option<f32> {
        if px < 0 || py < 0 || px as usize >= self.width || py as usize >= self.height {
            return None;
        }
        Some(self.get(px as usize, py as usize))
    }

    /// Sample with both coordinates wrapped into the raster.
    pub fn get_wrapped(&self, px: i64, py: i64) -> f32 {
        let x = px.rem_euclid(self.width as i64) as usize;
        let y = py.rem_euclid(self.height as i64) as usize;
        self.get(x, y)
    }

    /// Reverse row order.
    pub fn flipped_vertical(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact(self.width).rev() {
            data.extend_from_slice(row);
        }
        Self { width: self.width, height: self.height, data }
    }

    /// Bilinear sample at a fractional pixel position.
    ///
    /// Coordinates are clamped to the raster first, so edges extend
    /// outward. Interpolation runs in `f64` and the result is rounded to
    /// the raster's `f32` precision.
    pub fn sample_bilinear(&self, px: f64, py: f64) -> f32 {
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        let px = if px.is_nan() { 0.0 } else { px.clamp(0.0, max_x) };
        let py = if py.is_nan() { 0.0 } else { py.clamp(0.0, max_y) };

        let x0 = px.floor() as usize;
        let y0 = py.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let wx = px - x0 as f64;
        let wy = py - y0 as f64;

        let h00 = self.get(x0, y0) as f64;
        let h10 = self.get(x1, y0) as f64;
        let h01 = self.get(x0, y1) as f64;
        let h11 = self.get(x1, y1) as f64;

        let top = h00 * (1.0 - wx) + h10 * wx;
        let bottom = h01 * (1.0 - wx) + h11 * wx;
        (top * (1.0 - wy) + bottom * wy) as f32
    }
}
