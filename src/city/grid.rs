//! City grid addressing: the renderer's chunked pixel convention
//!
//! Each chunk of `chunk_size` meters is divided into `pixels_per_chunk`
//! pixels per side. Pixel (px, py) has its corner at world
//! (px · pitch, py · pitch) with x along columns and z along rows.

use serde::{Deserialize, Serialize};

use crate::calibration::rounding::{decimal_floor, decimal_round_half_even};
use crate::calibration::{CalibrationMode, GridRounding};
use crate::core::types::DVec2;

/// Chunk geometry shared by the tile size and the city grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    /// Chunk edge length in meters
    pub chunk_size: f64,
    /// Pixels per chunk edge
    pub pixels_per_chunk: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            chunk_size: 3072.0,
            pixels_per_chunk: 20,
        }
    }
}

impl GridLayout {
    /// World meters per pixel.
    pub fn meters_per_pixel(&self) -> f64 {
        self.chunk_size / self.pixels_per_chunk as f64
    }

    /// Tile edge length for a map of `map_size` chunks.
    pub fn tile_size(&self, map_size: u32) -> f64 {
        map_size as f64 * self.chunk_size
    }

    /// World (x, z) of a pixel's corner, computed chunk by chunk.
    pub fn pixel_to_world(&self, px: i64, py: i64) -> DVec2 {
        let per = self.pixels_per_chunk as i64;
        let chunk_x = px.div_euclid(per);
        let chunk_y = py.div_euclid(per);
        let local_x = (px - chunk_x * per) as f64 * self.meters_per_pixel();
        let local_z = (py - chunk_y * per) as f64 * self.meters_per_pixel();
        DVec2::new(
            chunk_x as f64 * self.chunk_size + local_x,
            chunk_y as f64 * self.chunk_size + local_z,
        )
    }

    /// Pixel containing world (x, z), floored chunk by chunk.
    ///
    /// `None` when the coordinate is not finite or its pixel index does
    /// not fit in an `i64`.
    pub fn world_to_pixel_floor(&self, x: f64, z: f64) -> Option<(i64, i64)> {
        let axis = |w: f64| -> Option<i64> {
            let chunk = decimal_floor(w / self.chunk_size);
            if !chunk.is_finite() || chunk.abs() >= i64::MAX as f64 {
                return None;
            }
            let local = w - chunk * self.chunk_size;
            let pixel = decimal_floor(local / self.meters_per_pixel());
            (chunk as i64)
                .checked_mul(self.pixels_per_chunk as i64)?
                .checked_add(pixel as i64)
        };
        Some((axis(x)?, axis(z)?))
    }
}

/// World → city pixel addressing under a chosen rounding strategy.
#[derive(Clone, Copy, Debug)]
pub struct GridAddressing {
    pub layout: GridLayout,
    pub rounding: GridRounding,
    pub mode: CalibrationMode,
    pub width: usize,
    pub height: usize,
    pub tile_size: f64,
}

impl GridAddressing {
    pub fn meters_per_pixel(&self) -> f64 {
        self.layout.meters_per_pixel()
    }

    /// City pixel for world (x, z), `None` for coordinates off any
    /// addressable pixel.
    pub fn world_to_pixel(&self, x: f64, z: f64) -> Option<(i64, i64)> {
        match self.rounding {
            GridRounding::ChunkFloor => self.layout.world_to_pixel_floor(x, z),
            GridRounding::CalibratedHalfEven => {
                let p = self.mode.uv_to_pixel(x / self.tile_size, z / self.tile_size, self.width, self.height);
                if !p.is_finite() {
                    return None;
                }
                let px = decimal_round_half_even(p.x).clamp(0.0, (self.width - 1) as f64);
                let py = decimal_round_half_even(p.y).clamp(0.0, (self.height - 1) as f64);
                Some((px as i64, py as i64))
            }
        }
    }

    /// World (x, z) of a pixel's corner.
    pub fn pixel_to_world(&self, px: i64, py: i64) -> DVec2 {
        self.layout.pixel_to_world(px, py)
    }
}
