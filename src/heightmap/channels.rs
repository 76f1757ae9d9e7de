//! Decoded heightmap channels plus the physical metrics needed to read them

use serde::{Deserialize, Serialize};

use super::raster::Raster;
use crate::core::{Error, Result};

/// World elevation range that normalized samples map onto.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElevationRange {
    pub min: f64,
    pub max: f64,
}

impl ElevationRange {
    pub const DEFAULT: Self = Self { min: -80.0, max: 6000.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Normalized sample → world elevation.
    pub fn denormalize(&self, r: f64) -> f64 {
        r * (self.max - self.min) + self.min
    }

    /// World elevation → normalized sample.
    pub fn normalize(&self, y: f64) -> f64 {
        (y - self.min) / (self.max - self.min)
    }
}

impl Default for ElevationRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Elevation and density channels of one tile.
#[derive(Clone, Debug)]
pub struct HeightmapChannels {
    /// Normalized elevation in [0, 1]
    pub elevation: Raster,
    /// Normalized city density in [0, 1]
    pub density: Raster,
    /// Physical edge length of the tile in world units
    pub tile_size: f64,
    /// Elevation range the elevation channel maps onto
    pub range: ElevationRange,
}

impl HeightmapChannels {
    /// Assemble channels, checking that both rasters agree in size and are
    /// large enough to interpolate.
    pub fn new(elevation: Raster, density: Raster, tile_size: f64, range: ElevationRange) -> Result<Self> {
        if elevation.width() != density.width() || elevation.height() != density.height() {
            return Err(Error::InvalidAsset(format!(
                "elevation {}x{} and density {}x{} differ in size",
                elevation.width(),
                elevation.height(),
                density.width(),
                density.height()
            )));
        }
        if elevation.width() < 2 || elevation.height() < 2 {
            return Err(Error::InvalidAsset("heightmap must be at least 2x2".into()));
        }
        if !(tile_size > 0.0) {
            return Err(Error::InvalidAsset(format!("tile size must be positive, got {}", tile_size)));
        }
        Ok(Self { elevation, density, tile_size, range })
    }

    pub fn width(&self) -> usize {
        self.elevation.width()
    }

    pub fn height(&self) -> usize {
        self.elevation.height()
    }
}
