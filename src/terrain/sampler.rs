//! Natural terrain elevation from the calibrated heightmap

use crate::calibration::{Calibration, CalibrationMode};
use crate::core::types::DVec2;
use crate::heightmap::{ElevationRange, Raster};

/// Post-processing applied to denormalized elevation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationAdjust {
    pub scale: f64,
    pub offset: f64,
}

impl Default for ElevationAdjust {
    fn default() -> Self {
        Self { scale: 1.0, offset: 0.0 }
    }
}

/// Reads world elevation from the elevation raster under the tile's
/// calibrated orientation. Ignores base flattening.
#[derive(Clone, Debug)]
pub struct HeightSampler {
    elevation: Raster,
    calibration: Calibration,
    tile_size: f64,
    range: ElevationRange,
    adjust: ElevationAdjust,
}

impl HeightSampler {
    pub fn new(
        elevation: Raster,
        calibration: Calibration,
        tile_size: f64,
        range: ElevationRange,
        adjust: ElevationAdjust,
    ) -> Self {
        Self {
            elevation,
            calibration,
            tile_size,
            range,
            adjust,
        }
    }

    pub fn mode(&self) -> CalibrationMode {
        self.calibration.mode
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn range(&self) -> ElevationRange {
        self.range
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn elevation(&self) -> &Raster {
        &self.elevation
    }

    /// Fractional pixel for world (x, z). Not clamped.
    pub fn world_to_pixel(&self, x: f64, z: f64) -> DVec2 {
        self.mode().uv_to_pixel(
            x / self.tile_size,
            z / self.tile_size,
            self.elevation.width(),
            self.elevation.height(),
        )
    }

    /// World (x, z) of a fractional pixel.
    pub fn pixel_to_world(&self, px: f64, py: f64) -> DVec2 {
        self.mode()
            .pixel_to_uv(px, py, self.elevation.width(), self.elevation.height())
            * self.tile_size
    }

    /// Raw normalized sample at world (x, z), clamped to the raster edge.
    pub fn sample_normalized(&self, x: f64, z: f64) -> f64 {
        let p = self.world_to_pixel(x, z);
        self.elevation.sample_bilinear(p.x, p.y) as f64
    }

    /// Elevation at world (x, z) in meters, never below 0.
    pub fn natural_height(&self, x: f64, z: f64) -> f64 {
        let h = self.range.denormalize(self.sample_normalized(x, z));
        let h = h * self.adjust.scale + self.adjust.offset;
        h.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_sampler(mode: CalibrationMode) -> HeightSampler {
        // Rises along pixel x from 0 to 1
        let raster = Raster::from_fn(5, 5, |x, _| x as f32 / 4.0);
        HeightSampler::new(
            raster,
            Calibration::forced(mode),
            4000.0,
            ElevationRange::new(0.0, 1000.0),
            ElevationAdjust::default(),
        )
    }

    #[test]
    fn test_natural_height_interpolates() {
        let s = ramp_sampler(CalibrationMode::Identity);
        assert!((s.natural_height(0.0, 0.0) - 0.0).abs() < 1e-3);
        assert!((s.natural_height(2000.0, 1234.0) - 500.0).abs() < 1e-3);
        assert!((s.natural_height(1500.0, 0.0) - 375.0).abs() < 1e-3);
    }

    #[test]
    fn test_outside_tile_clamps_to_edge() {
        let s = ramp_sampler(CalibrationMode::Identity);
        assert!((s.natural_height(-50_000.0, 0.0)).abs() < 1e-3);
        assert!((s.natural_height(50_000.0, 0.0) - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_never_below_zero() {
        let raster = Raster::from_fn(3, 3, |_, _| 0.0);
        let s = HeightSampler::new(
            raster,
            Calibration::forced(CalibrationMode::FlipY),
            3000.0,
            ElevationRange::new(-80.0, 6000.0),
            ElevationAdjust::default(),
        );
        assert_eq!(s.natural_height(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_adjust_applied_before_clamp() {
        let raster = Raster::from_fn(3, 3, |_, _| 0.5);
        let s = HeightSampler::new(
            raster,
            Calibration::forced(CalibrationMode::Identity),
            3000.0,
            ElevationRange::new(0.0, 100.0),
            ElevationAdjust { scale: 2.0, offset: -120.0 },
        );
        assert_eq!(s.natural_height(10.0, 10.0), 0.0);
    }

    #[test]
    fn test_pixel_roundtrip_every_mode() {
        for mode in CalibrationMode::ALL {
            let s = ramp_sampler(mode);
            let p = s.world_to_pixel(1234.5, 3210.0);
            let w = s.pixel_to_world(p.x, p.y);
            assert!((w - DVec2::new(1234.5, 3210.0)).length() < 1e-6, "mode {}", mode);
        }
    }
}
