//! Orientation discovery from a reference point of known elevation

use serde::{Deserialize, Serialize};

use super::mode::CalibrationMode;
use crate::core::types::DVec3;
use crate::heightmap::{ElevationRange, Raster};

/// How the active mode was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationOutcome {
    /// Operator override, no search performed
    Forced,
    /// A mode reproduced the reference within tolerance
    Exact,
    /// No mode was within tolerance; the smallest error won
    Closest,
    /// No usable reference point; the default mode was used
    Fallback,
}

/// Result of calibration. Fixed for the lifetime of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub mode: CalibrationMode,
    pub outcome: CalibrationOutcome,
    /// Absolute normalized error at the reference for the chosen mode
    pub error: Option<f64>,
}

impl Calibration {
    pub fn forced(mode: CalibrationMode) -> Self {
        Self { mode, outcome: CalibrationOutcome::Forced, error: None }
    }

    /// True when the mode was not confirmed by the reference point.
    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, CalibrationOutcome::Closest | CalibrationOutcome::Fallback)
    }
}

/// Sample `elevation` at a tile UV under `mode`, bilinearly, clamped to the
/// raster.
pub fn sample_uv(elevation: &Raster, mode: CalibrationMode, u: f64, v: f64) -> f32 {
    let p = mode.uv_to_pixel(u, v, elevation.width(), elevation.height());
    elevation.sample_bilinear(p.x, p.y)
}

/// Searches the 8 orientation conventions for the one that reproduces a
/// reference elevation.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateCalibrator {
    /// Accept a mode when its normalized error is at most this
    pub tolerance: f64,
    /// Mode used when there is no reference point
    pub fallback: CalibrationMode,
    /// Skip the search and use this mode
    pub forced: Option<CalibrationMode>,
}

impl Default for CoordinateCalibrator {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            fallback: CalibrationMode::FALLBACK,
            forced: None,
        }
    }
}

impl CoordinateCalibrator {
    /// Pick the active mode.
    ///
    /// `reference` is a world position whose Y is the known ground
    /// elevation at its (x, z). Modes are tried in index order and the
    /// first within tolerance wins, so ties resolve the same way on every
    /// load.
    pub fn calibrate(
        &self,
        elevation: &Raster,
        tile_size: f64,
        range: ElevationRange,
        reference: Option<DVec3>,
    ) -> Calibration {
        if let Some(mode) = self.forced {
            log::info!("Coordinate transform mode forced: {}", mode);
            return Calibration::forced(mode);
        }

        let Some(reference) = reference.filter(|r| r.is_finite()) else {
            log::warn!(
                "Calibration failed (no reference point). Falling back to mode {}",
                self.fallback
            );
            return Calibration {
                mode: self.fallback,
                outcome: CalibrationOutcome::Fallback,
                error: None,
            };
        };

        let expected = range.normalize(reference.y);
        let u = reference.x / tile_size;
        let v = reference.z / tile_size;

        let mut best: Option<(CalibrationMode, f64)> = None;
        for mode in CalibrationMode::ALL {
            let found = sample_uv(elevation, mode, u, v) as f64;
            let diff = (found - expected).abs();
            if diff <= self.tolerance {
                log::debug!("Calibration matched mode {} (error {:.6})", mode, diff);
                return Calibration {
                    mode,
                    outcome: CalibrationOutcome::Exact,
                    error: Some(diff),
                };
            }
            if best.is_none_or(|(_, d)| diff < d) {
                best = Some((mode, diff));
            }
        }

        match best {
            Some((mode, diff)) => {
                log::warn!(
                    "Calibration found no exact match; using closest mode {} (error {:.6})",
                    mode,
                    diff
                );
                Calibration {
                    mode,
                    outcome: CalibrationOutcome::Closest,
                    error: Some(diff),
                }
            }
            None => {
                log::warn!(
                    "Calibration failed (no comparable mode). Falling back to mode {}",
                    self.fallback
                );
                Calibration {
                    mode: self.fallback,
                    outcome: CalibrationOutcome::Fallback,
                    error: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Raster whose value is unique per pixel so only one orientation
    /// reproduces a given off-diagonal sample.
    fn asymmetric_raster() -> Raster {
        Raster::from_fn(5, 5, |x, y| (x as f32 * 5.0 + y as f32) / 24.0)
    }

    #[test]
    fn test_each_mode_is_recoverable() {
        let raster = asymmetric_raster();
        let range = ElevationRange::new(0.0, 1000.0);
        let tile = 4000.0;
        let (u, v) = (0.25, 0.75);
        for mode in CalibrationMode::ALL {
            let r = sample_uv(&raster, mode, u, v) as f64;
            let reference = DVec3::new(u * tile, range.denormalize(r), v * tile);
            let cal = CoordinateCalibrator::default().calibrate(&raster, tile, range, Some(reference));
            assert_eq!(cal.outcome, CalibrationOutcome::Exact);
            // A different mode may alias the same pixel; it must then give the same value
            let found = sample_uv(&raster, cal.mode, u, v) as f64;
            assert!((found - r).abs() <= 1e-3, "mode {} resolved to {}", mode, cal.mode);
        }
    }

    #[test]
    fn test_unique_mode_selected() {
        let raster = asymmetric_raster();
        let range = ElevationRange::new(0.0, 1000.0);
        // Every mode lands on a different pixel for this uv
        let (u, v) = (0.0, 0.25);
        let r = sample_uv(&raster, CalibrationMode::FlipX, u, v) as f64;
        let reference = DVec3::new(u * 4000.0, range.denormalize(r), v * 4000.0);
        let cal = CoordinateCalibrator::default().calibrate(&raster, 4000.0, range, Some(reference));
        assert_eq!(cal.mode, CalibrationMode::FlipX);
    }

    #[test]
    fn test_no_reference_falls_back() {
        let raster = asymmetric_raster();
        let cal = CoordinateCalibrator::default().calibrate(&raster, 4000.0, ElevationRange::DEFAULT, None);
        assert_eq!(cal.mode, CalibrationMode::FlipY);
        assert_eq!(cal.outcome, CalibrationOutcome::Fallback);
        assert!(cal.is_degraded());
    }

    #[test]
    fn test_closest_mode_when_nothing_matches() {
        let raster = asymmetric_raster();
        let range = ElevationRange::new(0.0, 1000.0);
        // Above every sample: the brightest reachable pixel wins
        let reference = DVec3::new(4000.0, 5000.0, 4000.0);
        let cal = CoordinateCalibrator::default().calibrate(&raster, 4000.0, range, Some(reference));
        assert_eq!(cal.outcome, CalibrationOutcome::Closest);
        assert_eq!(sample_uv(&raster, cal.mode, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_forced_mode_skips_search() {
        let calibrator = CoordinateCalibrator {
            forced: Some(CalibrationMode::Transpose),
            ..Default::default()
        };
        let cal = calibrator.calibrate(&asymmetric_raster(), 4000.0, ElevationRange::DEFAULT, None);
        assert_eq!(cal, Calibration::forced(CalibrationMode::Transpose));
    }
}
