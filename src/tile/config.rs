//! Tile construction configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bases::BaseSettings;
use crate::calibration::{CalibrationMode, CoordinateCalibrator};
use crate::city::{CitySettings, GridLayout};
use crate::core::Result;
use crate::heightmap::{ElevationRange, HeightmapDecoder};
use crate::placement::PlacementSettings;
use crate::roads::RoadSettings;
use crate::terrain::ElevationAdjust;

/// Orientation search settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    /// Skip the search and use this mode (0..=7)
    pub forced_mode: Option<CalibrationMode>,
    /// Normalized error accepted as a match
    pub tolerance: f64,
    /// Mode used when the scene has no reference placement
    pub fallback_mode: CalibrationMode,
    /// Refit the elevation range from road control points
    pub auto_height_fit: bool,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            forced_mode: None,
            tolerance: 1e-3,
            fallback_mode: CalibrationMode::FALLBACK,
            auto_height_fit: false,
        }
    }
}

impl CalibrationSettings {
    pub fn calibrator(&self) -> CoordinateCalibrator {
        CoordinateCalibrator {
            tolerance: self.tolerance,
            fallback: self.fallback_mode,
            forced: self.forced_mode,
        }
    }
}

/// Elevation mapping overrides.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationSettings {
    /// Use this range regardless of scene, sidecar or fit
    pub range_override: Option<ElevationRange>,
    pub post_scale: f64,
    pub post_offset: f64,
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            range_override: None,
            post_scale: 1.0,
            post_offset: 0.0,
        }
    }
}

impl ElevationSettings {
    pub fn adjust(&self) -> ElevationAdjust {
        ElevationAdjust {
            scale: self.post_scale,
            offset: self.post_offset,
        }
    }
}

/// Everything that tunes how a tile is built and queried.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub heightmap: HeightmapDecoder,
    pub calibration: CalibrationSettings,
    pub elevation: ElevationSettings,
    pub grid: GridLayout,
    pub bases: BaseSettings,
    pub city: CitySettings,
    pub roads: RoadSettings,
    pub placement: PlacementSettings,
}

impl TileConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
