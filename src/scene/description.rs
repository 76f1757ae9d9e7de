//! Parsed scene description: map metadata, authored placements and roads
//!
//! Individual placements and road curves are parsed one at a time. A
//! malformed entry is logged and dropped so the rest of the scene still
//! loads.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

use super::meta::HeightHints;
use crate::core::types::DVec3;
use crate::core::Result;
use crate::heightmap::ElevationRange;

/// Terrain settings keys that may carry the top of the elevation range.
const MAX_HEIGHT_KEYS: [&str; 3] = ["maxMtnHeight", "maxHeight", "hm_maxHeight"];
/// Terrain settings keys that may carry the bottom of the elevation range.
const MIN_HEIGHT_KEYS: [&str; 4] = ["minMtnHeight", "minHeight", "seaLevel", "hm_minHeight"];

/// One authored object in the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefabPlacement {
    #[serde(default)]
    pub id: Option<i64>,
    /// Prefab type tag, e.g. `airbase1` or `hotel1`
    pub prefab: String,
    /// World position
    pub global_pos: [f64; 3],
    /// (pitch, yaw, roll) in degrees
    pub rotation: [f64; 3],
    /// Display name for bases
    #[serde(default)]
    pub base_name: Option<String>,
}

impl PrefabPlacement {
    pub fn position(&self) -> DVec3 {
        DVec3::from_array(self.global_pos)
    }

    pub fn rotation(&self) -> DVec3 {
        DVec3::from_array(self.rotation)
    }
}

/// Authored road curve: start, middle control and end points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadCurve {
    pub s: [f64; 3],
    pub m: [f64; 3],
    pub e: [f64; 3],
}

impl RoadCurve {
    pub fn control_points(&self) -> [DVec3; 3] {
        [
            DVec3::from_array(self.s),
            DVec3::from_array(self.m),
            DVec3::from_array(self.e),
        ]
    }
}

/// Scene description for one tile.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    /// Tile edge length in chunks. Required.
    #[serde(default)]
    pub map_size: Option<u32>,
    #[serde(default, rename = "hm_minHeight")]
    pub hm_min_height: Option<f64>,
    #[serde(default, rename = "hm_maxHeight")]
    pub hm_max_height: Option<f64>,
    /// Free-form terrain settings; values may be numbers or numeric strings
    #[serde(default)]
    pub terrain_settings: BTreeMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub static_prefabs: Vec<PrefabPlacement>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub bezier_roads: Vec<RoadCurve>,
}

/// Accepts a list, a single object or null, and keeps only the entries
/// that parse as `T`.
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let items = match raw {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(v) => out.push(v),
            Err(e) => log::warn!("Skipping malformed scene entry #{}: {}", i, e),
        }
    }
    Ok(out)
}

fn settings_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl SceneDescription {
    /// Parse a scene from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// First present terrain setting among `keys` that reads as a number.
    fn first_setting(&self, keys: &[&str]) -> Option<f64> {
        keys.iter()
            .filter_map(|k| self.terrain_settings.get(*k))
            .find_map(settings_number)
    }

    /// Whether the scene states its own elevation range in any form.
    pub fn has_explicit_range(&self) -> bool {
        self.hm_min_height.is_some() || self.hm_max_height.is_some() || !self.terrain_settings.is_empty()
    }

    /// Resolve the elevation range.
    ///
    /// Defaults, then `hm_*` fields, then terrain settings. Sidecar hints
    /// only fill in when the scene states no range at all.
    pub fn elevation_range(&self, hints: Option<&HeightHints>) -> ElevationRange {
        let mut range = ElevationRange::DEFAULT;
        if let Some(max) = self.hm_max_height {
            range.max = max;
        }
        if let Some(min) = self.hm_min_height {
            range.min = min;
        }
        if let Some(max) = self.first_setting(&MAX_HEIGHT_KEYS) {
            range.max = max;
        }
        if let Some(min) = self.first_setting(&MIN_HEIGHT_KEYS) {
            range.min = min;
        }

        if let Some(hints) = hints {
            if self.hm_min_height.is_none() && self.terrain_settings.is_empty() {
                if let Some(min) = hints.min_height {
                    range.min = min;
                }
            }
            if self.hm_max_height.is_none() && self.terrain_settings.is_empty() {
                if let Some(max) = hints.max_height {
                    range.max = max;
                }
            }
        }
        range
    }

    /// Reference point for orientation calibration: the first authored
    /// placement, whose Y sits on the ground.
    pub fn reference_point(&self) -> Option<DVec3> {
        self.static_prefabs.first().map(PrefabPlacement::position)
    }
}
