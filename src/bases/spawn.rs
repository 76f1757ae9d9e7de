//! Named base-local points (hangars, helipads, runway ends) per base type

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::registry::Base;
use crate::core::Result;
use crate::core::types::DVec3;

/// A point in base-local space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub name: String,
    /// (dx, dz) in meters, relative to the base origin
    pub offset: [f64; 2],
    #[serde(default)]
    pub yaw_offset: f64,
}

/// A spawn point resolved against a concrete base.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldSpawn {
    pub name: String,
    pub position: DVec3,
    pub yaw: f64,
}

/// Spawn points keyed by base prefab type (e.g. `airbase1`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpawnPointTable {
    points: BTreeMap<String, Vec<SpawnPoint>>,
}

impl SpawnPointTable {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn insert(&mut self, prefab_type: impl Into<String>, point: SpawnPoint) {
        self.points.entry(prefab_type.into()).or_default().push(point);
    }

    pub fn points_for(&self, prefab_type: &str) -> &[SpawnPoint] {
        self.points.get(prefab_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Points whose name contains `category`, ignoring case.
    pub fn by_category<'a>(&'a self, prefab_type: &str, category: &str) -> impl Iterator<Item = &'a SpawnPoint> + 'a {
        let needle = category.to_lowercase();
        self.points_for(prefab_type)
            .iter()
            .filter(move |p| p.name.to_lowercase().contains(&needle))
    }

    /// Every point of `base`'s type in world space.
    pub fn world_spawns(&self, base: &Base) -> Vec<WorldSpawn> {
        self.points_for(&base.prefab_type)
            .iter()
            .map(|p| resolve(base, p))
            .collect()
    }

    /// The `index`-th point of a category, wrapping around. A base with no
    /// matching points yields its own center and yaw.
    pub fn select(&self, base: &Base, category: &str, index: usize) -> WorldSpawn {
        let matching: Vec<&SpawnPoint> = self.by_category(&base.prefab_type, category).collect();
        if matching.is_empty() {
            return WorldSpawn {
                name: base.name.clone(),
                position: DVec3::new(base.position.x, base.flatten_height, base.position.z),
                yaw: base.yaw(),
            };
        }
        resolve(base, matching[index % matching.len()])
    }
}

fn resolve(base: &Base, point: &SpawnPoint) -> WorldSpawn {
    let (position, yaw) = base.local_to_world(point.offset[0], point.offset[1], point.yaw_offset);
    WorldSpawn {
        name: point.name.clone(),
        position,
        yaw,
    }
}
