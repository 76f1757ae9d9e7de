//! Surface-bounds lookup and city layout database
//!
//! Both are read-only resources shared by every tile.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::math::Aabb;

fn unnamed() -> String {
    "N/A".to_string()
}

/// One surface of a prefab, in prefab-local space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    #[serde(default = "unnamed")]
    pub go_name: String,
    /// `[xmin, xmax, ymin, ymax, zmin, zmax]`
    pub bounds: [f64; 6],
    #[serde(default)]
    pub is_spawnable: bool,
}

impl SurfaceSpec {
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_extents(self.bounds)
    }
}

/// Surface bounds per prefab key (e.g. `bases/airbase1.prefab`).
///
/// Keys are kept sorted so that name lookups by file stem resolve the same
/// way on every load.
#[derive(Clone, Debug, Default)]
pub struct SurfaceCatalog {
    entries: BTreeMap<String, Vec<SurfaceSpec>>,
    by_stem: HashMap<String, String>,
}

/// File name of `key` without directories or extension.
fn key_stem(key: &str) -> &str {
    let name = key.rsplit(['/', '\\']).next().unwrap_or(key);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

impl SurfaceCatalog {
    pub fn new(entries: BTreeMap<String, Vec<SurfaceSpec>>) -> Self {
        let by_stem = entries
            .keys()
            .map(|k| (key_stem(k).to_string(), k.clone()))
            .collect();
        Self { entries, by_stem }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Surfaces for an exact database key.
    pub fn get(&self, key: &str) -> Option<&[SurfaceSpec]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Surfaces for a prefab referenced by bare name (the key's file stem).
    pub fn by_prefab_name(&self, name: &str) -> Option<&[SurfaceSpec]> {
        self.by_stem.get(name).and_then(|key| self.get(key))
    }
}

/// Sub-surface of a city layout, relative to the block origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutSurface {
    #[serde(default = "unnamed")]
    pub go_name: String,
    /// `[xmin, xmax, ymin, ymax, zmin, zmax]`; other lengths are unusable
    #[serde(default)]
    pub bounds_rel_layout: Vec<f64>,
    #[serde(default)]
    pub is_spawnable: bool,
}

impl LayoutSurface {
    /// Block-local bounds, `None` when malformed.
    pub fn local_bounds(&self) -> Option<Aabb> {
        let b: [f64; 6] = self.bounds_rel_layout.as_slice().try_into().ok()?;
        Some(Aabb::from_extents(b))
    }
}

/// City level → candidate layouts, and layout → sub-surfaces.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LayoutDatabase {
    /// Keyed by the level as a decimal string, "0" to "4"
    #[serde(default)]
    pub layouts_by_level: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub layout_data: BTreeMap<String, Vec<LayoutSurface>>,
}

impl LayoutDatabase {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Candidate layout ids for a city level; empty if none.
    pub fn candidates(&self, level: u8) -> &[String] {
        self.layouts_by_level
            .get(&level.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn surfaces(&self, layout_id: &str) -> Option<&[LayoutSurface]> {
        self.layout_data.get(layout_id).map(Vec::as_slice)
    }
}
