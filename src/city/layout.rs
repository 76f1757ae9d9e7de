//! Procedural city blocks from the density channel

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::grid::GridAddressing;
use crate::calibration::GridRounding;
use crate::core::types::{DVec2, DVec3};
use crate::heightmap::Raster;
use crate::math::Aabb;
use crate::math::orientation::yaw_rotation;
use crate::scene::{LayoutDatabase, LayoutSurface};
use crate::terrain::Terrain;

/// Number of city levels; level = density bucket in 0..CITY_LEVELS
pub const CITY_LEVELS: u8 = 5;

/// City generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitySettings {
    /// All four corner densities of a quad must exceed this
    pub spawn_threshold: f64,
    /// World (x, z) shift applied to every block center
    pub alignment_offset: [f64; 2],
    pub rounding: GridRounding,
}

impl Default for CitySettings {
    fn default() -> Self {
        Self {
            spawn_threshold: 0.1,
            alignment_offset: [10.0, -10.0],
            rounding: GridRounding::default(),
        }
    }
}

/// City level for a density sample.
pub fn city_level(density: f64) -> u8 {
    let level = ((density - 0.2) / 0.8 * CITY_LEVELS as f64).floor();
    level.clamp(0.0, (CITY_LEVELS - 1) as f64) as u8
}

/// Alternating block yaw that lets neighbouring blocks share road edges.
pub fn block_yaw(px: i64, py: i64) -> f64 {
    match (px.rem_euclid(2) == 0, py.rem_euclid(2) == 0) {
        (true, true) => 0.0,
        (true, false) => 90.0,
        (false, true) => -90.0,
        (false, false) => 180.0,
    }
}

/// Layout chosen for one city pixel.
#[derive(Clone, Copy, Debug)]
pub struct CityLayout<'a> {
    pub layout_id: &'a str,
    pub surfaces: &'a [LayoutSurface],
    pub yaw_degrees: f64,
    pub level: u8,
    pub pixel: (i64, i64),
}

impl<'a> CityLayout<'a> {
    /// World bounds of every well-formed sub-surface for a block whose
    /// origin is `origin`.
    pub fn surface_bounds(self, origin: DVec3) -> impl Iterator<Item = (&'a LayoutSurface, Aabb)> {
        let rotation = yaw_rotation(self.yaw_degrees);
        self.surfaces
            .iter()
            .filter_map(move |s| s.local_bounds().map(|b| (s, b.transformed(rotation, origin))))
    }
}

/// One generated city block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityBlock {
    pub pixel_x: i64,
    pub pixel_y: i64,
    /// Block center with alignment offset; Y is the ground height there
    pub position: DVec3,
    pub layout_id: String,
    pub yaw_degrees: f64,
    pub level: u8,
}

/// Owns the city inputs and every block generated from them.
#[derive(Clone, Debug)]
pub struct CityLayoutEngine {
    density: Raster,
    noise: Raster,
    layouts: LayoutDatabase,
    addressing: GridAddressing,
    settings: CitySettings,
    blocks: Vec<CityBlock>,
    index: HashMap<(i64, i64), usize>,
}

impl CityLayoutEngine {
    /// Generate every block. Block heights read `terrain`, so bases must
    /// already be registered there.
    pub fn build(
        density: Raster,
        noise: Raster,
        layouts: LayoutDatabase,
        addressing: GridAddressing,
        settings: CitySettings,
        terrain: &Terrain,
    ) -> Self {
        let mut engine = Self {
            density,
            noise,
            layouts,
            addressing,
            settings,
            blocks: Vec::new(),
            index: HashMap::new(),
        };
        let blocks = engine.generate(terrain);
        engine.index = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| ((b.pixel_x, b.pixel_y), i))
            .collect();
        engine.blocks = blocks;
        log::info!("Generated {} city blocks", engine.blocks.len());
        engine
    }

    fn generate(&self, terrain: &Terrain) -> Vec<CityBlock> {
        let mut blocks = Vec::new();
        let w = self.density.width() as i64;
        let h = self.density.height() as i64;
        for py in 0..h - 1 {
            for px in 0..w - 1 {
                if !self.is_gated_in(px, py) {
                    continue;
                }
                let corner = self.addressing.pixel_to_world(px, py);
                let Some(layout) = self.layout_at(corner.x, corner.y) else {
                    continue;
                };
                let center = self.block_center(corner);
                blocks.push(CityBlock {
                    pixel_x: px,
                    pixel_y: py,
                    position: DVec3::new(center.x, terrain.height_at(center.x, center.y), center.y),
                    layout_id: layout.layout_id.to_string(),
                    yaw_degrees: layout.yaw_degrees,
                    level: layout.level,
                });
            }
        }
        blocks
    }

    pub fn settings(&self) -> &CitySettings {
        &self.settings
    }

    pub fn addressing(&self) -> &GridAddressing {
        &self.addressing
    }

    /// Block center (with alignment offset) for a pixel corner.
    pub fn block_center(&self, corner: DVec2) -> DVec2 {
        let half = self.addressing.meters_per_pixel() / 2.0;
        corner + DVec2::splat(half) + DVec2::from_array(self.settings.alignment_offset)
    }

    /// The quad at (px, py) has all four corner densities above threshold.
    fn is_gated_in(&self, px: i64, py: i64) -> bool {
        let (Some(px1), Some(py1)) = (px.checked_add(1), py.checked_add(1)) else {
            return false;
        };
        let sample = |x: i64, y: i64| self.density.try_get(x, y).map(|d| d as f64);
        [(px, py), (px1, py), (px1, py1), (px, py1)]
            .iter()
            .all(|&(x, y)| sample(x, y).is_some_and(|d| d > self.settings.spawn_threshold))
    }

    /// Top-left density of a gated-in quad, 0 otherwise.
    pub fn density_at_pixel(&self, px: i64, py: i64) -> f64 {
        if self.is_gated_in(px, py) {
            self.density.get(px as usize, py as usize) as f64
        } else {
            0.0
        }
    }

    /// City density at world (x, z).
    pub fn city_density_at(&self, x: f64, z: f64) -> f64 {
        self.addressing
            .world_to_pixel(x, z)
            .map_or(0.0, |(px, py)| self.density_at_pixel(px, py))
    }

    /// Layout for the city pixel containing world (x, z).
    pub fn layout_at(&self, x: f64, z: f64) -> Option<CityLayout<'_>> {
        let (px, py) = self.addressing.world_to_pixel(x, z)?;
        self.layout_at_pixel(px, py)
    }

    pub fn layout_at_pixel(&self, px: i64, py: i64) -> Option<CityLayout<'_>> {
        let density = self.density_at_pixel(px, py);
        if density <= self.settings.spawn_threshold {
            return None;
        }
        let level = city_level(density);
        let candidates = self.layouts.candidates(level);
        if candidates.is_empty() {
            return None;
        }

        let noise = self.noise.get_wrapped(px, py) as f64;
        let pick = ((noise * candidates.len() as f64).floor() as i64).clamp(0, candidates.len() as i64 - 1);
        let layout_id = candidates[pick as usize].as_str();
        let Some(surfaces) = self.layouts.surfaces(layout_id) else {
            log::debug!("Layout '{}' missing from layout data", layout_id);
            return None;
        };

        Some(CityLayout {
            layout_id,
            surfaces,
            yaw_degrees: block_yaw(px, py),
            level,
            pixel: (px, py),
        })
    }

    /// Blocks in generation order (row-major, rows outer).
    pub fn blocks(&self) -> &[CityBlock] {
        &self.blocks
    }

    pub fn block_at_pixel(&self, px: i64, py: i64) -> Option<&CityBlock> {
        self.index.get(&(px, py)).map(|&i| &self.blocks[i])
    }
}
