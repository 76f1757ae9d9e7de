//! Small synthetic tile shared by tests
//!
//! 21x21 heightmap on a 3072 m tile (one city pixel per heightmap pixel).
//! Contents:
//! - `hangar1` building at (768, ·, 1996.8), the calibration reference
//! - `airbase1` base at (2500, 300, 600), flattening x 2400..2600, z 400..800
//! - 2x2 city blocks at pixels (10..=11, 10..=11), layout `block_a`
//! - one straight authored road along z = 2800 from x = 300 to 900

use crate::bases::SpawnPointTable;
use crate::calibration::{CalibrationMode, sample_uv};
use crate::heightmap::{DecodedChannels, ElevationRange, Raster};
use crate::scene::{LayoutDatabase, PrefabPlacement, RoadCurve, SceneDescription, SurfaceCatalog};

use super::TileInputs;

pub const TILE_SIZE: f64 = 3072.0;
pub const RANGE: ElevationRange = ElevationRange { min: 0.0, max: 1000.0 };
pub const BUILDING_XZ: (f64, f64) = (768.0, 1996.8);
pub const BASE_POS: [f64; 3] = [2500.0, 300.0, 600.0];
pub const ROAD_Z: f64 = 2800.0;
/// Center of city block (10, 10) with the alignment offset
pub const BLOCK_CENTER: (f64, f64) = (1622.8, 1602.8);

/// Unique value per pixel so only one orientation reproduces the
/// reference elevation.
pub fn elevation() -> Raster {
    Raster::from_fn(21, 21, |x, y| (x * 21 + y) as f32 / 441.0)
}

pub fn density() -> Raster {
    Raster::from_fn(21, 21, |x, y| {
        if (10..=12).contains(&x) && (10..=12).contains(&y) { 0.5 } else { 0.0 }
    })
}

/// Ground elevation at (x, z) when the tile is addressed with `mode`.
pub fn ground_under(mode: CalibrationMode, x: f64, z: f64) -> f64 {
    let r = sample_uv(&elevation(), mode, x / TILE_SIZE, z / TILE_SIZE) as f64;
    RANGE.denormalize(r)
}

pub fn building(y: f64) -> PrefabPlacement {
    PrefabPlacement {
        id: Some(10),
        prefab: "hangar1".to_string(),
        global_pos: [BUILDING_XZ.0, y, BUILDING_XZ.1],
        rotation: [0.0, 0.0, 0.0],
        base_name: None,
    }
}

pub fn base() -> PrefabPlacement {
    PrefabPlacement {
        id: Some(1),
        prefab: "airbase1".to_string(),
        global_pos: BASE_POS,
        rotation: [0.0, 0.0, 0.0],
        base_name: Some("Test Airbase".to_string()),
    }
}

pub fn road(x0: f64, x1: f64, z: f64) -> RoadCurve {
    RoadCurve {
        s: [x0, 0.0, z],
        m: [(x0 + x1) / 2.0, 0.0, z],
        e: [x1, 0.0, z],
    }
}

pub fn scene() -> SceneDescription {
    let (bx, bz) = BUILDING_XZ;
    SceneDescription {
        map_size: Some(1),
        hm_min_height: Some(RANGE.min),
        hm_max_height: Some(RANGE.max),
        static_prefabs: vec![building(ground_under(CalibrationMode::FlipY, bx, bz)), base()],
        bezier_roads: vec![road(300.0, 900.0, ROAD_Z)],
        ..Default::default()
    }
}

pub fn catalog() -> SurfaceCatalog {
    SurfaceCatalog::from_json_str(r#"{
        "staticPrefabs/hangar1.prefab": [
            {"go_name": "Roof", "bounds": [-30, 30, 0, 15, -20, 20], "is_spawnable": true},
            {"go_name": "Mast", "bounds": [-1, 1, 15, 40, -1, 1]}
        ],
        "bases/airbase1.prefab": [
            {"go_name": "Runway", "bounds": [-100, 100, 0, 2, -200, 200]}
        ]
    }"#)
    .expect("catalog")
}

pub fn layouts() -> LayoutDatabase {
    LayoutDatabase::from_json_str(r#"{
        "layouts_by_level": {"1": ["block_a"]},
        "layout_data": {
            "block_a": [
                {"go_name": "Roof", "bounds_rel_layout": [-40, 40, 0, 25, -40, 40], "is_spawnable": true},
                {"go_name": "Spire", "bounds_rel_layout": [-5, 5, 0, 60, -5, 5]},
                {"go_name": "Broken", "bounds_rel_layout": [0, 1, 2]}
            ]
        }
    }"#)
    .expect("layouts")
}

pub fn spawn_points() -> SpawnPointTable {
    SpawnPointTable::from_json_str(r#"{
        "airbase1": [{"name": "Hangar 1", "offset": [50.0, -100.0], "yaw_offset": 90.0}]
    }"#)
    .expect("spawns")
}

pub fn inputs() -> TileInputs {
    TileInputs {
        heightmap: DecodedChannels {
            elevation: elevation(),
            density: density(),
        },
        noise: Raster::from_fn(1, 1, |_, _| 0.0),
        scene: scene(),
        height_hints: None,
        layouts: layouts(),
        catalog: catalog(),
        spawn_points: spawn_points(),
    }
}

/// Natural ground at (x, z) under the fixture's calibrated mode.
pub fn natural(x: f64, z: f64) -> f64 {
    ground_under(CalibrationMode::FlipY, x, z).max(0.0)
}
