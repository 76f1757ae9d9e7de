//! On-disk tile inputs

use std::path::{Path, PathBuf};

use crate::bases::SpawnPointTable;
use crate::core::{Error, Result};
use crate::heightmap::{DecodedChannels, HeightmapDecoder, Raster};
use crate::scene::{HeightHints, LayoutDatabase, SceneDescription, SurfaceCatalog};

/// Everything a tile is built from, already parsed.
#[derive(Clone, Debug)]
pub struct TileInputs {
    pub heightmap: DecodedChannels,
    pub noise: Raster,
    pub scene: SceneDescription,
    pub height_hints: Option<HeightHints>,
    pub layouts: LayoutDatabase,
    pub catalog: SurfaceCatalog,
    pub spawn_points: SpawnPointTable,
}

/// File locations of a tile's inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct TileSources {
    pub heightmap: PathBuf,
    pub scene: PathBuf,
    /// Optional `.meta` sidecar with elevation hints
    pub height_meta: Option<PathBuf>,
    pub noise: PathBuf,
    pub layouts: PathBuf,
    pub surfaces: PathBuf,
    /// Optional base spawn point table
    pub spawn_points: Option<PathBuf>,
}

impl TileSources {
    /// Conventional layout: `<map>/height.png`, `<map>/<map name>.json` and
    /// `<map>/height.png.meta`, plus the shared resource files.
    pub fn from_map_dir(map_dir: &Path, resources_dir: &Path) -> Result<Self> {
        let name = map_dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidConfig(format!("map directory {} has no name", map_dir.display())))?;

        let heightmap = map_dir.join("height.png");
        let meta = map_dir.join("height.png.meta");
        let spawns = resources_dir.join("base_spawn_points.json");
        Ok(Self {
            scene: map_dir.join(format!("{}.json", name)),
            height_meta: meta.is_file().then_some(meta),
            heightmap,
            noise: resources_dir.join("noise.png"),
            layouts: resources_dir.join("city_layouts_database.json"),
            surfaces: resources_dir.join("individual_prefabs_database.json"),
            spawn_points: spawns.is_file().then_some(spawns),
        })
    }

    /// Read and parse every input. Required files must exist.
    pub fn load(&self, decoder: &HeightmapDecoder) -> Result<TileInputs> {
        let scene = SceneDescription::load(&self.scene)?;
        let heightmap = decoder.load(&self.heightmap)?;
        let noise = decoder.load_noise(&self.noise)?;
        let layouts = LayoutDatabase::load(&self.layouts)?;
        let catalog = SurfaceCatalog::load(&self.surfaces)?;
        let height_hints = self.height_meta.as_deref().and_then(HeightHints::load);
        let spawn_points = match &self.spawn_points {
            Some(path) => SpawnPointTable::load(path)?,
            None => SpawnPointTable::default(),
        };
        log::debug!(
            "Loaded tile inputs: {} placements, {} road curves, {} catalogued prefabs",
            scene.static_prefabs.len(),
            scene.bezier_roads.len(),
            catalog.len()
        );

        Ok(TileInputs {
            heightmap,
            noise,
            scene,
            height_hints,
            layouts,
            catalog,
            spawn_points,
        })
    }
}
