//! One planet tile: construction pipeline and query façade
//!
//! A tile is built once from its inputs (decode, calibrate, optionally
//! refit the elevation range, then bases, city blocks, static surfaces and
//! roads, in that order) and is immutable afterwards. Queries take `&self`
//! and may run from any thread.

pub mod config;
pub mod sources;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::{CalibrationSettings, ElevationSettings, TileConfig};
pub use sources::{TileInputs, TileSources};

use crate::bases::{Base, BaseRegistry, SpawnPointTable, WorldSpawn};
use crate::calibration::height_fit::MAX_ANCHORS;
use crate::calibration::{Calibration, fit_elevation_range, sample_uv};
use crate::city::{CityBlock, CityLayout, CityLayoutEngine, GridAddressing};
use crate::core::types::{DVec2, DVec3};
use crate::core::{Error, Result};
use crate::heightmap::{ElevationRange, HeightmapChannels, Raster};
use crate::placement::{Placement, PlacementContext, PlacementQuery, PlacementResolver, terrain_placement};
use crate::roads::{RoadNetwork, RoadSegment};
use crate::scene::{SceneDescription, StaticSurface, build_static_surfaces};
use crate::terrain::{HeightSampler, Terrain};

/// A fully built tile.
#[derive(Debug)]
pub struct Tile {
    config: TileConfig,
    terrain: Terrain,
    city: CityLayoutEngine,
    roads: RoadNetwork,
    surfaces: Vec<StaticSurface>,
    spawn_points: SpawnPointTable,
    resolver: PlacementResolver,
}

impl Tile {
    /// Load inputs from disk and build.
    pub fn load(sources: &TileSources, config: TileConfig) -> Result<Self> {
        let inputs = sources.load(&config.heightmap)?;
        Self::build(inputs, config)
    }

    /// Build a tile from parsed inputs.
    pub fn build(inputs: TileInputs, config: TileConfig) -> Result<Self> {
        let TileInputs {
            heightmap,
            noise,
            scene,
            height_hints,
            layouts,
            catalog,
            spawn_points,
        } = inputs;

        let map_size = scene.map_size.ok_or(Error::MissingField("mapSize"))?;
        if map_size == 0 {
            return Err(Error::InvalidConfig("mapSize must be positive".into()));
        }
        let tile_size = config.grid.tile_size(map_size);

        let range = match config.elevation.range_override {
            Some(range) => range,
            None => scene.elevation_range(height_hints.as_ref()),
        };
        if !(range.max > range.min) {
            return Err(Error::InvalidConfig(format!(
                "elevation range [{}, {}] is empty",
                range.min, range.max
            )));
        }

        let channels = HeightmapChannels::new(heightmap.elevation, heightmap.density, tile_size, range)?;
        if noise.width() == 0 || noise.height() == 0 {
            return Err(Error::InvalidAsset(format!(
                "noise raster is empty ({}x{})",
                noise.width(),
                noise.height()
            )));
        }
        let calibration = config.calibration.calibrator().calibrate(
            &channels.elevation,
            tile_size,
            range,
            scene.reference_point(),
        );
        log::info!(
            "Tile {}x{} px, {:.0} m, elevation [{:.1}, {:.1}], calibration mode {} ({:?})",
            channels.width(),
            channels.height(),
            tile_size,
            range.min,
            range.max,
            calibration.mode,
            calibration.outcome
        );

        let range = if config.calibration.auto_height_fit && config.elevation.range_override.is_none() {
            fit_range_from_roads(&scene, &channels.elevation, &calibration, tile_size).unwrap_or(range)
        } else {
            range
        };

        let (width, height) = (channels.width(), channels.height());
        let sampler = HeightSampler::new(
            channels.elevation,
            calibration,
            tile_size,
            range,
            config.elevation.adjust(),
        );
        let bases = BaseRegistry::build(&scene.static_prefabs, &catalog, &config.bases);
        log::info!("Processed {} bases", bases.len());
        let terrain = Terrain::new(sampler, bases);

        let addressing = GridAddressing {
            layout: config.grid,
            rounding: config.city.rounding,
            mode: calibration.mode,
            width,
            height,
            tile_size,
        };
        let city = CityLayoutEngine::build(
            channels.density,
            noise,
            layouts,
            addressing,
            config.city.clone(),
            &terrain,
        );

        let surfaces = build_static_surfaces(&scene.static_prefabs, &catalog);
        log::info!("Processed {} static prefab surfaces", surfaces.len());
        let roads = RoadNetwork::build(&scene.bezier_roads, city.blocks(), &config.roads);

        Ok(Self {
            config,
            terrain,
            city,
            roads,
            surfaces,
            spawn_points,
            resolver: PlacementResolver::default(),
        })
    }

    /// Replace the placement strategy chain.
    pub fn with_resolver(mut self, resolver: PlacementResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn calibration(&self) -> &Calibration {
        self.terrain.sampler().calibration()
    }

    pub fn elevation_range(&self) -> ElevationRange {
        self.terrain.sampler().range()
    }

    pub fn tile_size(&self) -> f64 {
        self.terrain.sampler().tile_size()
    }

    /// Terrain elevation at world (x, z), base flattening included.
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        self.terrain.height_at(x, z)
    }

    /// Unit terrain normal at world (x, z).
    pub fn normal_at(&self, x: f64, z: f64, step: f64) -> DVec3 {
        self.terrain.normal_at(x, z, step)
    }

    /// Fractional heightmap pixel for world (x, z).
    pub fn world_to_pixel(&self, x: f64, z: f64) -> DVec2 {
        self.terrain.sampler().world_to_pixel(x, z)
    }

    pub fn pixel_to_world(&self, px: f64, py: f64) -> DVec2 {
        self.terrain.sampler().pixel_to_world(px, py)
    }

    pub fn is_on_road(&self, x: f64, z: f64, tolerance: f64) -> bool {
        self.roads.is_on_road(x, z, tolerance)
    }

    fn placement_context(&self) -> PlacementContext<'_> {
        PlacementContext {
            terrain: &self.terrain,
            city: &self.city,
            roads: &self.roads,
            surfaces: &self.surfaces,
            settings: &self.config.placement,
        }
    }

    /// Best mounting surface at world (x, z) for an object facing
    /// `yaw_degrees`.
    pub fn resolve_placement(&self, x: f64, z: f64, yaw_degrees: f64) -> Placement {
        let ctx = self.placement_context();
        let query = PlacementQuery::new(x, z, yaw_degrees);
        self.resolver
            .resolve(&ctx, &query)
            .unwrap_or_else(|| terrain_placement(&ctx, &query))
    }

    /// Resolve a batch in parallel. Output order matches input order.
    pub fn resolve_many(&self, queries: &[PlacementQuery]) -> Vec<Placement> {
        let ctx = self.placement_context();
        self.resolver
            .resolve_many(&ctx, queries)
            .into_iter()
            .zip(queries)
            .map(|(p, q)| p.unwrap_or_else(|| terrain_placement(&ctx, q)))
            .collect()
    }

    pub fn bases(&self) -> &BaseRegistry {
        self.terrain.bases()
    }

    /// Every spawn point of `base` in world space.
    pub fn base_spawns(&self, base: &Base) -> Vec<WorldSpawn> {
        self.spawn_points.world_spawns(base)
    }

    pub fn spawn_points(&self) -> &SpawnPointTable {
        &self.spawn_points
    }

    pub fn city(&self) -> &CityLayoutEngine {
        &self.city
    }

    pub fn city_blocks(&self) -> &[CityBlock] {
        self.city.blocks()
    }

    pub fn city_density_at(&self, x: f64, z: f64) -> f64 {
        self.city.city_density_at(x, z)
    }

    pub fn layout_at(&self, x: f64, z: f64) -> Option<CityLayout<'_>> {
        self.city.layout_at(x, z)
    }

    pub fn static_surfaces(&self) -> &[StaticSurface] {
        &self.surfaces
    }

    pub fn road_segments(&self) -> &[RoadSegment] {
        self.roads.segments()
    }
}

/// Refit the elevation range against authored road control points, which
/// lie on the ground.
fn fit_range_from_roads(
    scene: &SceneDescription,
    elevation: &Raster,
    calibration: &Calibration,
    tile_size: f64,
) -> Option<ElevationRange> {
    let pairs: Vec<(f64, f64)> = scene
        .bezier_roads
        .iter()
        .flat_map(|c| c.control_points())
        .take(MAX_ANCHORS)
        .map(|p| {
            let r = sample_uv(elevation, calibration.mode, p.x / tile_size, p.z / tile_size) as f64;
            (r, p.y)
        })
        .collect();

    let Some(fit) = fit_elevation_range(&pairs) else {
        log::warn!("Auto height calibration skipped: {} usable road anchors", pairs.len());
        return None;
    };
    match fit.range() {
        Some(range) => {
            log::info!(
                "Calibrated altitude range from roads: {:.3}m to {:.3}m (A={:.6}, B={:.6}, {} anchors)",
                range.min,
                range.max,
                fit.scale,
                fit.offset,
                fit.anchors
            );
            Some(range)
        }
        None => {
            log::warn!("Auto height calibration rejected fit (A={:.6}, B={:.6})", fit.scale, fit.offset);
            None
        }
    }
}
