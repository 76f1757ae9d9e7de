//! Mounting surface strategies, each tried in turn by the resolver.

use serde::{Deserialize, Serialize};

use crate::city::CityLayoutEngine;
use crate::core::types::DVec3;
use crate::math::Orientation;
use crate::roads::RoadNetwork;
use crate::scene::StaticSurface;
use crate::terrain::Terrain;

/// Which kind of surface a placement landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementKind {
    BuildingRoof,
    Road,
    CityRoof,
    Terrain,
}

impl PlacementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PlacementKind::BuildingRoof => "building-roof",
            PlacementKind::Road => "road",
            PlacementKind::CityRoof => "city-roof",
            PlacementKind::Terrain => "terrain",
        }
    }
}

impl std::fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how to put an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: DVec3,
    pub orientation: Orientation,
    pub kind: PlacementKind,
    /// Surface the object snapped to, for roof placements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
}

/// A placement request: world (x, z) and facing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementQuery {
    pub x: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw_degrees: f64,
}

impl PlacementQuery {
    pub fn new(x: f64, z: f64, yaw_degrees: f64) -> Self {
        Self { x, z, yaw_degrees }
    }
}

/// Placement tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Finite-difference step for terrain normals, meters
    pub normal_step: f64,
    /// Distance from a road segment that still counts as on the road
    pub road_tolerance: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            normal_step: 1.0,
            road_tolerance: 10.0,
        }
    }
}

/// Read-only tile state a strategy may consult.
#[derive(Clone, Copy)]
pub struct PlacementContext<'a> {
    pub terrain: &'a Terrain,
    pub city: &'a CityLayoutEngine,
    pub roads: &'a RoadNetwork,
    pub surfaces: &'a [StaticSurface],
    pub settings: &'a PlacementSettings,
}

/// One way of finding a mounting surface. Returns `None` to defer to the
/// next strategy.
pub trait PlacementStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn place(&self, ctx: &PlacementContext<'_>, query: &PlacementQuery) -> Option<Placement>;
}

/// Spawnable surfaces of authored buildings.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildingRoof;

impl PlacementStrategy for BuildingRoof {
    fn name(&self) -> &'static str {
        "building-roof"
    }

    fn place(&self, ctx: &PlacementContext<'_>, query: &PlacementQuery) -> Option<Placement> {
        let mut best: Option<&StaticSurface> = None;
        for surface in ctx.surfaces {
            if !surface.spawnable || !surface.bounds.contains_xz(query.x, query.z) {
                continue;
            }
            if best.is_none_or(|b| surface.bounds.max.y > b.bounds.max.y) {
                best = Some(surface);
            }
        }
        let surface = best?;
        Some(Placement {
            position: DVec3::new(query.x, surface.bounds.max.y, query.z),
            orientation: Orientation::upright(query.yaw_degrees),
            kind: PlacementKind::BuildingRoof,
            surface: Some(surface.qualified_name()),
        })
    }
}

/// Road surface at terrain height.
#[derive(Clone, Copy, Debug, Default)]
pub struct Road;

impl PlacementStrategy for Road {
    fn name(&self) -> &'static str {
        "road"
    }

    fn place(&self, ctx: &PlacementContext<'_>, query: &PlacementQuery) -> Option<Placement> {
        if !ctx.roads.is_on_road(query.x, query.z, ctx.settings.road_tolerance) {
            return None;
        }
        Some(Placement {
            position: DVec3::new(query.x, ctx.terrain.height_at(query.x, query.z), query.z),
            orientation: Orientation::upright(query.yaw_degrees),
            kind: PlacementKind::Road,
            surface: None,
        })
    }
}

/// Spawnable sub-surfaces of the procedural city block under the query.
#[derive(Clone, Copy, Debug, Default)]
pub struct CityRoof;

impl PlacementStrategy for CityRoof {
    fn name(&self) -> &'static str {
        "city-roof"
    }

    fn place(&self, ctx: &PlacementContext<'_>, query: &PlacementQuery) -> Option<Placement> {
        let addressing = ctx.city.addressing();
        let (px, py) = addressing.world_to_pixel(query.x, query.z)?;
        let corner = addressing.pixel_to_world(px, py);
        let layout = ctx.city.layout_at(corner.x, corner.y)?;

        // Y is the ground under the query point, not under the block center
        let center = ctx.city.block_center(corner);
        let origin = DVec3::new(center.x, ctx.terrain.height_at(query.x, query.z), center.y);

        let mut best: Option<(f64, &str)> = None;
        for (surface, bounds) in layout.surface_bounds(origin) {
            if !surface.is_spawnable || !bounds.contains_xz(query.x, query.z) {
                continue;
            }
            if best.is_none_or(|(top, _)| bounds.max.y > top) {
                best = Some((bounds.max.y, surface.go_name.as_str()));
            }
        }
        let (top, name) = best?;
        Some(Placement {
            position: DVec3::new(query.x, top, query.z),
            orientation: Orientation::upright(query.yaw_degrees),
            kind: PlacementKind::CityRoof,
            surface: Some(name.to_string()),
        })
    }
}

/// Bare terrain, tilted to the local normal. Always succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerrainSurface;

impl PlacementStrategy for TerrainSurface {
    fn name(&self) -> &'static str {
        "terrain"
    }

    fn place(&self, ctx: &PlacementContext<'_>, query: &PlacementQuery) -> Option<Placement> {
        Some(terrain_placement(ctx, query))
    }
}

/// Placement on bare terrain at the query point.
pub fn terrain_placement(ctx: &PlacementContext<'_>, query: &PlacementQuery) -> Placement {
    let terrain = ctx.terrain;
    Placement {
        position: DVec3::new(query.x, terrain.height_at(query.x, query.z), query.z),
        orientation: terrain.asset_orientation(query.x, query.z, query.yaw_degrees, ctx.settings.normal_step),
        kind: PlacementKind::Terrain,
        surface: None,
    }
}
