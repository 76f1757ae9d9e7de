//! Best mounting surface for an object at a world point

pub mod resolver;
pub mod strategy;

pub use resolver::PlacementResolver;
pub use strategy::{
    BuildingRoof, CityRoof, Placement, PlacementContext, PlacementKind, PlacementQuery, PlacementSettings,
    PlacementStrategy, Road, TerrainSurface, terrain_placement,
};
