//! Ordered placement strategy chain

use rayon::prelude::*;

use super::strategy::{
    BuildingRoof, CityRoof, Placement, PlacementContext, PlacementQuery, PlacementStrategy, Road, TerrainSurface,
};

/// Tries each strategy in order; the first hit wins.
pub struct PlacementResolver {
    strategies: Vec<Box<dyn PlacementStrategy>>,
}

impl Default for PlacementResolver {
    /// Building roofs, then roads, then city roofs, then terrain.
    fn default() -> Self {
        Self::new(vec![
            Box::new(BuildingRoof),
            Box::new(Road),
            Box::new(CityRoof),
            Box::new(TerrainSurface),
        ])
    }
}

impl std::fmt::Debug for PlacementResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.strategies.iter().map(|s| s.name())).finish()
    }
}

impl PlacementResolver {
    pub fn new(strategies: Vec<Box<dyn PlacementStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// First placement any strategy produces. `None` only when the chain
    /// has no catch-all strategy.
    pub fn resolve(&self, ctx: &PlacementContext<'_>, query: &PlacementQuery) -> Option<Placement> {
        self.strategies.iter().find_map(|s| {
            let placement = s.place(ctx, query);
            if placement.is_some() {
                log::trace!("Placement at ({:.1}, {:.1}) resolved by {}", query.x, query.z, s.name());
            }
            placement
        })
    }

    /// Resolve many queries in parallel, keeping input order.
    pub fn resolve_many(&self, ctx: &PlacementContext<'_>, queries: &[PlacementQuery]) -> Vec<Option<Placement>> {
        queries.par_iter().map(|q| self.resolve(ctx, q)).collect()
    }
}
