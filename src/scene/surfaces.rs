//! World-space static surfaces of authored buildings

use serde::{Deserialize, Serialize};

use super::catalog::SurfaceCatalog;
use super::description::PrefabPlacement;
use crate::math::orientation::rotation_from_degrees;
use crate::math::Aabb;

/// One surface of an authored building, placed in the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticSurface {
    pub prefab_name: String,
    pub surface_name: String,
    pub bounds: Aabb,
    pub spawnable: bool,
}

impl StaticSurface {
    /// `<prefab>/<surface>`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.prefab_name, self.surface_name)
    }
}

/// Place every catalogued surface of every placement. Placements whose
/// prefab is not in the catalog have no surfaces and are skipped.
pub fn build_static_surfaces(placements: &[PrefabPlacement], catalog: &SurfaceCatalog) -> Vec<StaticSurface> {
    let mut surfaces = Vec::new();
    for placement in placements {
        let Some(specs) = catalog.by_prefab_name(&placement.prefab) else {
            log::debug!("No surface bounds for prefab '{}'", placement.prefab);
            continue;
        };

        let position = placement.position();
        let rotation = placement.rotation();
        if !position.is_finite() || !rotation.is_finite() {
            log::warn!("Could not process static prefab '{}': non-finite transform", placement.prefab);
            continue;
        }
        let matrix = rotation_from_degrees(rotation);

        for spec in specs {
            surfaces.push(StaticSurface {
                prefab_name: placement.prefab.clone(),
                surface_name: spec.go_name.clone(),
                bounds: spec.local_bounds().transformed(matrix, position),
                spawnable: spec.is_spawnable,
            });
        }
    }
    surfaces
}
