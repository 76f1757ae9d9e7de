//! Terrain elevation with base flattening applied

use crate::bases::BaseRegistry;
use crate::core::types::DVec3;
use crate::math::Orientation;

use super::sampler::HeightSampler;

/// Queryable terrain of one tile.
///
/// Bases flatten the ground under their footprint; everywhere else the
/// calibrated heightmap decides.
#[derive(Clone, Debug)]
pub struct Terrain {
    sampler: HeightSampler,
    bases: BaseRegistry,
}

impl Terrain {
    pub fn new(sampler: HeightSampler, bases: BaseRegistry) -> Self {
        Self { sampler, bases }
    }

    pub fn sampler(&self) -> &HeightSampler {
        &self.sampler
    }

    pub fn bases(&self) -> &BaseRegistry {
        &self.bases
    }

    /// Get terrain height at world position (x, z)
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        match self.bases.flatten_height_at(x, z) {
            Some(h) => h,
            None => self.sampler.natural_height(x, z),
        }
    }

    /// Unit surface normal from forward differences `step` meters apart.
    pub fn normal_at(&self, x: f64, z: f64, step: f64) -> DVec3 {
        let h0 = self.height_at(x, z);
        let hx = self.height_at(x + step, z);
        let hz = self.height_at(x, z + step);
        let vx = DVec3::new(step, hx - h0, 0.0);
        let vz = DVec3::new(0.0, hz - h0, step);
        let n = vz.cross(vx);
        let len = n.length();
        if len > 0.0 && len.is_finite() { n / len } else { DVec3::Y }
    }

    /// Orientation of an object standing on the terrain at (x, z) and
    /// facing `yaw_degrees`.
    pub fn asset_orientation(&self, x: f64, z: f64, yaw_degrees: f64, step: f64) -> Orientation {
        Orientation::from_normal(self.normal_at(x, z, step), yaw_degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bases::BaseSettings;
    use crate::calibration::{Calibration, CalibrationMode};
    use crate::heightmap::{ElevationRange, Raster};
    use crate::scene::{PrefabPlacement, SurfaceCatalog};
    use crate::terrain::sampler::ElevationAdjust;

    fn slope_sampler() -> HeightSampler {
        // 1 m per pixel tile, height rising 0.5 m per meter along +x
        let raster = Raster::from_fn(11, 11, |x, _| x as f32 / 10.0);
        HeightSampler::new(
            raster,
            Calibration::forced(CalibrationMode::Identity),
            10.0,
            ElevationRange::new(0.0, 5.0),
            ElevationAdjust::default(),
        )
    }

    fn fob(pos: [f64; 3]) -> PrefabPlacement {
        PrefabPlacement {
            id: Some(1),
            prefab: "fob".to_string(),
            global_pos: pos,
            rotation: [0.0, 0.0, 0.0],
            base_name: None,
        }
    }

    #[test]
    fn test_flat_terrain_normal_is_up() {
        let raster = Raster::from_fn(4, 4, |_, _| 0.3);
        let sampler = HeightSampler::new(
            raster,
            Calibration::forced(CalibrationMode::FlipY),
            3000.0,
            ElevationRange::DEFAULT,
            ElevationAdjust::default(),
        );
        let terrain = Terrain::new(sampler, BaseRegistry::default());
        assert!((terrain.normal_at(500.0, 500.0, 1.0) - DVec3::Y).length() < 1e-9);
    }

    #[test]
    fn test_slope_normal_leans_downhill() {
        let terrain = Terrain::new(slope_sampler(), BaseRegistry::default());
        let n = terrain.normal_at(4.0, 4.0, 1.0);
        let expected = DVec3::new(-0.5, 1.0, 0.0).normalize();
        assert!((n - expected).length() < 1e-4, "{:?}", n);
        let o = terrain.asset_orientation(4.0, 4.0, 0.0, 1.0);
        assert!(o.roll > 0.0);
    }

    #[test]
    fn test_base_overrides_natural_height() {
        let bases = BaseRegistry::build(&[fob([0.0, 7.0, 0.0])], &SurfaceCatalog::default(), &BaseSettings::default());
        let terrain = Terrain::new(slope_sampler(), bases);
        assert_eq!(terrain.height_at(4.0, 4.0), 7.0);
        // Outside the default footprint the raster applies
        assert!((terrain.height_at(4.0, 1500.0) - 2.0).abs() < 1e-4);
        assert!((terrain.sampler().natural_height(4.0, 4.0) - 2.0).abs() < 1e-4);
    }
}
