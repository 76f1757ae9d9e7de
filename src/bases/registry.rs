//! Airbases, carriers and FOBs, and the terrain they flatten

use serde::{Deserialize, Serialize};

use crate::core::types::{DVec2, DVec3};
use crate::math::orientation::rotation_from_degrees;
use crate::math::point_in_polygon;
use crate::scene::{PrefabPlacement, SurfaceCatalog};

/// Base footprint rectangle in base-local space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub x_min: f64,
    pub x_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl Footprint {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn length(&self) -> f64 {
        self.z_max - self.z_min
    }

    /// Grow every side by `margin`.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            x_min: self.x_min - margin,
            x_max: self.x_max + margin,
            z_min: self.z_min - margin,
            z_max: self.z_max + margin,
        }
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            x_min: -500.0,
            x_max: 500.0,
            z_min: -1000.0,
            z_max: 1000.0,
        }
    }
}

/// Base detection and flattening parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSettings {
    /// Lower-case substrings marking a prefab as a base
    pub keywords: Vec<String>,
    /// Meters added around each footprint before flattening
    pub flatten_margin: f64,
    /// Footprint for base prefabs missing from the surface catalog
    pub default_footprint: Footprint,
}

impl Default for BaseSettings {
    fn default() -> Self {
        Self {
            keywords: vec!["airbase".into(), "carrier".into(), "fob".into()],
            flatten_margin: 0.0,
            default_footprint: Footprint::default(),
        }
    }
}

impl BaseSettings {
    pub fn is_base_prefab(&self, prefab: &str) -> bool {
        let prefab = prefab.to_lowercase();
        self.keywords.iter().any(|k| prefab.contains(k.as_str()))
    }
}

/// A base found among the authored prefabs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub id: Option<i64>,
    pub name: String,
    pub prefab_type: String,
    /// Y is the plateau height
    pub position: DVec3,
    /// Pitch, yaw, roll in degrees
    pub rotation: DVec3,
    pub footprint: Footprint,
    /// World (x, z) corners of the flattened rectangle
    pub flatten_zone: [DVec2; 4],
    pub flatten_height: f64,
}

impl Base {
    pub fn yaw(&self) -> f64 {
        self.rotation.y
    }

    pub fn contains(&self, x: f64, z: f64) -> bool {
        point_in_polygon(x, z, &self.flatten_zone)
    }

    /// World position and absolute yaw of a base-local offset.
    ///
    /// The offset turns with the base yaw; Y sits on the flattened plateau.
    pub fn local_to_world(&self, dx: f64, dz: f64, yaw_offset: f64) -> (DVec3, f64) {
        let (sin, cos) = self.yaw().to_radians().sin_cos();
        let rx = dx * cos + dz * sin;
        let rz = -dx * sin + dz * cos;
        let world = DVec3::new(self.position.x + rx, self.flatten_height, self.position.z + rz);
        (world, (self.yaw() + yaw_offset).rem_euclid(360.0))
    }
}

/// World (x, z) corners of `footprint` placed with `position` and `rotation`.
fn flatten_zone(position: DVec3, rotation: DVec3, footprint: &Footprint) -> [DVec2; 4] {
    let matrix = rotation_from_degrees(rotation);
    let local = [
        DVec3::new(footprint.x_min, 0.0, footprint.z_min),
        DVec3::new(footprint.x_max, 0.0, footprint.z_min),
        DVec3::new(footprint.x_max, 0.0, footprint.z_max),
        DVec3::new(footprint.x_min, 0.0, footprint.z_max),
    ];
    local.map(|c| {
        let w = matrix * c + position;
        DVec2::new(w.x, w.z)
    })
}

/// Footprint of a base prefab: the x/z union of its catalogued surfaces.
fn footprint_for(prefab: &str, catalog: &SurfaceCatalog, fallback: Footprint) -> Footprint {
    let key = format!("bases/{}.prefab", prefab);
    let Some(specs) = catalog.get(&key).filter(|s| !s.is_empty()) else {
        log::debug!("No footprint for '{}', using default", key);
        return fallback;
    };
    specs.iter().fold(
        Footprint {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            z_min: f64::INFINITY,
            z_max: f64::NEG_INFINITY,
        },
        |f, s| Footprint {
            x_min: f.x_min.min(s.bounds[0]),
            x_max: f.x_max.max(s.bounds[1]),
            z_min: f.z_min.min(s.bounds[4]),
            z_max: f.z_max.max(s.bounds[5]),
        },
    )
}

/// All bases of a tile in registration order.
#[derive(Clone, Debug, Default)]
pub struct BaseRegistry {
    bases: Vec<Base>,
}

impl BaseRegistry {
    /// Collect bases from authored placements.
    pub fn build(placements: &[PrefabPlacement], catalog: &SurfaceCatalog, settings: &BaseSettings) -> Self {
        let mut bases = Vec::new();
        for placement in placements {
            if !settings.is_base_prefab(&placement.prefab) {
                continue;
            }
            let position = placement.position();
            let rotation = placement.rotation();
            if !position.is_finite() || !rotation.is_finite() {
                log::warn!("Could not process base '{}': non-finite transform", placement.prefab);
                continue;
            }

            let footprint = footprint_for(&placement.prefab, catalog, settings.default_footprint);
            let zone = flatten_zone(position, rotation, &footprint.expanded(settings.flatten_margin));
            let name = placement
                .base_name
                .clone()
                .unwrap_or_else(|| match placement.id {
                    Some(id) => format!("Base {}", id),
                    None => "Base None".to_string(),
                });

            log::debug!(
                "Base '{}' ({}) at {:?}, footprint {:.0}x{:.0}",
                name,
                placement.prefab,
                position,
                footprint.width(),
                footprint.length()
            );
            bases.push(Base {
                id: placement.id,
                name,
                prefab_type: placement.prefab.clone(),
                position,
                rotation,
                footprint,
                flatten_zone: zone,
                flatten_height: position.y,
            });
        }
        Self { bases }
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Base> {
        self.bases.iter()
    }

    pub fn as_slice(&self) -> &[Base] {
        &self.bases
    }

    /// Plateau height if (x, z) lies in a flatten zone. Earlier bases win
    /// where zones overlap.
    pub fn flatten_height_at(&self, x: f64, z: f64) -> Option<f64> {
        self.bases.iter().find(|b| b.contains(x, z)).map(|b| b.flatten_height)
    }

    pub fn by_id(&self, id: i64) -> Option<&Base> {
        self.bases.iter().find(|b| b.id == Some(id))
    }

    /// First base whose name contains `name`, ignoring case.
    pub fn by_name(&self, name: &str) -> Option<&Base> {
        let needle = name.to_lowercase();
        self.bases.iter().find(|b| b.name.to_lowercase().contains(&needle))
    }

    /// Closest base by horizontal distance.
    pub fn nearest(&self, x: f64, z: f64) -> Option<(&Base, f64)> {
        let point = DVec2::new(x, z);
        self.bases
            .iter()
            .map(|b| (b, DVec2::new(b.position.x, b.position.z).distance(point)))
            .fold(None, |best: Option<(&Base, f64)>, (b, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((b, d)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(id: i64, prefab: &str, pos: [f64; 3], yaw: f64) -> PrefabPlacement {
        PrefabPlacement {
            id: Some(id),
            prefab: prefab.to_string(),
            global_pos: pos,
            rotation: [0.0, yaw, 0.0],
            base_name: None,
        }
    }

    fn catalog() -> SurfaceCatalog {
        SurfaceCatalog::from_json_str(r#"{
            "bases/airbase1.prefab": [
                {"go_name": "Runway", "bounds": [-50, 50, 0, 1, -800, 800]},
                {"go_name": "Apron", "bounds": [50, 300, 0, 1, -100, 100]}
            ]
        }"#)
        .expect("catalog")
    }

    #[test]
    fn test_footprint_from_catalog_union() {
        let reg = BaseRegistry::build(
            &[placement(1, "airbase1", [0.0, 100.0, 0.0], 0.0)],
            &catalog(),
            &BaseSettings::default(),
        );
        let base = &reg.as_slice()[0];
        assert_eq!(base.footprint, Footprint { x_min: -50.0, x_max: 300.0, z_min: -800.0, z_max: 800.0 });
        assert_eq!(base.name, "Base 1");
        assert_eq!(base.flatten_height, 100.0);
    }

    #[test]
    fn test_unknown_base_uses_default_footprint() {
        let reg = BaseRegistry::build(
            &[placement(2, "carrier1", [1000.0, 5.0, 1000.0], 0.0)],
            &catalog(),
            &BaseSettings::default(),
        );
        assert_eq!(reg.as_slice()[0].footprint, Footprint::default());
        assert_eq!(reg.flatten_height_at(1400.0, 1900.0), Some(5.0));
        assert_eq!(reg.flatten_height_at(1600.0, 1000.0), None);
    }

    #[test]
    fn test_non_base_prefabs_ignored() {
        let reg = BaseRegistry::build(
            &[placement(1, "hangar1", [0.0, 0.0, 0.0], 0.0)],
            &catalog(),
            &BaseSettings::default(),
        );
        assert!(reg.is_empty());
        assert!(BaseSettings::default().is_base_prefab("FOB_small"));
    }

    #[test]
    fn test_rotated_zone() {
        let reg = BaseRegistry::build(
            &[placement(1, "fob", [0.0, 50.0, 0.0], 90.0)],
            &catalog(),
            &BaseSettings::default(),
        );
        // Long axis now runs along world X
        assert_eq!(reg.flatten_height_at(900.0, 0.0), Some(50.0));
        assert_eq!(reg.flatten_height_at(0.0, 900.0), None);
    }

    #[test]
    fn test_margin_expands_zone() {
        let settings = BaseSettings { flatten_margin: 100.0, ..Default::default() };
        let reg = BaseRegistry::build(&[placement(1, "fob", [0.0, 50.0, 0.0], 0.0)], &catalog(), &settings);
        assert_eq!(reg.flatten_height_at(550.0, 0.0), Some(50.0));
        assert_eq!(reg.as_slice()[0].footprint, Footprint::default());
    }

    #[test]
    fn test_first_registered_wins_on_overlap() {
        let reg = BaseRegistry::build(
            &[
                placement(1, "fob", [0.0, 50.0, 0.0], 0.0),
                placement(2, "fob", [200.0, 80.0, 0.0], 0.0),
            ],
            &catalog(),
            &BaseSettings::default(),
        );
        assert_eq!(reg.flatten_height_at(100.0, 0.0), Some(50.0));
        assert_eq!(reg.flatten_height_at(650.0, 0.0), Some(80.0));
    }

    #[test]
    fn test_lookups() {
        let mut named = placement(7, "airbase2", [3000.0, 10.0, 0.0], 0.0);
        named.base_name = Some("Northern Airfield".to_string());
        let reg = BaseRegistry::build(
            &[placement(1, "fob", [0.0, 50.0, 0.0], 0.0), named],
            &catalog(),
            &BaseSettings::default(),
        );
        assert_eq!(reg.by_id(7).map(|b| b.name.as_str()), Some("Northern Airfield"));
        assert_eq!(reg.by_name("northern").and_then(|b| b.id), Some(7));
        assert!(reg.by_name("southern").is_none());
        let (base, dist) = reg.nearest(2900.0, 0.0).expect("nearest");
        assert_eq!(base.id, Some(7));
        assert!((dist - 100.0).abs() < 1e-9);
        assert!(BaseRegistry::default().nearest(0.0, 0.0).is_none());
    }

    #[test]
    fn test_local_to_world() {
        let reg = BaseRegistry::build(
            &[placement(1, "fob", [100.0, 40.0, 200.0], 90.0)],
            &catalog(),
            &BaseSettings::default(),
        );
        let (pos, yaw) = reg.as_slice()[0].local_to_world(10.0, 0.0, 300.0);
        assert!((pos - DVec3::new(100.0, 40.0, 190.0)).length() < 1e-9);
        assert!((yaw - 30.0).abs() < 1e-9);
    }
}
