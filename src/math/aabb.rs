//! Axis-aligned bounding box

use crate::core::types::{DMat3, DVec3};

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Create AABB from the `[xmin, xmax, ymin, ymax, zmin, zmax]` layout
    /// used by the surface databases.
    pub fn from_extents(b: [f64; 6]) -> Self {
        Self {
            min: DVec3::new(b[0], b[2], b[4]),
            max: DVec3::new(b[1], b[3], b[5]),
        }
    }

    /// The 8 corners, x outermost then y then z
    pub fn corners(&self) -> [DVec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            DVec3::new(lo.x, lo.y, lo.z),
            DVec3::new(lo.x, lo.y, hi.z),
            DVec3::new(lo.x, hi.y, lo.z),
            DVec3::new(lo.x, hi.y, hi.z),
            DVec3::new(hi.x, lo.y, lo.z),
            DVec3::new(hi.x, lo.y, hi.z),
            DVec3::new(hi.x, hi.y, lo.z),
            DVec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Check if the vertical column through (x, z) passes through the box.
    /// Bounds are inclusive.
    pub fn contains_xz(&self, x: f64, z: f64) -> bool {
        self.min.x <= x && x <= self.max.x &&
        self.min.z <= z && z <= self.max.z
    }

    /// Expand AABB to include point
    pub fn expand(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Rotate a local-space box and translate it, returning the world-space
    /// box that encloses all 8 transformed corners.
    pub fn transformed(&self, rotation: DMat3, translation: DVec3) -> Aabb {
        let corners = self.corners();
        let first = rotation * corners[0] + translation;
        let mut out = Aabb::new(first, first);
        for c in &corners[1..] {
            out.expand(rotation * *c + translation);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extents_layout() {
        let aabb = Aabb::from_extents([-1.0, 1.0, 0.0, 5.0, -2.0, 2.0]);
        assert_eq!(aabb.min, DVec3::new(-1.0, 0.0, -2.0));
        assert_eq!(aabb.max, DVec3::new(1.0, 5.0, 2.0));
    }

    #[test]
    fn test_contains_xz_is_inclusive() {
        let aabb = Aabb::new(DVec3::ZERO, DVec3::new(10.0, 3.0, 10.0));
        assert!(aabb.contains_xz(0.0, 10.0));
        assert!(aabb.contains_xz(5.0, 5.0));
        assert!(!aabb.contains_xz(10.001, 5.0));
    }

    #[test]
    fn test_transformed_quarter_turn() {
        let local = Aabb::new(DVec3::new(0.0, 0.0, 0.0), DVec3::new(4.0, 1.0, 2.0));
        let rot = DMat3::from_rotation_y(std::f64::consts::FRAC_PI_2);
        let world = local.transformed(rot, DVec3::new(100.0, 10.0, 100.0));
        // +X rotates onto -Z, +Z onto +X
        assert!((world.min.x - 100.0).abs() < 1e-9);
        assert!((world.max.x - 102.0).abs() < 1e-9);
        assert!((world.min.z - 96.0).abs() < 1e-9);
        assert!((world.max.z - 100.0).abs() < 1e-9);
        assert!((world.max.y - 11.0).abs() < 1e-9);
    }
}
