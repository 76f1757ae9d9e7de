//! Euler-angle conventions shared by placements, bases and surfaces.
//!
//! Authored rotations are (pitch, yaw, roll) in degrees, applied about the
//! fixed world axes: yaw about Y first, then pitch about X, then roll about
//! Z. The resulting matrix is `Rz(roll) * Rx(pitch) * Ry(yaw)`.

use serde::{Deserialize, Serialize};

use crate::core::types::{DMat3, DQuat, DVec3, EulerRot};

/// Below this length a vector is treated as zero.
const DEGENERATE_LENGTH: f64 = 1e-6;

/// Rotation matrix for an authored (pitch, yaw, roll) triple in degrees.
pub fn rotation_from_degrees(pitch_yaw_roll: DVec3) -> DMat3 {
    DMat3::from_euler(
        EulerRot::ZXY,
        pitch_yaw_roll.z.to_radians(),
        pitch_yaw_roll.x.to_radians(),
        pitch_yaw_roll.y.to_radians(),
    )
}

/// Rotation about +Y by `yaw_degrees`.
pub fn yaw_rotation(yaw_degrees: f64) -> DMat3 {
    DMat3::from_rotation_y(yaw_degrees.to_radians())
}

/// Full 3-axis orientation in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Orientation {
    pub fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Level orientation facing `yaw_degrees`.
    pub fn upright(yaw_degrees: f64) -> Self {
        Self::new(0.0, yaw_degrees, 0.0)
    }

    /// Tilt "up" onto the surface `normal`, then apply `yaw_degrees` as a
    /// secondary rotation inside that tilted frame.
    ///
    /// Roll is reported in [0, 360).
    pub fn from_normal(normal: DVec3, yaw_degrees: f64) -> Self {
        let up = DVec3::Y;
        let normal = if normal.length() < DEGENERATE_LENGTH { up } else { normal };

        let axis = up.cross(normal);
        let angle = up.dot(normal).clamp(-1.0, 1.0).acos();
        let tilt = if axis.length() < DEGENERATE_LENGTH {
            if angle < std::f64::consts::FRAC_PI_2 {
                DQuat::IDENTITY
            } else {
                DQuat::from_rotation_x(std::f64::consts::PI)
            }
        } else {
            DQuat::from_axis_angle(axis.normalize(), angle)
        };

        let yaw = DQuat::from_rotation_y(yaw_degrees.to_radians());
        let (r, p, y) = (tilt * yaw).to_euler(EulerRot::ZXY);

        let mut roll = r.to_degrees();
        if roll < 0.0 {
            roll += 360.0;
        }
        Self::new(p.to_degrees(), y.to_degrees(), roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_normal_keeps_yaw() {
        let o = Orientation::from_normal(DVec3::Y, 45.0);
        assert!(o.pitch.abs() < 1e-9);
        assert!((o.yaw - 45.0).abs() < 1e-9);
        assert!(o.roll.abs() < 1e-9 || (o.roll - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_normal_is_up() {
        let o = Orientation::from_normal(DVec3::ZERO, 10.0);
        assert!((o.yaw - 10.0).abs() < 1e-9);
        assert!(o.pitch.abs() < 1e-9);
    }

    #[test]
    fn test_tilted_normal_produces_tilt() {
        let n = DVec3::new(0.0, 1.0, 1.0).normalize();
        let o = Orientation::from_normal(n, 0.0);
        // Up tilted toward +Z is a positive rotation about +X
        assert!((o.pitch - 45.0).abs() < 1e-9);
        assert!(o.yaw.abs() < 1e-9);
    }

    #[test]
    fn test_rotation_from_degrees_yaw_only() {
        let m = rotation_from_degrees(DVec3::new(0.0, 90.0, 0.0));
        let v = m * DVec3::X;
        assert!((v - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
        let m2 = yaw_rotation(90.0);
        assert!((m2 * DVec3::X - v).length() < 1e-12);
    }

    #[test]
    fn test_tilted_normal_with_yaw() {
        let (sin, cos) = 30f64.to_radians().sin_cos();
        let o = Orientation::from_normal(DVec3::new(-sin, cos, 0.0), 90.0);
        // Tilt is +30 about Z, applied after the 90 degree yaw
        assert!(o.pitch.abs() < 1e-9);
        assert!((o.yaw - 90.0).abs() < 1e-9);
        assert!((o.roll - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_from_degrees_applies_yaw_first() {
        // Yaw 90 carries +X onto -Z, then pitch 90 about world X carries -Z onto +Y
        let m = rotation_from_degrees(DVec3::new(90.0, 90.0, 0.0));
        let v = m * DVec3::X;
        assert!((v - DVec3::Y).length() < 1e-12);

        let expected = DMat3::from_rotation_x(90f64.to_radians()) * yaw_rotation(90.0);
        assert!((m * DVec3::Z - expected * DVec3::Z).length() < 1e-12);
    }
}
