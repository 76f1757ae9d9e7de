//! Rounding strategies for world → integer pixel addressing
//!
//! The renderer computes pixel indices in decimal arithmetic, so a world
//! coordinate written as an exact multiple of the pixel pitch (e.g.
//! `307.2 / 153.6`) lands exactly on an integer. In binary floating point
//! the same quotient may come out a hair below. The helpers here absorb
//! that representation error before rounding.

use serde::{Deserialize, Serialize};

/// Relative distance to a rounding boundary treated as "exactly on it".
const SNAP_EPSILON: f64 = 1e-9;

/// How world coordinates are rounded to city-grid pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridRounding {
    /// Chunk-wise floor of the fixed pixel pitch
    #[default]
    ChunkFloor,
    /// Calibrated-mode UV → pixel, rounded half to even and clamped
    CalibratedHalfEven,
}

fn snap_to(q: f64, grid: f64) -> Option<f64> {
    let scaled = q * grid;
    let nearest = scaled.round();
    ((scaled - nearest).abs() <= SNAP_EPSILON * nearest.abs().max(1.0)).then(|| nearest / grid)
}

/// Floor, treating values within representation error of an integer as
/// that integer.
pub fn decimal_floor(q: f64) -> f64 {
    snap_to(q, 1.0).unwrap_or_else(|| q.floor())
}

/// Round half to even, treating values within representation error of a
/// half-integer as that half-integer.
pub fn decimal_round_half_even(q: f64) -> f64 {
    snap_to(q, 2.0).unwrap_or(q).round_ties_even()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_floor_absorbs_binary_error() {
        assert_eq!(decimal_floor(307.2 / 153.6), 2.0);
        assert_eq!(decimal_floor(1.9999999999999998), 2.0);
        assert_eq!(decimal_floor(1.75), 1.0);
        assert_eq!(decimal_floor(-0.5), -1.0);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(decimal_round_half_even(0.5), 0.0);
        assert_eq!(decimal_round_half_even(1.5), 2.0);
        assert_eq!(decimal_round_half_even(2.5), 2.0);
        assert_eq!(decimal_round_half_even(2.4999999999999996), 2.0);
        assert_eq!(decimal_round_half_even(3.5000000000000004), 4.0);
        assert_eq!(decimal_round_half_even(2.6), 3.0);
    }
}
