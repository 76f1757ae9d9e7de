//! Planar polygon helpers on the XZ plane

use crate::core::types::DVec2;

/// Even-odd ray casting test of (x, z) against a closed polygon whose
/// vertices are given as (x, z) pairs.
///
/// Points exactly on a horizontal edge count as outside, points on the
/// upper end of a non-horizontal edge count as crossing it.
pub fn point_in_polygon(x: f64, z: f64, polygon: &[DVec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut p1 = polygon[0];
    for i in 1..=n {
        let p2 = polygon[i % n];
        if z > p1.y.min(p2.y) && z <= p1.y.max(p2.y) && x <= p1.x.max(p2.x) {
            // z strictly above min and at or below max rules out p1.y == p2.y
            let crosses = if p1.x == p2.x {
                true
            } else {
                let x_inters = (z - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
                x <= x_inters
            };
            if crosses {
                inside = !inside;
            }
        }
        p1 = p2;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_inside_and_outside() {
        let poly = square();
        assert!(point_in_polygon(5.0, 5.0, &poly));
        assert!(!point_in_polygon(15.0, 5.0, &poly));
        assert!(!point_in_polygon(5.0, -0.5, &poly));
    }

    #[test]
    fn test_rotated_diamond() {
        let poly = vec![
            DVec2::new(0.0, -5.0),
            DVec2::new(5.0, 0.0),
            DVec2::new(0.0, 5.0),
            DVec2::new(-5.0, 0.0),
        ];
        assert!(point_in_polygon(0.0, 0.0, &poly));
        assert!(point_in_polygon(2.0, 2.0, &poly));
        assert!(!point_in_polygon(4.0, 4.0, &poly));
    }

    #[test]
    fn test_degenerate_polygon() {
        assert!(!point_in_polygon(0.0, 0.0, &[DVec2::ZERO, DVec2::ONE]));
    }
}
