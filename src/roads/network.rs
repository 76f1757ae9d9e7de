//! Road segments from authored curves and city grid gaps

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::city::CityBlock;
use crate::core::types::{DVec2, DVec3};
use crate::math::curve::sample_quadratic;
use crate::scene::RoadCurve;

/// Road extraction parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadSettings {
    /// Points sampled along each authored curve, endpoints included
    pub curve_samples: usize,
}

impl Default for RoadSettings {
    fn default() -> Self {
        Self { curve_samples: 5 }
    }
}

/// Straight piece of road. Direction carries no meaning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub start: DVec3,
    pub end: DVec3,
}

impl RoadSegment {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    /// Squared horizontal distance from (x, z) to the segment, `None` for
    /// zero-length segments.
    pub fn distance_squared_xz(&self, x: f64, z: f64) -> Option<f64> {
        let p1 = DVec2::new(self.start.x, self.start.z);
        let p2 = DVec2::new(self.end.x, self.end.z);
        let line = p2 - p1;
        let len_sq = line.length_squared();
        if len_sq == 0.0 {
            return None;
        }
        let point = DVec2::new(x, z);
        let t = ((point - p1).dot(line) / len_sq).clamp(0.0, 1.0);
        Some(point.distance_squared(p1 + line * t))
    }
}

/// All road segments of a tile.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    segments: Vec<RoadSegment>,
}

impl RoadNetwork {
    /// Authored curves first, then grid roads between generated blocks.
    pub fn build(curves: &[RoadCurve], blocks: &[CityBlock], settings: &RoadSettings) -> Self {
        let mut segments = Vec::new();
        for curve in curves {
            let [s, m, e] = curve.control_points();
            if !(s.is_finite() && m.is_finite() && e.is_finite()) {
                log::warn!("Skipping road curve with non-finite control points");
                continue;
            }
            let points = sample_quadratic(s, m, e, settings.curve_samples);
            segments.extend(points.windows(2).map(|w| RoadSegment::new(w[0], w[1])));
        }
        let authored = segments.len();
        segments.extend(grid_roads(blocks));
        log::info!(
            "Built {} road segments ({} authored, {} grid)",
            segments.len(),
            authored,
            segments.len() - authored
        );
        Self { segments }
    }

    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// (x, z) lies strictly within `tolerance` of some segment.
    pub fn is_on_road(&self, x: f64, z: f64, tolerance: f64) -> bool {
        let tol_sq = tolerance * tolerance;
        self.segments
            .iter()
            .filter_map(|s| s.distance_squared_xz(x, z))
            .any(|d| d < tol_sq)
    }
}

/// Roads running through the gaps between 2x2 groups of blocks.
///
/// With A = (px, py), B = (px+1, py), C = (px, py+1), D = (px+1, py+1):
/// odd rows give a road from mid A-C to mid B-D, odd columns a road from
/// mid A-B to mid C-D.
fn grid_roads(blocks: &[CityBlock]) -> Vec<RoadSegment> {
    let positions: HashMap<(i64, i64), DVec3> = blocks
        .iter()
        .map(|b| ((b.pixel_x, b.pixel_y), b.position))
        .collect();

    let mut segments = Vec::new();
    for block in blocks {
        let (px, py) = (block.pixel_x, block.pixel_y);
        let a = block.position;
        let (Some(b), Some(c), Some(d)) = (
            positions.get(&(px + 1, py)),
            positions.get(&(px, py + 1)),
            positions.get(&(px + 1, py + 1)),
        ) else {
            continue;
        };

        if py.rem_euclid(2) == 1 {
            segments.push(RoadSegment::new(
                DVec3::new(a.x, 0.0, (a.z + c.z) / 2.0),
                DVec3::new(b.x, 0.0, (b.z + d.z) / 2.0),
            ));
        }
        if px.rem_euclid(2) == 1 {
            segments.push(RoadSegment::new(
                DVec3::new((a.x + b.x) / 2.0, 0.0, a.z),
                DVec3::new((c.x + d.x) / 2.0, 0.0, c.z),
            ));
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(px: i64, py: i64) -> CityBlock {
        CityBlock {
            pixel_x: px,
            pixel_y: py,
            position: DVec3::new(px as f64 * 100.0, 5.0, py as f64 * 100.0),
            layout_id: "l".to_string(),
            yaw_degrees: 0.0,
            level: 0,
        }
    }

    #[test]
    fn test_curve_sampled_into_segments() {
        let curve = RoadCurve { s: [0.0, 0.0, 0.0], m: [50.0, 0.0, 0.0], e: [100.0, 0.0, 0.0] };
        let net = RoadNetwork::build(&[curve], &[], &RoadSettings::default());
        assert_eq!(net.len(), 4);
        assert_eq!(net.segments()[0].start, DVec3::ZERO);
        assert_eq!(net.segments()[3].end, DVec3::new(100.0, 0.0, 0.0));
        assert!(net.is_on_road(60.0, 9.0, 10.0));
        assert!(!net.is_on_road(60.0, 10.0, 10.0));
        assert!(!net.is_on_road(115.0, 0.0, 10.0));
    }

    #[test]
    fn test_degenerate_segments_ignored() {
        let net = RoadNetwork { segments: vec![RoadSegment::new(DVec3::ONE, DVec3::ONE)] };
        assert!(!net.is_on_road(1.0, 1.0, 10.0));
    }

    #[test]
    fn test_grid_roads_from_block_gaps() {
        // 2x2 group at odd row and odd column produces both road kinds
        let blocks = vec![block(1, 1), block(2, 1), block(1, 2), block(2, 2)];
        let net = RoadNetwork::build(&[], &blocks, &RoadSettings::default());
        assert_eq!(
            net.segments(),
            &[
                RoadSegment::new(DVec3::new(100.0, 0.0, 150.0), DVec3::new(200.0, 0.0, 150.0)),
                RoadSegment::new(DVec3::new(150.0, 0.0, 100.0), DVec3::new(150.0, 0.0, 200.0)),
            ]
        );
    }

    #[test]
    fn test_even_group_has_no_grid_road() {
        let blocks = vec![block(0, 0), block(1, 0), block(0, 1), block(1, 1)];
        assert!(RoadNetwork::build(&[], &blocks, &RoadSettings::default()).is_empty());
        // Missing neighbour
        let blocks = vec![block(1, 1), block(2, 1), block(1, 2)];
        assert!(RoadNetwork::build(&[], &blocks, &RoadSettings::default()).is_empty());
    }
}
