//! Quadratic Bézier curve sampling

use crate::core::types::DVec3;

/// Point on the quadratic curve through start `s`, control `m`, end `e`.
/// `t` is clamped to [0, 1].
pub fn quadratic_point(s: DVec3, m: DVec3, e: DVec3, t: f64) -> DVec3 {
    let t = t.clamp(0.0, 1.0);
    let a = s + t * (m - s);
    let b = m + t * (e - m);
    a + t * (b - a)
}

/// `count` evenly spaced parameters from 0 to 1 inclusive.
pub fn linspace_unit(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = 1.0 / (count - 1) as f64;
            let mut ts: Vec<f64> = (0..count).map(|i| i as f64 * step).collect();
            ts[count - 1] = 1.0;
            ts
        }
    }
}

/// Sample the curve at `count` parameters.
pub fn sample_quadratic(s: DVec3, m: DVec3, e: DVec3, count: usize) -> Vec<DVec3> {
    linspace_unit(count)
        .into_iter()
        .map(|t| quadratic_point(s, m, e, t))
        .collect()
}
