//! Elevation range fit from ground-truth anchor points
//!
//! Road control points sit on the terrain, so pairs of (normalized sample,
//! authored Y) constrain the linear mapping `y = scale * r + offset`.

use crate::heightmap::ElevationRange;

/// Maximum number of anchors considered.
pub const MAX_ANCHORS: usize = 400;
/// Minimum anchors needed before a fit is attempted.
const MIN_ANCHORS: usize = 3;
/// Anchor count from which the worst residuals are trimmed.
const TRIM_FROM: usize = 10;
/// Residual quantile kept when trimming.
const TRIM_QUANTILE: f64 = 0.8;

/// Linear fit of world elevation against normalized samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeFit {
    pub scale: f64,
    pub offset: f64,
    /// Anchors used by the final fit
    pub anchors: usize,
}

impl RangeFit {
    /// The elevation range implied by the fit, if it is usable.
    pub fn range(&self) -> Option<ElevationRange> {
        let min = self.offset;
        let max = self.offset + self.scale;
        (min.is_finite() && max.is_finite() && max > min).then(|| ElevationRange::new(min, max))
    }
}

/// Ordinary least squares of `y` on `r` with intercept. `None` when the
/// samples do not determine a line.
fn least_squares(pairs: &[(f64, f64)]) -> Option<(f64, f64)> {
    let n = pairs.len() as f64;
    let (mut sr, mut sy, mut srr, mut sry) = (0.0, 0.0, 0.0, 0.0);
    for &(r, y) in pairs {
        sr += r;
        sy += y;
        srr += r * r;
        sry += r * y;
    }
    let denom = n * srr - sr * sr;
    if denom.abs() < f64::EPSILON {
        return None;
    }
    let scale = (n * sry - sr * sy) / denom;
    let offset = (sy - scale * sr) / n;
    Some((scale, offset))
}

/// Linear-interpolated quantile of `values` (`q` in [0, 1]).
fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Fit `y = scale * r + offset` over `(r, y)` pairs. Non-finite pairs are
/// ignored. With enough anchors the worst 20% of residuals are dropped and
/// the line refit.
pub fn fit_elevation_range(pairs: &[(f64, f64)]) -> Option<RangeFit> {
    let pairs: Vec<(f64, f64)> = pairs
        .iter()
        .copied()
        .filter(|(r, y)| r.is_finite() && y.is_finite())
        .take(MAX_ANCHORS)
        .collect();
    if pairs.len() < MIN_ANCHORS {
        return None;
    }

    let (mut scale, mut offset) = least_squares(&pairs)?;
    let mut used = pairs.len();

    if pairs.len() >= TRIM_FROM {
        let residuals: Vec<f64> = pairs.iter().map(|&(r, y)| (y - (scale * r + offset)).abs()).collect();
        let threshold = quantile(&residuals, TRIM_QUANTILE);
        let kept: Vec<(f64, f64)> = pairs
            .iter()
            .zip(&residuals)
            .filter(|(_, res)| **res <= threshold)
            .map(|(p, _)| *p)
            .collect();
        if kept.len() >= MIN_ANCHORS {
            if let Some((s, o)) = least_squares(&kept) {
                scale = s;
                offset = o;
                used = kept.len();
            }
        }
    }

    Some(RangeFit { scale, offset, anchors: used })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line_recovered() {
        let pairs: Vec<(f64, f64)> = (0..5).map(|i| {
            let r = i as f64 * 0.2;
            (r, r * 2000.0 - 50.0)
        }).collect();
        let fit = fit_elevation_range(&pairs).expect("fit");
        assert!((fit.scale - 2000.0).abs() < 1e-6);
        assert!((fit.offset + 50.0).abs() < 1e-6);
        let range = fit.range().expect("range");
        assert!((range.min + 50.0).abs() < 1e-6);
        assert!((range.max - 1950.0).abs() < 1e-6);
    }

    #[test]
    fn test_outliers_trimmed() {
        let mut pairs: Vec<(f64, f64)> = (0..20).map(|i| {
            let r = i as f64 / 20.0;
            (r, r * 1000.0)
        }).collect();
        // Two anchors on bridges far above the terrain
        pairs[3].1 += 800.0;
        pairs[15].1 += 900.0;
        let fit = fit_elevation_range(&pairs).expect("fit");
        assert!(fit.anchors < 20);
        assert!((fit.scale - 1000.0).abs() < 1.0, "scale {}", fit.scale);
        assert!(fit.offset.abs() < 1.0, "offset {}", fit.offset);
    }

    #[test]
    fn test_too_few_or_degenerate() {
        assert!(fit_elevation_range(&[(0.1, 10.0), (0.2, 20.0)]).is_none());
        assert!(fit_elevation_range(&[(0.5, 10.0), (0.5, 20.0), (0.5, 30.0)]).is_none());
    }

    #[test]
    fn test_inverted_fit_has_no_range() {
        let pairs = [(0.0, 100.0), (0.5, 50.0), (1.0, 0.0)];
        let fit = fit_elevation_range(&pairs).expect("fit");
        assert!(fit.range().is_none());
    }

    #[test]
    fn test_quantile_interpolates() {
        assert!((quantile(&[5.0, 1.0, 3.0, 2.0, 4.0], 0.8) - 4.2).abs() < 1e-12);
    }
}
