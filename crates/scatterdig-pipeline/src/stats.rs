//! Summary statistics over extracted points.

use serde::{Deserialize, Serialize};

use crate::types::DataPoint;

/// Aggregates of the data-space coordinates of a point set.
///
/// Standard deviations are population values; covariance is the sample
/// (n − 1) value. Everything is zero for an empty set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub x_mean: f64,
    pub x_std: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_mean: f64,
    pub y_std: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Pearson correlation; zero with fewer than two points or when
    /// either axis has no spread.
    pub correlation: f64,
    /// Sample covariance; zero with fewer than two points.
    pub covariance: f64,
}

#[derive(Debug, Clone, Copy)]
struct Moments1d {
    mean: f64,
    /// Sum of squared deviations from the mean.
    ss: f64,
    min: f64,
    max: f64,
}

#[allow(clippy::cast_precision_loss)]
fn moments(values: &[f64]) -> Moments1d {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    Moments1d {
        mean,
        ss: values.iter().map(|v| (v - mean).powi(2)).sum(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Compute [`Statistics`] for `points`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_statistics(points: &[DataPoint]) -> Statistics {
    if points.is_empty() {
        return Statistics::default();
    }

    let xs: Vec<f64> = points.iter().map(|p| p.data_x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.data_y).collect();
    let (mx, my) = (moments(&xs), moments(&ys));
    let n = points.len() as f64;

    let (correlation, covariance) = if points.len() < 2 {
        (0.0, 0.0)
    } else {
        let sxy: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (x - mx.mean) * (y - my.mean))
            .sum();
        let denom = (mx.ss * my.ss).sqrt();
        let correlation = if denom > 0.0 { sxy / denom } else { 0.0 };
        (correlation, sxy / (n - 1.0))
    };

    Statistics {
        count: points.len(),
        x_mean: mx.mean,
        x_std: (mx.ss / n).sqrt(),
        x_min: mx.min,
        x_max: mx.max,
        y_mean: my.mean,
        y_std: (my.ss / n).sqrt(),
        y_min: my.min,
        y_max: my.max,
        correlation,
        covariance,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn points(values: &[(f64, f64)]) -> Vec<DataPoint> {
        values
            .iter()
            .map(|&(x, y)| DataPoint {
                pixel_x: 0,
                pixel_y: 0,
                data_x: x,
                data_y: y,
            })
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_set_is_all_zero() {
        assert_eq!(compute_statistics(&[]), Statistics::default());
    }

    #[test]
    fn single_point_has_no_correlation() {
        let s = compute_statistics(&points(&[(3.0, 4.5)]));
        assert_eq!(s.count, 1);
        assert!(close(s.x_mean, 3.0) && close(s.y_mean, 4.5));
        assert!(close(s.x_std, 0.0) && close(s.y_std, 0.0));
        assert!(close(s.x_min, 3.0) && close(s.x_max, 3.0));
        assert!(close(s.correlation, 0.0) && close(s.covariance, 0.0));
    }

    #[test]
    fn perfect_line_correlates() {
        let s = compute_statistics(&points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]));
        assert_eq!(s.count, 3);
        assert!(close(s.x_mean, 2.0));
        assert!(close(s.y_mean, 4.0));
        // Population std: sqrt(2/3).
        assert!(close(s.x_std, (2.0_f64 / 3.0).sqrt()));
        assert!(close(s.correlation, 1.0));
        // Sample covariance: (1·2 + 0 + 1·2) / 2.
        assert!(close(s.covariance, 2.0));
        assert!(close(s.y_min, 2.0) && close(s.y_max, 6.0));
    }

    #[test]
    fn anticorrelation_is_negative() {
        let s = compute_statistics(&points(&[(0.0, 10.0), (5.0, 5.0), (10.0, 0.0)]));
        assert!(close(s.correlation, -1.0));
        assert!(s.covariance < 0.0);
    }

    #[test]
    fn flat_axis_has_zero_correlation() {
        let s = compute_statistics(&points(&[(1.0, 7.0), (2.0, 7.0), (4.0, 7.0)]));
        assert!(close(s.correlation, 0.0));
        assert!(close(s.covariance, 0.0));
        assert!(close(s.y_std, 0.0));
    }

    #[test]
    fn statistics_serialize_flat() {
        let s = compute_statistics(&points(&[(1.0, 2.0), (3.0, 4.0)]));
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["count"], 2);
        assert!(json.get("x_mean").is_some());
        assert!(json.get("covariance").is_some());
    }
}
