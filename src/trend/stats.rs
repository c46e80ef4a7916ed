//! Descriptive statistics over prediction history
//!
//! Means and sample standard deviations go through `statrs`, which yields
//! NaN for empty input (and for std with fewer than two values). Callers
//! treat NaN as "undefined", never as a number.

use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

use crate::types::PredictionRecord;

pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Sample standard deviation (n-1 denominator)
pub fn sample_std(values: &[f64]) -> f64 {
    values.iter().std_dev()
}

/// Share of records predicted as failure; 0 for an empty slice
pub fn failure_rate(records: &[PredictionRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().filter(|r| r.is_failure()).count() as f64 / records.len() as f64
}

/// Trailing mean over `window` values, using whatever is available at the
/// start of the series (minimum one value).
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        out.push(sum / (i + 1).min(window) as f64);
    }
    out
}

/// Pearson correlation over pairwise-complete observations.
///
/// Returns `(r, n)` where `n` is the number of complete pairs, or None when
/// fewer than two pairs exist or either side has zero variance.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<(f64, usize)> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .unzip();

    let n = xs.len();
    if n < 2 {
        return None;
    }

    let mean_x = mean(&xs);
    let mean_y = mean(&ys);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in xs.iter().zip(ys.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    // Rounding leaves a tiny residual on constant series
    let scale_x = xs.iter().map(|v| v * v).sum::<f64>().max(1.0);
    let scale_y = ys.iter().map(|v| v * v).sum::<f64>().max(1.0);
    if sxx <= 1e-12 * scale_x || syy <= 1e-12 * scale_y {
        return None;
    }

    Some(((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0), n))
}

/// Two-tailed p-value for a Pearson coefficient from `n` pairs.
///
/// t = r × sqrt(n-2) / sqrt(1-r²), Student's t with n-2 degrees of freedom.
pub fn p_value_for_r(r: f64, n: usize) -> Option<f64> {
    if n < 3 {
        return None;
    }
    if r.abs() >= 0.9999 {
        return Some(0.0);
    }

    let df = (n - 2) as f64;
    let t_stat = r * df.sqrt() / (1.0 - r * r).sqrt();
    StudentsT::new(0.0, 1.0, df)
        .ok()
        .map(|dist| 2.0 * (1.0 - dist.cdf(t_stat.abs())))
}
