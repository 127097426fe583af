//! Descriptive statistics on plain `f64` slices
//!
//! Functions here never fail: undefined results (empty input, a single
//! observation, zero spread) come back as `NaN` so callers can keep the rest
//! of a result struct valid.

use ordered_float::OrderedFloat;

/// Arithmetic mean; `NaN` for empty input
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with the `n - 1` denominator; `NaN` for fewer than two values
pub fn variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|&v| (v - m) * (v - m)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation; `NaN` for fewer than two values
pub fn standard_deviation(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Sample covariance of index-aligned pairs
///
/// Only the first `min(x.len(), y.len())` pairs are used.
pub fn covariance(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);
    x.iter()
        .zip(y)
        .map(|(&a, &b)| (a - mx) * (b - my))
        .sum::<f64>()
        / (n - 1) as f64
}

/// 1-based ranks with mid-rank tie handling
///
/// Tied values all receive the mean of the ranks they would occupy, and the
/// output is aligned with the input order.
pub fn rank_values(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by_key(|&i| OrderedFloat(values[i]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1 ..= end
        let average = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = average;
        }
        start = end;
    }
    ranks
}

/// Adjusted Fisher-Pearson skewness
///
/// `n / ((n-1)(n-2)) * Σ((x - mean)/sd)³`; `NaN` when `n < 3` or the
/// standard deviation is zero.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return f64::NAN;
    }
    let m = mean(values);
    let sd = standard_deviation(values);
    if !sd.is_finite() || sd == 0.0 {
        return f64::NAN;
    }
    let sum: f64 = values.iter().map(|&v| ((v - m) / sd).powi(3)).sum();
    let n = n as f64;
    n / ((n - 1.0) * (n - 2.0)) * sum
}

/// Median; `NaN` for empty input
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by_key(|&v| OrderedFloat(v));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Standard scores `(x - mean) / sd`; all `NaN` when the spread is zero
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = standard_deviation(values);
    if !sd.is_finite() || sd == 0.0 {
        return vec![f64::NAN; values.len()];
    }
    values.iter().map(|&v| (v - m) / sd).collect()
}

/// Five-number style summary of a sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryStats {
    /// Number of observations
    pub n: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub median: f64,
    /// Sample standard deviation
    pub sd: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

/// Summarize a sample
pub fn summarize(values: &[f64]) -> SummaryStats {
    let (min, max) = if values.is_empty() {
        (f64::NAN, f64::NAN)
    } else {
        values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    };
    SummaryStats {
        n: values.len(),
        mean: mean(values),
        median: median(values),
        sd: standard_deviation(values),
        min,
        max,
    }
}

/// Single-pass mean and variance accumulator (Welford)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Number of observations seen
    pub fn count(&self) -> usize {
        self.count
    }

    /// Running mean; `NaN` when empty
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Sample variance; `NaN` for fewer than two observations
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Sample standard deviation
    pub fn sd(&self) -> f64 {
        self.variance().sqrt()
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_and_variance() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&data), 5.0);
        assert_abs_diff_eq!(variance(&data), 32.0 / 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(standard_deviation(&data), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs_are_nan() {
        assert!(mean(&[]).is_nan());
        assert!(variance(&[1.0]).is_nan());
        assert!(standard_deviation(&[]).is_nan());
        assert!(covariance(&[1.0], &[2.0]).is_nan());
        assert!(skewness(&[1.0, 2.0]).is_nan());
        assert!(skewness(&[3.0, 3.0, 3.0, 3.0]).is_nan());
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn test_covariance() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert_abs_diff_eq!(covariance(&x, &y), 2.0 * variance(&x), epsilon = 1e-12);
    }

    #[test]
    fn test_rank_values_with_ties() {
        let ranks = rank_values(&[10.0, 20.0, 20.0, 5.0, 30.0]);
        assert_eq!(ranks, vec![2.0, 3.5, 3.5, 1.0, 5.0]);

        let all_tied = rank_values(&[7.0, 7.0, 7.0]);
        assert_eq!(all_tied, vec![2.0, 2.0, 2.0]);

        assert!(rank_values(&[]).is_empty());
    }

    #[test]
    fn test_skewness() {
        // Symmetric data has zero skew
        assert_abs_diff_eq!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]), 0.0, epsilon = 1e-12);
        // Right tail gives positive skew: 1, 2, 3, 10
        let s = skewness(&[1.0, 2.0, 3.0, 10.0]);
        assert!(s > 1.5, "skew = {s}");
    }

    #[test]
    fn test_median() {
        assert_abs_diff_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_abs_diff_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(summary.n, 4);
        assert_abs_diff_eq!(summary.mean, 2.5);
        assert_abs_diff_eq!(summary.median, 2.5);
        assert_abs_diff_eq!(summary.min, 1.0);
        assert_abs_diff_eq!(summary.max, 4.0);

        let empty = summarize(&[]);
        assert_eq!(empty.n, 0);
        assert!(empty.min.is_nan() && empty.max.is_nan());
    }

    #[test]
    fn test_z_scores() {
        let z = z_scores(&[1.0, 2.0, 3.0]);
        assert_abs_diff_eq!(z[0], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z[2], 1.0, epsilon = 1e-12);
        assert!(z_scores(&[2.0, 2.0]).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_running_stats_matches_batch() {
        let data = [12.5, 9.0, 14.25, 11.0, 10.5, 13.75];
        let running: RunningStats = data.iter().copied().collect();
        assert_eq!(running.count(), data.len());
        assert_abs_diff_eq!(running.mean(), mean(&data), epsilon = 1e-12);
        assert_abs_diff_eq!(running.variance(), variance(&data), epsilon = 1e-12);
        assert_abs_diff_eq!(running.sd(), standard_deviation(&data), epsilon = 1e-12);

        let empty = RunningStats::new();
        assert!(empty.mean().is_nan());
        assert!(empty.variance().is_nan());
    }
}
