//! Regression of a numeric outcome on a single categorical predictor
//!
//! Equivalent to dummy-coded OLS with one reference level: the intercept is
//! the reference mean and each coefficient is a level's difference from it.

use classic_core::descriptive::RunningStats;
use classic_core::math::{norm_cdf, norm_inv};
use classic_core::{validate_alpha, Alternative, ConfidenceInterval, Error, Result};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Per-level descriptive summary
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelSummary {
    pub level: String,
    pub n: usize,
    pub mean: f64,
    /// Sample SD; `NaN` for a single observation
    pub sd: f64,
    /// `mean - z * sd / sqrt(n)` at the fit's alpha
    pub ci_lower: f64,
    /// `mean + z * sd / sqrt(n)` at the fit's alpha
    pub ci_upper: f64,
}

/// Difference of one level from the reference level
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelEffect {
    pub level: String,
    /// `mean(level) - mean(reference)`
    pub difference: f64,
    pub standard_error: f64,
    pub t_statistic: f64,
    /// Two-sided, normal approximation
    pub p_value: f64,
    pub interval: ConfidenceInterval,
}

/// Result of [`categorical_regression`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoricalRegressionResult {
    pub reference: String,
    /// Reference mean
    pub intercept: f64,
    /// Levels by descending frequency
    pub levels: Vec<LevelSummary>,
    /// One entry per non-reference level, in `levels` order
    pub effects: Vec<LevelEffect>,
    pub n: usize,
    pub grand_mean: f64,
    pub ss_total: f64,
    /// Pooled within-level sum of squares
    pub sse: f64,
    pub r_squared: f64,
    /// `N - k`
    pub df: usize,
    pub pooled_variance: f64,
    pub alpha: f64,
}

impl CategoricalRegressionResult {
    pub fn level(&self, name: &str) -> Option<&LevelSummary> {
        self.levels.iter().find(|l| l.level == name)
    }

    pub fn effect(&self, name: &str) -> Option<&LevelEffect> {
        self.effects.iter().find(|e| e.level == name)
    }
}

/// Fit `y` against the levels in `labels`
///
/// Levels are ordered by frequency, most frequent first, with ties kept in
/// order of first appearance. The reference defaults to the most frequent
/// level.
///
/// # Errors
/// * [`Error::InvalidInput`] for mismatched lengths, non-finite outcomes or
///   an unknown reference level
/// * [`Error::InsufficientData`] when fewer than two levels are present
/// * [`Error::InvalidParameter`] for an alpha outside (0, 1)
#[instrument(skip(labels, y), fields(n = y.len()))]
pub fn categorical_regression<S: AsRef<str>>(
    labels: &[S],
    y: &[f64],
    reference: Option<&str>,
    alpha: f64,
) -> Result<CategoricalRegressionResult> {
    if labels.len() != y.len() {
        return Err(Error::size_mismatch(labels.len(), y.len(), "labels and outcome"));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(Error::non_finite("outcome"));
    }
    let alpha = validate_alpha(alpha)?;

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, RunningStats)> = Vec::new();
    for (label, &value) in labels.iter().zip(y) {
        let label = label.as_ref();
        let slot = *index.entry(label).or_insert_with(|| {
            groups.push((label.to_string(), RunningStats::new()));
            groups.len() - 1
        });
        groups[slot].1.push(value);
    }
    if groups.len() < 2 {
        return Err(Error::InsufficientData {
            expected: 2,
            actual: groups.len(),
        });
    }
    // stable sort keeps first-appearance order among ties
    groups.sort_by(|a, b| b.1.count().cmp(&a.1.count()));

    let z_crit = norm_inv(1.0 - alpha / 2.0)?;
    let levels: Vec<LevelSummary> = groups
        .iter()
        .map(|(name, stats)| {
            let margin = z_crit * stats.sd() / (stats.count() as f64).sqrt();
            LevelSummary {
                level: name.clone(),
                n: stats.count(),
                mean: stats.mean(),
                sd: stats.sd(),
                ci_lower: stats.mean() - margin,
                ci_upper: stats.mean() + margin,
            }
        })
        .collect();

    let reference = match reference {
        Some(name) => levels
            .iter()
            .find(|l| l.level == name)
            .ok_or_else(|| Error::InvalidInput(format!("unknown reference level '{name}'")))?,
        None => &levels[0],
    };

    let n = y.len();
    let grand_mean = y.iter().sum::<f64>() / n as f64;
    let ss_total: f64 = y.iter().map(|v| (v - grand_mean).powi(2)).sum();
    let sse: f64 = groups
        .iter()
        .map(|(_, stats)| stats.variance() * (stats.count() - 1) as f64)
        .filter(|ss| !ss.is_nan())
        .sum();
    let r_squared = if ss_total > 0.0 {
        1.0 - sse / ss_total
    } else {
        f64::NAN
    };
    let df = n - levels.len();
    let pooled_variance = if df > 0 { sse / df as f64 } else { f64::NAN };

    let effects: Vec<LevelEffect> = levels
        .iter()
        .filter(|l| l.level != reference.level)
        .map(|l| {
            let difference = l.mean - reference.mean;
            let standard_error =
                (pooled_variance * (1.0 / reference.n as f64 + 1.0 / l.n as f64)).sqrt();
            let t_statistic = difference / standard_error;
            LevelEffect {
                level: l.level.clone(),
                difference,
                standard_error,
                t_statistic,
                p_value: if t_statistic.is_nan() {
                    f64::NAN
                } else {
                    Alternative::TwoSided.p_value(t_statistic, norm_cdf)
                },
                interval: ConfidenceInterval::symmetric(
                    difference,
                    z_crit * standard_error,
                    1.0 - alpha,
                ),
            }
        })
        .collect();

    debug!(
        "categorical regression: {} levels, reference '{}', R²={:.4}",
        levels.len(),
        reference.level,
        r_squared
    );

    Ok(CategoricalRegressionResult {
        reference: reference.level.clone(),
        intercept: reference.mean,
        effects,
        n,
        grand_mean,
        ss_total,
        sse,
        r_squared,
        df,
        pooled_variance,
        alpha,
        levels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> (Vec<&'static str>, Vec<f64>) {
        (
            vec!["b", "a", "a", "c", "a", "b", "c", "a", "b"],
            vec![5.0, 10.0, 12.0, 20.0, 11.0, 7.0, 22.0, 9.0, 6.0],
        )
    }

    #[test]
    fn test_levels_by_frequency() {
        let (labels, y) = sample();
        let result = categorical_regression(&labels, &y, None, 0.05).unwrap();
        let names: Vec<&str> = result.levels.iter().map(|l| l.level.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(result.reference, "a");
        assert_abs_diff_eq!(result.intercept, 10.5, epsilon = 1e-12);
        assert_eq!(result.effects.len(), 2);
        assert_eq!(result.df, 6);
    }

    #[test]
    fn test_effects_against_reference() {
        let (labels, y) = sample();
        let result = categorical_regression(&labels, &y, None, 0.05).unwrap();

        // a: 10, 12, 11, 9 -> ss 5; b: 5, 7, 6 -> ss 2; c: 20, 22 -> ss 2
        assert_abs_diff_eq!(result.sse, 9.0, epsilon = 1e-10);
        assert_abs_diff_eq!(result.pooled_variance, 1.5, epsilon = 1e-10);

        let c = result.effect("c").unwrap();
        assert_abs_diff_eq!(c.difference, 10.5, epsilon = 1e-12);
        let se = (1.5_f64 * (0.25 + 0.5)).sqrt();
        assert_abs_diff_eq!(c.standard_error, se, epsilon = 1e-12);
        assert!(c.p_value < 1e-6);
        assert!(c.interval.contains(10.5));

        let b = result.effect("b").unwrap();
        assert_abs_diff_eq!(b.difference, -4.5, epsilon = 1e-12);
        assert!(result.r_squared > 0.95);
    }

    #[test]
    fn test_level_mean_intervals() {
        let (labels, y) = sample();
        let result = categorical_regression(&labels, &y, None, 0.05).unwrap();
        let a = result.level("a").unwrap();
        // a: 10, 12, 11, 9 -> mean 10.5, variance 5/3
        let margin = 1.959964 * (5.0_f64 / 3.0).sqrt() / 2.0;
        assert_abs_diff_eq!(a.ci_lower, 10.5 - margin, epsilon = 1e-5);
        assert_abs_diff_eq!(a.ci_upper, 10.5 + margin, epsilon = 1e-5);

        let narrower = categorical_regression(&labels, &y, None, 0.10).unwrap();
        let c = narrower.level("c").unwrap();
        // c: 20, 22 -> sd sqrt(2)
        assert_abs_diff_eq!(c.ci_upper - c.mean, 1.644854, epsilon = 1e-5);
        let wide = result.level("c").unwrap();
        assert!(c.ci_upper - c.ci_lower < wide.ci_upper - wide.ci_lower);
    }

    #[test]
    fn test_explicit_reference() {
        let (labels, y) = sample();
        let result = categorical_regression(&labels, &y, Some("c"), 0.05).unwrap();
        assert_eq!(result.reference, "c");
        assert_abs_diff_eq!(result.intercept, 21.0, epsilon = 1e-12);
        assert!(result.effect("c").is_none());
        assert_abs_diff_eq!(result.effect("a").unwrap().difference, -10.5, epsilon = 1e-12);
        // pooled fit is unchanged by the choice of reference
        assert_abs_diff_eq!(result.sse, 9.0, epsilon = 1e-10);
    }

    #[test]
    fn test_singleton_level() {
        let labels = ["x", "x", "x", "y"];
        let y = [1.0, 2.0, 3.0, 10.0];
        let result = categorical_regression(&labels, &y, None, 0.05).unwrap();
        let singleton = result.level("y").unwrap();
        assert!(singleton.sd.is_nan());
        assert!(singleton.ci_lower.is_nan() && singleton.ci_upper.is_nan());
        assert_abs_diff_eq!(result.sse, 2.0, epsilon = 1e-12);
        assert_eq!(result.df, 2);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            categorical_regression(&["a", "a"], &[1.0, 2.0], None, 0.05),
            Err(Error::InsufficientData { expected: 2, actual: 1 })
        ));
        assert!(categorical_regression(&["a", "b"], &[1.0], None, 0.05).is_err());
        assert!(matches!(
            categorical_regression(&["a", "b"], &[1.0, 2.0], Some("z"), 0.05),
            Err(Error::InvalidInput(_))
        ));
        assert!(categorical_regression(&["a", "b"], &[1.0, 2.0], None, 0.0).is_err());
    }
}
