//! One-way ANOVA from group summaries

use crate::groups::validate_groups;
use crate::tukey::{pairwise_comparisons, tukey_critical};
use crate::types::{AnovaOptions, AnovaResult, GroupInterval, GroupSummary};
use classic_core::math::{f_cdf, inverse_f_cdf, t_critical_approx};
use classic_core::{validate_alpha, ConfidenceInterval, ConfidenceLevel, Result};
use tracing::{debug, instrument};

/// Run a one-way ANOVA with Tukey HSD contrasts
///
/// Sums of squares come straight from the summaries:
/// `SSb = Σ n_i (mean_i - grand)²` and `SSw = Σ (n_i - 1) sd_i²`.
///
/// # Errors
/// * any error from [`validate_groups`]
/// * [`classic_core::Error::InvalidParameter`] for an alpha outside (0, 1)
#[instrument(skip(groups, options), fields(k = groups.len()))]
pub fn one_way_anova(groups: &[GroupSummary], options: &AnovaOptions) -> Result<AnovaResult> {
    validate_groups(groups)?;
    let alpha = validate_alpha(options.alpha)?;

    let k = groups.len();
    let total_n: usize = groups.iter().map(|g| g.n).sum();
    let grand_mean = groups.iter().map(|g| g.n as f64 * g.mean).sum::<f64>() / total_n as f64;
    let equal_weight_mean = groups.iter().map(|g| g.mean).sum::<f64>() / k as f64;

    let ss_between: f64 = groups
        .iter()
        .map(|g| g.n as f64 * (g.mean - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .map(|g| (g.n - 1) as f64 * g.sd * g.sd)
        .sum();
    let ss_total = ss_between + ss_within;

    let df_between = k - 1;
    let df_within = total_n - k;
    let df_total = total_n - 1;

    let ms_between = mean_square(ss_between, df_between);
    let ms_within = mean_square(ss_within, df_within);
    let f_statistic = if ms_within > 0.0 {
        ms_between / ms_within
    } else {
        f64::NAN
    };
    let (d1, d2) = (df_between as f64, df_within as f64);
    let p_value = if f_statistic.is_finite() {
        1.0 - f_cdf(f_statistic, d1, d2)
    } else {
        f64::NAN
    };
    let f_critical = inverse_f_cdf(1.0 - alpha, d1, d2);

    let (eta_squared, omega_squared) = if ss_total > 0.0 {
        (
            ss_between / ss_total,
            (ss_between - d1 * ms_within) / (ss_total + ms_within),
        )
    } else {
        (f64::NAN, f64::NAN)
    };

    debug!(
        "F({}, {}) = {:.4}, p = {:.4}, eta² = {:.4}",
        df_between, df_within, f_statistic, p_value, eta_squared
    );

    let tukey = tukey_critical(alpha, k, d2, options.tukey_method);
    let comparisons = pairwise_comparisons(groups, ms_within, tukey, None);

    Ok(AnovaResult {
        k,
        total_n,
        grand_mean,
        equal_weight_mean,
        ss_between,
        ss_within,
        ss_total,
        df_between,
        df_within,
        df_total,
        ms_between,
        ms_within,
        f_statistic,
        p_value,
        f_critical,
        alpha,
        significant: p_value < alpha,
        eta_squared,
        omega_squared,
        group_intervals: intervals_at(groups, options.confidence_level, d2)?,
        tukey_method: options.tukey_method,
        tukey_critical: tukey,
        comparisons,
    })
}

/// Group mean intervals at several confidence levels
///
/// Each entry pairs a level with one interval per group, using the pooled
/// `df_within` for the t critical value.
pub fn group_intervals(
    groups: &[GroupSummary],
    levels: &[ConfidenceLevel],
) -> Result<Vec<(ConfidenceLevel, Vec<GroupInterval>)>> {
    validate_groups(groups)?;
    let total_n: usize = groups.iter().map(|g| g.n).sum();
    let df_within = (total_n - groups.len()) as f64;
    levels
        .iter()
        .map(|&level| Ok((level, intervals_at(groups, level, df_within)?)))
        .collect()
}

fn intervals_at(
    groups: &[GroupSummary],
    level: ConfidenceLevel,
    df_within: f64,
) -> Result<Vec<GroupInterval>> {
    let critical_value = t_critical_approx(1.0 - level.alpha() / 2.0, df_within)?;
    Ok(groups
        .iter()
        .map(|g| {
            let standard_error = g.standard_error();
            GroupInterval {
                name: g.name.clone(),
                n: g.n,
                mean: g.mean,
                standard_error,
                critical_value,
                interval: ConfidenceInterval::symmetric(
                    g.mean,
                    critical_value * standard_error,
                    level.value(),
                ),
            }
        })
        .collect())
}

fn mean_square(ss: f64, df: usize) -> f64 {
    if df == 0 {
        f64::NAN
    } else {
        ss / df as f64
    }
}
