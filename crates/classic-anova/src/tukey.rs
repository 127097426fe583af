//! Tukey HSD critical values and pairwise contrasts

use crate::types::{GroupSummary, TukeyComparison, TukeyCriticalMethod};
use classic_core::math::special::log_gamma;
use classic_core::math::{norm_cdf, t_critical_approx};
use std::f64::consts::{LN_2, SQRT_2};
use tracing::debug;

/// Even number of Simpson panels for each integral
const SIMPSON_PANELS: usize = 160;
/// Standard normal integration limit
const Z_LIMIT: f64 = 8.0;
/// Range beyond which the normal range CDF is 1 to double precision
const RANGE_LIMIT: f64 = 8.0;
const BISECTION_TOLERANCE: f64 = 1e-6;
const MAX_BRACKET: f64 = 1e3;

/// Critical value of the HSD statistic `q = |diff| / se`
///
/// Returns `NaN` for fewer than two groups, a non-positive `df_within` or
/// an alpha outside (0, 1).
pub fn tukey_critical(alpha: f64, k: usize, df_within: f64, method: TukeyCriticalMethod) -> f64 {
    if k < 2 || !(df_within > 0.0) || !(alpha > 0.0 && alpha < 1.0) {
        return f64::NAN;
    }
    match method {
        TukeyCriticalMethod::BonferroniT => {
            let comparisons = (k * (k - 1)) as f64;
            let prob = 1.0 - (alpha / comparisons) / 2.0;
            t_critical_approx(prob, df_within)
                .map(|t| t * SQRT_2)
                .unwrap_or(f64::NAN)
        }
        TukeyCriticalMethod::StudentizedRange => {
            studentized_range_quantile(1.0 - alpha, k, df_within)
        }
    }
}

/// CDF of the range of `k` standard normals
fn normal_range_cdf(w: f64, k: usize) -> f64 {
    if w <= 0.0 {
        return 0.0;
    }
    let power = (k - 1) as i32;
    let integrand = |z: f64| {
        let density = (-0.5 * z * z).exp() / (2.0 * std::f64::consts::PI).sqrt();
        density * (norm_cdf(z) - norm_cdf(z - w)).max(0.0).powi(power)
    };
    (k as f64 * simpson(integrand, -Z_LIMIT, Z_LIMIT, SIMPSON_PANELS)).min(1.0)
}

/// CDF of the studentized range with `k` means and `df` error degrees of freedom
///
/// Integrates the normal range CDF against the density of `s = chi_df / sqrt(df)`.
/// The outer integral is split at `s = 8 / q`, below which the range CDF
/// climbs from 0 to 1. Infinite `df` reduces to the normal range.
pub fn studentized_range_cdf(q: f64, k: usize, df: f64) -> f64 {
    if q <= 0.0 {
        return 0.0;
    }
    if !df.is_finite() {
        return normal_range_cdf(q, k);
    }
    let half = df / 2.0;
    let log_norm = half * df.ln() - log_gamma(half) - (half - 1.0) * LN_2;
    let spread = 10.0 / (2.0 * df).sqrt();
    let lo = (1.0 - spread).max(0.0);
    let hi = 1.0 + 2.0 * spread;

    let integrand = |s: f64| {
        if s <= 0.0 {
            return 0.0;
        }
        let log_density = log_norm + (df - 1.0) * s.ln() - half * s * s;
        log_density.exp() * normal_range_cdf(q * s, k)
    };
    let split = (RANGE_LIMIT / q).clamp(lo, hi);
    let total = simpson(&integrand, lo, split, SIMPSON_PANELS)
        + simpson(&integrand, split, hi, SIMPSON_PANELS);
    total.clamp(0.0, 1.0)
}

/// Quantile of the studentized range by bisection
fn studentized_range_quantile(prob: f64, k: usize, df: f64) -> f64 {
    let mut low = 0.0;
    let mut high = 10.0;
    while studentized_range_cdf(high, k, df) < prob {
        high *= 2.0;
        if high > MAX_BRACKET {
            return f64::NAN;
        }
    }
    while high - low > BISECTION_TOLERANCE {
        let mid = 0.5 * (low + high);
        if studentized_range_cdf(mid, k, df) < prob {
            low = mid;
        } else {
            high = mid;
        }
    }
    let q = 0.5 * (low + high);
    debug!("studentized range q({}, {}, {}) = {:.4}", prob, k, df, q);
    q
}

fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, panels: usize) -> f64 {
    let h = (b - a) / panels as f64;
    let inner: f64 = (1..panels)
        .map(|i| {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            weight * f(a + i as f64 * h)
        })
        .sum();
    (f(a) + inner + f(b)) * h / 3.0
}

/// Tukey HSD contrasts between group means
///
/// `pairs` restricts the contrasts to the given index pairs; `None` means
/// every `(i < j)` pair in row-major order. Out-of-range pairs are skipped.
/// Returns an empty list when `ms_within` is not positive.
pub fn pairwise_comparisons(
    groups: &[GroupSummary],
    ms_within: f64,
    q_critical: f64,
    pairs: Option<&[(usize, usize)]>,
) -> Vec<TukeyComparison> {
    if !(ms_within > 0.0) {
        return Vec::new();
    }
    let k = groups.len();
    let all: Vec<(usize, usize)>;
    let selected = match pairs {
        Some(pairs) => pairs,
        None => {
            all = (0..k)
                .flat_map(|i| ((i + 1)..k).map(move |j| (i, j)))
                .collect();
            &all
        }
    };

    selected
        .iter()
        .filter(|&&(i, j)| i < k && j < k && i != j)
        .map(|&(i, j)| {
            let (a, b) = (&groups[i], &groups[j]);
            let difference = a.mean - b.mean;
            let standard_error =
                ((ms_within / 2.0) * (1.0 / a.n as f64 + 1.0 / b.n as f64)).sqrt();
            let q_statistic = difference.abs() / standard_error;
            let margin = q_critical * standard_error;
            TukeyComparison {
                i,
                j,
                group_a: a.name.clone(),
                group_b: b.name.clone(),
                difference,
                standard_error,
                q_statistic,
                margin,
                lower: difference - margin,
                upper: difference + margin,
                significant: q_statistic > q_critical,
            }
        })
        .collect()
}
