//! McNemar's test statistics

use crate::types::{ContingencyCounts, McNemarMethod, McNemarOptions, McNemarResult};
use classic_core::math::{binomial_probability, erf, norm_inv};
use classic_core::{validate_alpha, ConfidenceInterval, Error, Result};
use tracing::{debug, instrument};

/// Added to empty discordant cells before taking the log odds ratio
pub const HALDANE_CORRECTION: f64 = 0.5;

/// Two-sided exact binomial p-value for `b` vs `c` discordant pairs
///
/// Doubles the smaller tail of `Binomial(b + c, 0.5)` and caps at 1.
/// `NaN` when there are no discordant pairs.
pub fn exact_binomial_p_value(b: u64, c: u64) -> f64 {
    let discordant = b + c;
    if discordant == 0 {
        return f64::NAN;
    }
    let tail: f64 = (0..=b.min(c))
        .map(|i| binomial_probability(i, discordant, 0.5))
        .sum();
    (2.0 * tail).min(1.0)
}

/// Upper tail of the chi-square distribution with one degree of freedom
pub fn chi_square_p_value(chi_square: f64) -> f64 {
    if !chi_square.is_finite() {
        return f64::NAN;
    }
    1.0 - erf((chi_square / 2.0).sqrt())
}

/// Test marginal homogeneity of a paired 2x2 table
///
/// # Errors
/// * [`Error::InsufficientData`] for an empty table
/// * [`Error::InvalidParameter`] for an alpha outside (0, 1)
#[instrument(skip(options), fields(method = ?options.method))]
pub fn mcnemar_test(counts: &ContingencyCounts, options: &McNemarOptions) -> Result<McNemarResult> {
    let total = counts.total();
    if total == 0 {
        return Err(Error::InsufficientData {
            expected: 1,
            actual: 0,
        });
    }
    let alpha = validate_alpha(options.alpha)?;

    let b = counts.a_only_positive;
    let c = counts.b_only_positive;
    let discordant = b + c;
    let total_f = total as f64;
    let net_difference = c as i64 - b as i64;

    let (chi_square, chi_square_corrected) = if discordant > 0 {
        let gap = b.abs_diff(c) as f64;
        let d = discordant as f64;
        (gap * gap / d, (gap - 1.0).powi(2) / d)
    } else {
        (f64::NAN, f64::NAN)
    };
    let chi_square_p = chi_square_p_value(chi_square);
    let chi_square_corrected_p = chi_square_p_value(chi_square_corrected);
    let exact_p_value = exact_binomial_p_value(b, c);

    let adjusted_b = if b == 0 { HALDANE_CORRECTION } else { b as f64 };
    let adjusted_c = if c == 0 { HALDANE_CORRECTION } else { c as f64 };
    let log_or = (adjusted_c / adjusted_b).ln();
    let log_odds_ratio_se = (1.0 / adjusted_b + 1.0 / adjusted_c).sqrt();
    let level = options.confidence_level;
    let margin = norm_inv(level.upper_quantile())? * log_odds_ratio_se;
    let odds_ratio = log_or.exp();
    let odds_ratio_interval = ConfidenceInterval::new(
        (log_or - margin).exp(),
        (log_or + margin).exp(),
        odds_ratio,
        level.value(),
    );

    let (statistic, p_value) = match options.method {
        McNemarMethod::ChiSquareCorrected => (chi_square_corrected, chi_square_corrected_p),
        McNemarMethod::ChiSquare => (chi_square, chi_square_p),
        McNemarMethod::Exact => (exact_p_value, exact_p_value),
    };

    debug!(
        "McNemar b={}, c={}, statistic={:.4}, p={:.4}",
        b, c, statistic, p_value
    );

    Ok(McNemarResult {
        counts: *counts,
        total,
        discordant,
        net_difference,
        net_share: net_difference as f64 / total_f,
        discordant_share: discordant as f64 / total_f,
        a_positive_rate: counts.a_positive() as f64 / total_f,
        b_positive_rate: counts.b_positive() as f64 / total_f,
        chi_square,
        chi_square_p_value: chi_square_p,
        chi_square_corrected,
        chi_square_corrected_p_value: chi_square_corrected_p,
        exact_p_value,
        odds_ratio,
        log_odds_ratio_se,
        odds_ratio_interval,
        method: options.method,
        statistic,
        p_value,
        alpha,
        significant: p_value < alpha,
    })
}
