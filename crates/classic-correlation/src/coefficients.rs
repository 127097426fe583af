//! Pearson and Spearman coefficients

use classic_core::descriptive::{mean, rank_values, standard_deviation};
use classic_core::{Error, Result};

/// Minimum number of pairs for a coefficient
pub const MIN_PAIRS: usize = 3;

pub(crate) fn check_paired(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::size_mismatch(x.len(), y.len(), "paired sample"));
    }
    Ok(())
}

/// Pearson product-moment correlation
///
/// `Σ(x - mx)(y - my) / ((n - 1) sd_x sd_y)`. Returns `Ok(NaN)` for fewer
/// than three pairs or when either variable is constant.
///
/// # Errors
/// [`Error::InvalidInput`] if the slices differ in length.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    check_paired(x, y)?;
    Ok(pearson_unchecked(x, y))
}

/// Spearman rank correlation: Pearson on mid-ranks
pub fn spearman(x: &[f64], y: &[f64]) -> Result<f64> {
    check_paired(x, y)?;
    Ok(spearman_unchecked(x, y))
}

pub(crate) fn pearson_unchecked(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < MIN_PAIRS {
        return f64::NAN;
    }
    let mx = mean(x);
    let my = mean(y);
    let denominator = (n - 1) as f64 * standard_deviation(x) * standard_deviation(y);
    if !denominator.is_finite() || denominator == 0.0 {
        return f64::NAN;
    }
    let numerator: f64 = x.iter().zip(y).map(|(&a, &b)| (a - mx) * (b - my)).sum();
    numerator / denominator
}

pub(crate) fn spearman_unchecked(x: &[f64], y: &[f64]) -> f64 {
    pearson_unchecked(&rank_values(x), &rank_values(y))
}
