//! Significance test and Fisher-z interval for a paired sample

use crate::coefficients::{check_paired, pearson_unchecked, spearman_unchecked, MIN_PAIRS};
use crate::types::{CorrelationMethod, CorrelationOptions, CorrelationResult};
use classic_core::descriptive::{mean, standard_deviation};
use classic_core::math::{norm_inv, t_cdf};
use classic_core::{clamp_alpha, ConfidenceInterval, Error, Result};
use tracing::{debug, instrument};

/// Alpha is clamped into this range before any interval is built
pub const ALPHA_CLAMP: (f64, f64) = (1e-6, 0.5);

/// Largest |r| fed to the Fisher transform
const FISHER_R_LIMIT: f64 = 0.999_999;

/// Test H0: rho = 0 for a paired sample
///
/// The t statistic is `sqrt(df r² / max(1 - r², 1e-12)) sign(r)` with
/// `df = n - 2`. The Fisher-z interval needs more than three pairs; with
/// exactly three its bounds are `NaN` while `r` and the test stay valid.
///
/// # Errors
/// * [`Error::InvalidInput`] if the slices differ in length
/// * [`Error::InsufficientData`] for fewer than three pairs
#[instrument(skip(x, y), fields(n = x.len(), method = ?options.method))]
pub fn correlate(x: &[f64], y: &[f64], options: &CorrelationOptions) -> Result<CorrelationResult> {
    check_paired(x, y)?;
    let n = x.len();
    if n < MIN_PAIRS {
        return Err(Error::InsufficientData {
            expected: MIN_PAIRS,
            actual: n,
        });
    }

    let alpha = clamp_alpha(options.alpha, ALPHA_CLAMP.0, ALPHA_CLAMP.1);
    let df = n - 2;
    let df_f = df as f64;

    let pearson_r = pearson_unchecked(x, y);
    let spearman_r = spearman_unchecked(x, y);
    let r = match options.method {
        CorrelationMethod::Pearson => pearson_r,
        CorrelationMethod::Spearman => spearman_r,
    };
    let r_squared = r * r;

    let t_statistic = (df_f * r_squared / (1.0 - r_squared).max(1e-12)).sqrt() * r.signum();
    let p_value = if t_statistic.is_finite() {
        options.alternative.p_value(t_statistic, |t| t_cdf(t, df_f))
    } else {
        f64::NAN
    };

    let level = 1.0 - alpha;
    let (confidence_interval, standard_error_z) = if n > 3 && r.is_finite() {
        let safe_r = r.clamp(-FISHER_R_LIMIT, FISHER_R_LIMIT);
        let fisher_z = safe_r.atanh();
        let se = 1.0 / ((n - 3) as f64).sqrt();
        let z_critical = norm_inv(1.0 - alpha / 2.0)?;
        let ci = ConfidenceInterval::new(
            (fisher_z - z_critical * se).tanh(),
            (fisher_z + z_critical * se).tanh(),
            r,
            level,
        );
        (ci, se)
    } else {
        (ConfidenceInterval::undefined(r, level), f64::NAN)
    };

    debug!(
        "correlation: r={:.4}, t={:.4}, df={}, p={:.4}",
        r, t_statistic, df, p_value
    );

    Ok(CorrelationResult {
        method: options.method,
        n,
        df,
        alpha,
        r,
        r_squared,
        t_statistic,
        p_value,
        confidence_interval,
        standard_error_z,
        mean_x: mean(x),
        mean_y: mean(y),
        sd_x: standard_deviation(x),
        sd_y: standard_deviation(y),
        pearson_r,
        spearman_r,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use classic_core::Alternative;

    #[test]
    fn test_scenario_not_significant() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let result = correlate(&x, &y, &CorrelationOptions::default()).unwrap();

        assert_eq!(result.n, 5);
        assert_eq!(result.df, 3);
        assert_abs_diff_eq!(result.r, 0.774_596_669, epsilon = 1e-8);
        // t = r sqrt(3 / (1 - r²)) = 2.1213
        assert_abs_diff_eq!(result.t_statistic, 2.121_320_3, epsilon = 1e-6);
        assert!(result.p_value > 0.05);
        assert_abs_diff_eq!(result.p_value, 0.1240, epsilon = 1e-3);
        assert!(!result.is_significant());

        let ci = result.confidence_interval;
        assert!(ci.is_defined());
        assert!(ci.lower < 0.0 && ci.upper > result.r);
        assert_abs_diff_eq!(result.standard_error_z, 0.5_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_three_pairs_has_undefined_interval() {
        let result =
            correlate(&[1.0, 2.0, 3.0], &[1.0, 3.0, 2.0], &CorrelationOptions::default()).unwrap();
        assert!(result.r.is_finite());
        assert!(!result.confidence_interval.is_defined());
        assert!(result.standard_error_z.is_nan());
    }

    #[test]
    fn test_constant_variable_gives_nan() {
        let result = correlate(
            &[1.0, 2.0, 3.0, 4.0],
            &[2.0, 2.0, 2.0, 2.0],
            &CorrelationOptions::default(),
        )
        .unwrap();
        assert!(result.r.is_nan());
        assert!(result.t_statistic.is_nan());
        assert!(result.p_value.is_nan());
        assert!(!result.confidence_interval.is_defined());
        assert_eq!(result.sd_y, 0.0);
    }

    #[test]
    fn test_insufficient_and_mismatched() {
        let options = CorrelationOptions::default();
        assert!(matches!(
            correlate(&[1.0, 2.0], &[1.0, 2.0], &options),
            Err(Error::InsufficientData { expected: 3, actual: 2 })
        ));
        assert!(correlate(&[1.0, 2.0, 3.0], &[1.0, 2.0], &options).is_err());
    }

    #[test]
    fn test_alpha_is_clamped() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.5, 1.9, 3.2, 3.8, 5.1, 6.3];
        let wide = correlate(&x, &y, &CorrelationOptions::default().with_alpha(0.9)).unwrap();
        assert_eq!(wide.alpha, 0.5);
        let tiny = correlate(&x, &y, &CorrelationOptions::default().with_alpha(0.0)).unwrap();
        assert_eq!(tiny.alpha, 1e-6);
        assert!(tiny.confidence_interval.width() > wide.confidence_interval.width());
    }

    #[test]
    fn test_one_sided_alternatives() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let y = [2.0, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0];
        let two = correlate(&x, &y, &CorrelationOptions::default()).unwrap();
        let greater = correlate(
            &x,
            &y,
            &CorrelationOptions::default().with_alternative(Alternative::Greater),
        )
        .unwrap();
        let less = correlate(
            &x,
            &y,
            &CorrelationOptions::default().with_alternative(Alternative::Less),
        )
        .unwrap();
        assert_abs_diff_eq!(greater.p_value, two.p_value / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(greater.p_value + less.p_value, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_spearman_method_reports_both() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.0, 4.0, 9.0, 16.0, 25.0, 100.0];
        let result = correlate(
            &x,
            &y,
            &CorrelationOptions::default().with_method(CorrelationMethod::Spearman),
        )
        .unwrap();
        assert_eq!(result.method, CorrelationMethod::Spearman);
        assert_abs_diff_eq!(result.r, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.spearman_r, 1.0, epsilon = 1e-12);
        assert!(result.pearson_r < 0.95);
        // r = 1 is finite thanks to the 1e-12 floor
        assert!(result.t_statistic.is_finite());
        assert!(result.p_value < 1e-6);
    }
}
