//! Bivariate least squares with z-based inference

use classic_core::descriptive::{mean, standard_deviation, summarize, z_scores};
use classic_core::math::{norm_cdf, norm_inv};
use classic_core::{
    validate_alpha, Alternative, ConfidenceInterval, Error, Result, SummaryStats, DEFAULT_ALPHA,
};
use tracing::{debug, instrument, warn};

/// Minimum number of pairs for a fit
pub const MIN_PAIRS: usize = 3;
/// |z| beyond which a pair is trimmed
pub const TRIM_Z: f64 = 3.5;
/// Trimming is only attempted from this many pairs on
pub const MIN_PAIRS_FOR_TRIM: usize = 5;

/// Options for [`simple_regression`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleRegressionOptions {
    pub alpha: f64,
    /// Tail of the slope test
    pub alternative: Alternative,
    /// Regress on `ln(x)`; pairs with `x <= 0` are dropped
    pub log_x: bool,
    /// Regress `ln(y)`; pairs with `y <= 0` are dropped
    pub log_y: bool,
    /// Drop pairs with |z| > 3.5 in either variable
    pub trim_outliers: bool,
}

impl Default for SimpleRegressionOptions {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            alternative: Alternative::TwoSided,
            log_x: false,
            log_y: false,
            trim_outliers: false,
        }
    }
}

impl SimpleRegressionOptions {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    pub fn with_log_x(mut self, log_x: bool) -> Self {
        self.log_x = log_x;
        self
    }

    pub fn with_log_y(mut self, log_y: bool) -> Self {
        self.log_y = log_y;
        self
    }

    pub fn with_trim_outliers(mut self, trim: bool) -> Self {
        self.trim_outliers = trim;
        self
    }
}

/// Estimate, standard error and test of one coefficient
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoefficientTest {
    pub estimate: f64,
    pub standard_error: f64,
    pub z_statistic: f64,
    pub p_value: f64,
    pub interval: ConfidenceInterval,
}

impl CoefficientTest {
    fn new(
        estimate: f64,
        standard_error: f64,
        p_value: impl Fn(f64) -> f64,
        z_crit: f64,
        level: f64,
    ) -> Self {
        let z_statistic = estimate / standard_error;
        Self {
            estimate,
            standard_error,
            z_statistic,
            p_value: if z_statistic.is_nan() { f64::NAN } else { p_value(z_statistic) },
            interval: ConfidenceInterval::symmetric(estimate, z_crit * standard_error, level),
        }
    }
}

/// Result of [`simple_regression`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleRegressionResult {
    /// Pairs supplied by the caller
    pub total_pairs: usize,
    /// Pairs removed by the log transforms
    pub dropped_non_positive: usize,
    /// Pairs removed as outliers
    pub trimmed: usize,
    /// Pairs used in the fit
    pub n: usize,
    /// `n - 2`
    pub df: usize,
    pub slope: CoefficientTest,
    /// Intercept test is always two-sided
    pub intercept: CoefficientTest,
    pub r: f64,
    pub r_squared: f64,
    /// `slope * sd_x / sd_y`
    pub standardized_slope: f64,
    pub sse: f64,
    /// `sse / df`
    pub mse: f64,
    /// `sqrt(sse / n)`
    pub rmse: f64,
    pub mae: f64,
    /// `sqrt(sse / df)`
    pub residual_se: f64,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    /// Summary of the (transformed) predictor
    pub summary_x: SummaryStats,
    /// Summary of the (transformed) outcome
    pub summary_y: SummaryStats,
    pub alpha: f64,
    pub alternative: Alternative,
    /// `norm_inv(1 - alpha/2)`
    pub z_critical: f64,
}

impl SimpleRegressionResult {
    /// Whether the slope test rejects at `alpha`
    pub fn is_significant(&self) -> bool {
        self.slope.p_value < self.alpha
    }

    /// Fitted value at `x` on the regression scale
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept.estimate + self.slope.estimate * x
    }

    /// Confidence interval for the mean response at `x`
    ///
    /// `ŷ ± z · s · sqrt(1/n + (x - x̄)² / Sxx)` with `s` the residual standard
    /// error. Bounds are `NaN` when `x` is constant or `s` is undefined.
    pub fn confidence_band(&self, x: f64) -> ConfidenceInterval {
        let n = self.n as f64;
        let sxx = self.summary_x.sd.powi(2) * (n - 1.0);
        let standard_error = if sxx > 0.0 {
            self.residual_se * (1.0 / n + (x - self.summary_x.mean).powi(2) / sxx).sqrt()
        } else {
            f64::NAN
        };
        ConfidenceInterval::symmetric(
            self.predict(x),
            self.z_critical * standard_error,
            1.0 - self.alpha,
        )
    }
}

/// Fit `y = intercept + slope x` by ordinary least squares
///
/// Inference uses the normal distribution for both coefficients; the CI
/// critical value is `norm_inv(1 - alpha/2)`. A constant `x` leaves the slope
/// and everything derived from it `NaN`.
///
/// # Errors
/// * [`Error::InvalidInput`] for mismatched lengths or non-finite values
/// * [`Error::InvalidParameter`] for an alpha outside (0, 1)
/// * [`Error::InsufficientData`] when fewer than three pairs survive the
///   transforms
#[instrument(skip(x, y, options), fields(n = x.len()))]
pub fn simple_regression(
    x: &[f64],
    y: &[f64],
    options: &SimpleRegressionOptions,
) -> Result<SimpleRegressionResult> {
    if x.len() != y.len() {
        return Err(Error::size_mismatch(x.len(), y.len(), "regression pairs"));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(Error::non_finite("regression input"));
    }
    let alpha = validate_alpha(options.alpha)?;
    let total_pairs = x.len();

    let (mut xs, mut ys) = log_transform(x, y, options.log_x, options.log_y);
    let dropped_non_positive = total_pairs - xs.len();
    if dropped_non_positive > 0 {
        warn!("log transform dropped {} non-positive pairs", dropped_non_positive);
    }

    let mut trimmed = 0;
    if options.trim_outliers && xs.len() >= MIN_PAIRS_FOR_TRIM {
        let (tx, ty) = trim_outliers(&xs, &ys);
        if tx.len() >= MIN_PAIRS {
            trimmed = xs.len() - tx.len();
            xs = tx;
            ys = ty;
        } else {
            warn!("outlier trimming would leave {} pairs; keeping all", tx.len());
        }
    }

    let n = xs.len();
    if n < MIN_PAIRS {
        return Err(Error::InsufficientData {
            expected: MIN_PAIRS,
            actual: n,
        });
    }

    let nf = n as f64;
    let mx = mean(&xs);
    let my = mean(&ys);
    let sxx: f64 = xs.iter().map(|v| (v - mx).powi(2)).sum();
    let syy: f64 = ys.iter().map(|v| (v - my).powi(2)).sum();
    let sxy: f64 = xs.iter().zip(&ys).map(|(a, b)| (a - mx) * (b - my)).sum();

    let slope = if sxx > 0.0 { sxy / sxx } else { f64::NAN };
    let intercept = my - slope * mx;
    let fitted: Vec<f64> = xs.iter().map(|v| intercept + slope * v).collect();
    let residuals: Vec<f64> = ys.iter().zip(&fitted).map(|(a, f)| a - f).collect();

    let df = n - 2;
    let dff = df as f64;
    let sse: f64 = residuals.iter().map(|e| e * e).sum();
    let mse = sse / dff;
    let se_slope = (mse / sxx).sqrt();
    let se_intercept = (mse * (1.0 / nf + mx * mx / sxx)).sqrt();

    let level = 1.0 - alpha;
    let z_crit = norm_inv(1.0 - alpha / 2.0)?;
    let alternative = options.alternative;
    let slope_test = CoefficientTest::new(
        slope,
        se_slope,
        |z| alternative.p_value(z, norm_cdf),
        z_crit,
        level,
    );
    let intercept_test = CoefficientTest::new(
        intercept,
        se_intercept,
        |z| Alternative::TwoSided.p_value(z, norm_cdf),
        z_crit,
        level,
    );

    let r = if sxx > 0.0 && syy > 0.0 {
        sxy / (sxx * syy).sqrt()
    } else {
        f64::NAN
    };
    let sd_x = standard_deviation(&xs);
    let sd_y = standard_deviation(&ys);

    debug!(
        "slope={:.4} (se {:.4}), intercept={:.4}, r²={:.4}",
        slope,
        se_slope,
        intercept,
        r * r
    );

    Ok(SimpleRegressionResult {
        total_pairs,
        dropped_non_positive,
        trimmed,
        n,
        df,
        slope: slope_test,
        intercept: intercept_test,
        r,
        r_squared: r * r,
        standardized_slope: slope * sd_x / sd_y,
        sse,
        mse,
        rmse: (sse / nf).sqrt(),
        mae: residuals.iter().map(|e| e.abs()).sum::<f64>() / nf,
        residual_se: mse.sqrt(),
        fitted,
        residuals,
        summary_x: summarize(&xs),
        summary_y: summarize(&ys),
        alpha,
        alternative,
        z_critical: z_crit,
    })
}

fn log_transform(x: &[f64], y: &[f64], log_x: bool, log_y: bool) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter(|(&a, &b)| (!log_x || a > 0.0) && (!log_y || b > 0.0))
        .map(|(&a, &b)| {
            (
                if log_x { a.ln() } else { a },
                if log_y { b.ln() } else { b },
            )
        })
        .unzip()
}

fn trim_outliers(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let zx = z_scores(x);
    let zy = z_scores(y);
    x.iter()
        .zip(y)
        .zip(zx.iter().zip(&zy))
        .filter(|(_, (a, b))| !(a.abs() > TRIM_Z || b.abs() > TRIM_Z))
        .map(|((&a, &b), _)| (a, b))
        .unzip()
}
