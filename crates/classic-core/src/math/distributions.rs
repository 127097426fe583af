//! Normal, Student t and Fisher-Snedecor F distributions
//!
//! Everything here is built on [`super::special`]. Probability arguments
//! outside (0, 1) are reported as [`Error::Domain`] by the quantile
//! functions; CDFs return `NaN` (t) or 0 (F) for arguments they cannot
//! evaluate.

use crate::error::{Error, Result};

/// Normal distribution utilities
pub mod normal {
    use super::*;
    use crate::math::special::erf;
    use std::f64::consts::SQRT_2;

    /// CDF of the standard normal distribution
    pub fn cdf(x: f64) -> f64 {
        0.5 * (1.0 + erf(x / SQRT_2))
    }

    /// Inverse CDF (quantile function) of the standard normal distribution
    ///
    /// Acklam's rational approximation with separate lower, central and upper
    /// regions split at `p = 0.02425`.
    ///
    /// # Errors
    /// [`Error::Domain`] when `p` is not strictly inside (0, 1).
    pub fn ppf(p: f64) -> Result<f64> {
        if !(p > 0.0 && p < 1.0) {
            return Err(Error::invalid_probability("norm_inv", p));
        }

        let a = [
            -39.6968302866538,
            220.946098424521,
            -275.928510446969,
            138.357751867269,
            -30.6647980661472,
            2.50662827745924,
        ];

        let b = [
            -54.4760987982241,
            161.585836858041,
            -155.698979859887,
            66.8013118877197,
            -13.2806815528857,
        ];

        let c = [
            -0.00778489400243029,
            -0.322396458041136,
            -2.40075827716184,
            -2.54973253934373,
            4.37466414146497,
            2.93816398269878,
        ];

        let d = [
            0.00778469570904146,
            0.32246712907004,
            2.445134137143,
            3.75440866190742,
        ];

        let p_low = 0.02425;
        let p_high = 1.0 - p_low;

        let x = if p < p_low {
            let q = (-2.0 * p.ln()).sqrt();
            (((((c[0] * q + c[1]) * q + c[2]) * q + c[3]) * q + c[4]) * q + c[5])
                / ((((d[0] * q + d[1]) * q + d[2]) * q + d[3]) * q + 1.0)
        } else if p <= p_high {
            let q = p - 0.5;
            let r = q * q;
            (((((a[0] * r + a[1]) * r + a[2]) * r + a[3]) * r + a[4]) * r + a[5]) * q
                / (((((b[0] * r + b[1]) * r + b[2]) * r + b[3]) * r + b[4]) * r + 1.0)
        } else {
            let q = (-2.0 * (1.0 - p).ln()).sqrt();
            -(((((c[0] * q + c[1]) * q + c[2]) * q + c[3]) * q + c[4]) * q + c[5])
                / ((((d[0] * q + d[1]) * q + d[2]) * q + d[3]) * q + 1.0)
        };
        Ok(x)
    }

    /// Two-sided critical value `z_{1 - alpha/2}`
    pub fn two_sided_critical(alpha: f64) -> Result<f64> {
        ppf(1.0 - alpha / 2.0)
    }
}

/// Student t distribution utilities
pub mod students_t {
    use super::*;
    use crate::math::special::regularized_incomplete_beta;

    /// CDF of Student's t distribution
    ///
    /// Returns `NaN` for a non-finite statistic or non-positive degrees of
    /// freedom.
    pub fn cdf(t: f64, df: f64) -> f64 {
        if !t.is_finite() || !df.is_finite() || df <= 0.0 {
            return f64::NAN;
        }
        let x = df / (df + t * t);
        let ib = regularized_incomplete_beta(x, df / 2.0, 0.5);
        if t > 0.0 {
            1.0 - 0.5 * ib
        } else {
            0.5 * ib
        }
    }

    /// Approximate t quantile from a normal quantile (Cornish-Fisher terms)
    ///
    /// `z + (z³ + z)/(4 df) + (5z⁵ + 16z³ + 3z)/(96 df²)`, or plain `z` when
    /// `df` is non-finite or non-positive.
    pub fn critical_approx(prob: f64, df: f64) -> Result<f64> {
        if !(prob > 0.0 && prob < 1.0) {
            return Err(Error::invalid_probability("t_critical_approx", prob));
        }
        let z = super::normal::ppf(prob)?;
        if !df.is_finite() || df <= 0.0 {
            return Ok(z);
        }
        let z3 = z * z * z;
        let z5 = z3 * z * z;
        let g1 = (z3 + z) / 4.0;
        let g2 = (5.0 * z5 + 16.0 * z3 + 3.0 * z) / 96.0;
        Ok(z + g1 / df + g2 / (df * df))
    }

    /// Quantile of Student's t by bisection on [`cdf`]
    ///
    /// Starts from the bracket [-10, 10] and widens it for very heavy tails.
    pub fn inv(prob: f64, df: f64) -> Result<f64> {
        if !(prob > 0.0 && prob < 1.0) {
            return Err(Error::invalid_probability("t_inv", prob));
        }
        if !df.is_finite() || df <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "degrees of freedom {df} must be positive"
            )));
        }

        let mut low = -10.0;
        let mut high = 10.0;
        while cdf(low, df) > prob && low > -1e12 {
            low *= 2.0;
        }
        while cdf(high, df) < prob && high < 1e12 {
            high *= 2.0;
        }

        while high - low > 1e-6 {
            let mid = 0.5 * (low + high);
            if cdf(mid, df) < prob {
                low = mid;
            } else {
                high = mid;
            }
        }
        Ok(0.5 * (low + high))
    }

    /// Two-sided p-value `2 (1 - F(|t|))`
    pub fn two_sided_p(t: f64, df: f64) -> f64 {
        2.0 * (1.0 - cdf(t.abs(), df))
    }
}

/// Fisher-Snedecor F distribution utilities
pub mod fisher {
    use crate::math::special::{beta_fn, regularized_incomplete_beta};

    fn valid(x: f64, df1: f64, df2: f64) -> bool {
        x.is_finite() && x > 0.0 && df1 > 0.0 && df2 > 0.0
    }

    /// CDF of the F distribution; 0 for arguments it cannot evaluate
    pub fn cdf(x: f64, df1: f64, df2: f64) -> f64 {
        if x == f64::INFINITY && df1 > 0.0 && df2 > 0.0 {
            return 1.0;
        }
        if !valid(x, df1, df2) {
            return 0.0;
        }
        let z = (df1 * x) / (df1 * x + df2);
        regularized_incomplete_beta(z, df1 / 2.0, df2 / 2.0)
    }

    /// Density of the F distribution
    pub fn pdf(x: f64, df1: f64, df2: f64) -> f64 {
        if !valid(x, df1, df2) {
            return 0.0;
        }
        let safe_x = x.max(1e-12);
        let a = df1 / 2.0;
        let b = df2 / 2.0;
        let ratio = df1 / df2;
        let numerator = ratio.powf(a) * safe_x.powf(a - 1.0);
        let denominator = beta_fn(a, b) * (1.0 + ratio * safe_x).powf(a + b);
        numerator / denominator
    }

    /// Upper-tail probability `1 - cdf(x)`
    pub fn sf(x: f64, df1: f64, df2: f64) -> f64 {
        1.0 - cdf(x, df1, df2)
    }

    /// Quantile of the F distribution by bracketed bisection
    ///
    /// 0 for `prob <= 0` and `+inf` for `prob >= 1`.
    pub fn inverse_cdf(prob: f64, df1: f64, df2: f64) -> f64 {
        if prob <= 0.0 {
            return 0.0;
        }
        if prob >= 1.0 {
            return f64::INFINITY;
        }
        let mut low = 0.0;
        let mut high = 1.0;
        while cdf(high, df1, df2) < prob && high < 1e6 {
            high *= 2.0;
        }
        for _ in 0..120 {
            let mid = 0.5 * (low + high);
            let value = cdf(mid, df1, df2);
            if (value - prob).abs() < 1e-6 {
                return mid;
            }
            if value < prob {
                low = mid;
            } else {
                high = mid;
            }
        }
        0.5 * (low + high)
    }
}
