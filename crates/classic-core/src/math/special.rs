//! Special functions backing every distribution in the workspace
//!
//! Coefficient tables are fixed and must not be changed.

/// Maximum continued-fraction iterations for the incomplete beta function
pub const BETA_CF_MAX_ITER: usize = 200;
/// Relative convergence tolerance for the incomplete beta continued fraction
pub const BETA_CF_EPS: f64 = 3e-7;
/// Floor that keeps the modified Lentz recurrence away from division by zero
pub const BETA_CF_FPMIN: f64 = 1e-30;

const LANCZOS_COEFFICIENTS: [f64; 6] = [
    76.180_091_729_471_46,
    -86.505_320_329_416_77,
    24.014_098_240_830_91,
    -1.231_739_572_450_155,
    0.120_865_097_386_617_9e-2,
    -0.539_523_938_495_3e-5,
];

/// Error function, Abramowitz and Stegun 7.1.26
///
/// Maximum absolute error is about 1.5e-7.
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// Natural logarithm of the gamma function (Lanczos, g = 5)
///
/// Defined for `x > 0`; non-positive input yields `NaN`.
pub fn log_gamma(x: f64) -> f64 {
    let mut y = x;
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut ser = 1.000000000190015;
    for coefficient in LANCZOS_COEFFICIENTS {
        y += 1.0;
        ser += coefficient / y;
    }
    -tmp + (2.5066282746310005 * ser / x).ln()
}

/// Beta function B(a, b) computed through log-gamma
pub fn beta_fn(a: f64, b: f64) -> f64 {
    (log_gamma(a) + log_gamma(b) - log_gamma(a + b)).exp()
}

/// Log of the binomial coefficient C(n, k)
///
/// Returns negative infinity when `k > n`, so `exp` of the result is 0.
pub fn log_combination(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let n = n as f64;
    let k = k as f64;
    log_gamma(n + 1.0) - log_gamma(k + 1.0) - log_gamma(n - k + 1.0)
}

/// Binomial probability mass P(X = k) for X ~ Binomial(n, p)
///
/// Evaluated in log space so large `n` does not overflow.
pub fn binomial_probability(k: u64, n: u64, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    if p <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if p >= 1.0 {
        return if k == n { 1.0 } else { 0.0 };
    }
    let log_prob =
        log_combination(n, k) + k as f64 * p.ln() + (n - k) as f64 * (1.0 - p).ln();
    log_prob.exp()
}

/// Regularized incomplete beta function I_x(a, b)
///
/// Uses the continued fraction directly when `x < (a + 1) / (a + b + 2)`
/// and the symmetry `I_x(a, b) = 1 - I_{1-x}(b, a)` otherwise.
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front = (log_gamma(a + b) - log_gamma(a) - log_gamma(b)
        + a * x.ln()
        + b * (1.0 - x).ln())
    .exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    }
}

/// Continued fraction for the incomplete beta (modified Lentz)
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let floor = |v: f64| if v.abs() < BETA_CF_FPMIN { BETA_CF_FPMIN } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / floor(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=BETA_CF_MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / floor(1.0 + aa * d);
        c = floor(1.0 + aa / c);
        h *= d * c;

        // Odd step
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / floor(1.0 + aa * d);
        c = floor(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < BETA_CF_EPS {
            break;
        }
    }
    h
}
