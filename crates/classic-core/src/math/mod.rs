//! Mathematical utilities for classical statistical analysis
//!
//! Special functions and the distributions built on them. Every engine in
//! the workspace goes through this module; nothing re-derives its own copy.

pub mod distributions;
pub mod special;

pub use distributions::{fisher, normal, students_t};
pub use special::{
    beta_fn, binomial_probability, erf, log_combination, log_gamma,
    regularized_incomplete_beta,
};

use crate::error::Result;

/// Standard normal CDF
#[inline]
pub fn norm_cdf(z: f64) -> f64 {
    normal::cdf(z)
}

/// Standard normal quantile; domain error outside (0, 1)
#[inline]
pub fn norm_inv(p: f64) -> Result<f64> {
    normal::ppf(p)
}

/// Student t CDF
#[inline]
pub fn t_cdf(t: f64, df: f64) -> f64 {
    students_t::cdf(t, df)
}

/// Cornish-Fisher approximation of the t quantile
#[inline]
pub fn t_critical_approx(prob: f64, df: f64) -> Result<f64> {
    students_t::critical_approx(prob, df)
}

/// Student t quantile by bisection
#[inline]
pub fn t_inv(prob: f64, df: f64) -> Result<f64> {
    students_t::inv(prob, df)
}

/// F distribution CDF
#[inline]
pub fn f_cdf(x: f64, df1: f64, df2: f64) -> f64 {
    fisher::cdf(x, df1, df2)
}

/// F distribution density
#[inline]
pub fn f_pdf(x: f64, df1: f64, df2: f64) -> f64 {
    fisher::pdf(x, df1, df2)
}

/// F distribution quantile
#[inline]
pub fn inverse_f_cdf(prob: f64, df1: f64, df2: f64) -> f64 {
    fisher::inverse_cdf(prob, df1, df2)
}
