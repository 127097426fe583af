//! Mean-absolute-error model fitting
//!
//! [`nelder_mead`] is a general derivative-free minimizer. The `fit_*`
//! functions use it to find least-absolute-deviation lines and parabolas,
//! optionally with one additive shift per category.
//!
//! # Example
//!
//! ```rust
//! use classic_fit::{fit_linear, nelder_mead, NelderMeadOptions};
//!
//! let optimum = nelder_mead(
//!     |p: &[f64]| (p[0] - 1.0).powi(2) + (p[1] + 2.0).powi(2),
//!     &[0.0, 0.0],
//!     &NelderMeadOptions::default(),
//! )
//! .unwrap();
//! assert!(optimum.converged);
//! assert!((optimum.params[0] - 1.0).abs() < 1e-3);
//!
//! let fit = fit_linear(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]).unwrap();
//! assert!(fit.mae < 1e-6);
//! ```

pub mod mae;
pub mod nelder_mead;

pub use classic_core::{Error, Result};
pub use mae::{
    fit_linear, fit_linear_categorical, fit_quadratic, fit_quadratic_categorical,
    mean_absolute_error, L1Fit, L1Model, MIN_QUADRATIC_CATEGORICAL,
};
pub use nelder_mead::{nelder_mead, NelderMeadOptions, Optimum};
