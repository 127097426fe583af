//! Pearson and Spearman correlation
//!
//! Given paired samples this crate computes both coefficients, tests
//! H0: rho = 0 with a Student t statistic on `n - 2` degrees of freedom and
//! builds a Fisher-z confidence interval. Several variables can be
//! correlated at once with [`correlation_matrix`], and [`diagnose`] grades
//! the data against the usual assumptions.
//!
//! # Example
//!
//! ```rust
//! use classic_correlation::{correlate, CorrelationOptions};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.0, 4.0, 5.0, 4.0, 5.0];
//! let result = correlate(&x, &y, &CorrelationOptions::default()).unwrap();
//!
//! assert!((result.r - 0.7746).abs() < 1e-4);
//! assert!(!result.is_significant());
//! ```
//!
//! # Degenerate input
//!
//! A constant variable is not an error: the coefficient and everything
//! derived from it come back as `NaN`. With exactly three pairs the test is
//! available but the interval is not.

pub mod analysis;
pub mod coefficients;
pub mod diagnostics;
pub mod matrix;
pub mod types;

pub use analysis::{correlate, ALPHA_CLAMP};
pub use classic_core::{Error, Result};
pub use coefficients::{pearson, spearman, MIN_PAIRS};
pub use diagnostics::{diagnose, CorrelationCheck, CorrelationDiagnostics, OUTLIER_Z};
pub use matrix::correlation_matrix;
pub use types::{
    CorrelationMatrix, CorrelationMethod, CorrelationOptions, CorrelationResult, PairCorrelation,
};
