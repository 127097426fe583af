//! Classical inferential statistics
//!
//! This crate re-exports the workspace members under short module names:
//!
//! - [`common`]: errors, special functions, descriptive statistics
//! - [`correlation`]: Pearson and Spearman with t tests and Fisher-z intervals
//! - [`anova`]: one-way ANOVA with effect sizes and Tukey contrasts
//! - [`mcnemar`]: McNemar's test for paired binary outcomes
//! - [`regression`]: simple, categorical and multiple least squares
//! - [`fit`]: Nelder-Mead and mean-absolute-error model fitting
//!
//! Every engine is a pure function from validated slices and an options
//! struct to a result struct.
//!
//! # Example
//!
//! ```rust
//! use classic_stats::correlation::{correlate, CorrelationOptions};
//! use classic_stats::regression::{simple_regression, SimpleRegressionOptions};
//!
//! let x = [1.0, 2.0, 3.0, 4.0];
//! let y = [2.0, 4.0, 6.0, 8.0];
//!
//! let fit = simple_regression(&x, &y, &SimpleRegressionOptions::default()).unwrap();
//! assert!((fit.slope.estimate - 2.0).abs() < 1e-12);
//!
//! let r = correlate(&x, &y, &CorrelationOptions::default()).unwrap();
//! assert!((r.r - 1.0).abs() < 1e-12);
//! ```

pub use classic_anova as anova;
pub use classic_core as common;
pub use classic_correlation as correlation;
pub use classic_fit as fit;
pub use classic_mcnemar as mcnemar;
pub use classic_regression as regression;

pub use classic_core::{
    Alternative, ConfidenceInterval, ConfidenceLevel, Error, Result, Severity, DEFAULT_ALPHA,
};

/// Commonly used items from every engine
pub mod prelude {
    pub use classic_anova::{one_way_anova, AnovaOptions, GroupSummary, TukeyCriticalMethod};
    pub use classic_core::{Alternative, ConfidenceInterval, ConfidenceLevel, Error, Result};
    pub use classic_correlation::{
        correlate, correlation_matrix, CorrelationMethod, CorrelationOptions,
    };
    pub use classic_fit::{fit_linear, fit_quadratic, nelder_mead, NelderMeadOptions};
    pub use classic_mcnemar::{mcnemar_test, ContingencyCounts, McNemarMethod, McNemarOptions};
    pub use classic_regression::multiple::{
        build_design_matrix, fit as fit_multiple, Interaction, ModelSpec, NewObservation, Predictor,
    };
    pub use classic_regression::{
        categorical_regression, simple_regression, SimpleRegressionOptions,
    };
}
