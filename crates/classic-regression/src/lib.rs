//! Least-squares regression
//!
//! - [`simple`]: one numeric predictor with z-based inference, optional log
//!   transforms and outlier trimming
//! - [`categorical`]: one categorical predictor coded against a reference
//!   level
//! - [`multiple`]: several predictors, dummy coding, interactions, VIF,
//!   partial eta squared and prediction
//!
//! # Example
//!
//! ```rust
//! use classic_regression::multiple::{fit, ModelSpec, NewObservation, Predictor};
//!
//! let spec = ModelSpec::new(vec![
//!     Predictor::numeric("x", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
//! ]);
//! let model = fit(&spec, &[3.1, 4.9, 7.2, 8.8, 11.1]).unwrap();
//!
//! let slope = model.coefficient("x").unwrap();
//! assert!((slope.estimate - 1.99).abs() < 1e-9);
//!
//! let p = model.predict(&NewObservation::new().with_numeric("x", 6.0)).unwrap();
//! assert!(p.interval.contains(p.value));
//! ```

pub mod categorical;
pub mod multiple;
pub mod simple;

pub use categorical::{
    categorical_regression, CategoricalRegressionResult, LevelEffect, LevelSummary,
};
pub use classic_core::{Error, Result};
pub use multiple::{
    build_design_matrix, fit, fit_design, predictor_effect_sizes, Interaction, ModelSpec,
    MultipleRegressionResult, NewObservation, Prediction, Predictor,
};
pub use simple::{
    simple_regression, CoefficientTest, SimpleRegressionOptions, SimpleRegressionResult,
};
