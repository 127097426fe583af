//! Multiple linear regression with dummy coding and interaction terms
//!
//! The flow is [`ModelSpec`] → [`build_design_matrix`] → [`fit_design`]
//! (or [`fit`] for both steps), then [`MultipleRegressionResult::predict`]
//! for new observations.

pub mod design;
pub mod fit;
pub mod predict;
pub mod predictor;

pub use design::{
    build_design_matrix, CenteringConstants, DesignLayout, DesignMatrix, FactorLevels, Term,
    VariableCentering,
};
pub use fit::{
    fit, fit_design, predictor_effect_sizes, variance_inflation, Coefficient,
    MultipleRegressionResult, PredictorEffect, HIGH_VIF,
};
pub use predict::{NewObservation, ObservedValue, Prediction, DEFAULT_GRID_POINTS, GRID_SPAN_SD};
pub use predictor::{Interaction, ModelSpec, Predictor};
