//! Point predictions and prediction grids from a fitted model

use super::design::RowSource;
use super::fit::MultipleRegressionResult;
use classic_core::{ConfidenceInterval, Error, Result};
use nalgebra::DVector;
use std::collections::HashMap;

/// Number of points in the default quadratic grid
pub const DEFAULT_GRID_POINTS: usize = 101;
/// Half-width of the quadratic grid in standard deviations
pub const GRID_SPAN_SD: f64 = 2.5;

/// Value of one predictor in a new observation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObservedValue {
    Numeric(f64),
    Level(String),
}

/// Predictor values for a single prediction, keyed by predictor name
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewObservation {
    pub values: HashMap<String, ObservedValue>,
}

impl NewObservation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_numeric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), ObservedValue::Numeric(value));
        self
    }

    pub fn with_level(mut self, name: impl Into<String>, level: impl Into<String>) -> Self {
        self.values
            .insert(name.into(), ObservedValue::Level(level.into()));
        self
    }

    fn get(&self, name: &str) -> Result<&ObservedValue> {
        self.values
            .get(name)
            .ok_or_else(|| Error::InvalidInput(format!("observation is missing '{name}'")))
    }
}

impl RowSource for NewObservation {
    fn numeric(&self, name: &str) -> Result<f64> {
        match self.get(name)? {
            ObservedValue::Numeric(v) if v.is_finite() => Ok(*v),
            ObservedValue::Numeric(_) => Err(Error::non_finite(name)),
            ObservedValue::Level(_) => Err(Error::InvalidInput(format!(
                "'{name}' needs a numeric value"
            ))),
        }
    }

    fn level(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            ObservedValue::Level(level) => Ok(level.as_str()),
            ObservedValue::Numeric(_) => Err(Error::InvalidInput(format!(
                "'{name}' needs a categorical level"
            ))),
        }
    }
}

/// Predicted mean response with its uncertainty
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prediction {
    pub value: f64,
    /// `sqrt(xᵀ V x)` with `V` the coefficient covariance
    pub standard_error: f64,
    /// Confidence interval for the mean response at the model alpha
    pub interval: ConfidenceInterval,
}

impl MultipleRegressionResult {
    /// Predict the mean response for one observation
    ///
    /// Numeric values are centered with the constants learned at fit time.
    ///
    /// # Errors
    /// [`Error::InvalidInput`] when a predictor is missing, has the wrong
    /// type, is non-finite, or names a level not seen during fitting.
    pub fn predict(&self, observation: &NewObservation) -> Result<Prediction> {
        for factor in &self.layout.factors {
            let level = observation.level(&factor.name)?;
            if !factor.levels.iter().any(|l| l == level) {
                return Err(Error::InvalidInput(format!(
                    "'{level}' is not a level of '{}'",
                    factor.name
                )));
            }
        }

        let row = DVector::from_vec(self.layout.row(observation, &self.centering)?);
        let beta = DVector::from_vec(self.estimates());
        let value = row.dot(&beta);
        let standard_error = (&self.covariance * &row).dot(&row).max(0.0).sqrt();

        Ok(Prediction {
            value,
            standard_error,
            interval: ConfidenceInterval::symmetric(
                value,
                self.t_critical * standard_error,
                1.0 - self.alpha,
            ),
        })
    }

    /// Evenly spaced values of a numeric predictor over mean ± 2.5 sd
    ///
    /// # Errors
    /// * [`Error::InvalidInput`] for an unknown or categorical predictor
    /// * [`Error::InvalidParameter`] for fewer than two points
    pub fn quadratic_grid(&self, name: &str, points: usize) -> Result<Vec<f64>> {
        if points < 2 {
            return Err(Error::InvalidParameter(format!(
                "grid needs at least 2 points, got {points}"
            )));
        }
        let centering = self
            .centering
            .get(name)
            .ok_or_else(|| Error::InvalidInput(format!("'{name}' is not a numeric predictor")))?;
        let lo = centering.mean - GRID_SPAN_SD * centering.sd;
        let step = 2.0 * GRID_SPAN_SD * centering.sd / (points - 1) as f64;
        Ok((0..points).map(|i| lo + step * i as f64).collect())
    }

    /// Predictions along the grid of `name`
    ///
    /// Other numeric predictors are held at their means and categorical
    /// predictors at their reference level.
    pub fn grid_predictions(&self, name: &str, points: usize) -> Result<Vec<(f64, Prediction)>> {
        let grid = self.quadratic_grid(name, points)?;
        let mut base = NewObservation::new();
        for variable in &self.centering.variables {
            base = base.with_numeric(variable.name.clone(), variable.mean);
        }
        for factor in &self.layout.factors {
            base = base.with_level(factor.name.clone(), factor.reference.clone());
        }
        grid.into_iter()
            .map(|v| {
                let observation = base.clone().with_numeric(name, v);
                Ok((v, self.predict(&observation)?))
            })
            .collect()
    }
}
