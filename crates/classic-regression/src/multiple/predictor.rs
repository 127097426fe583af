//! Predictor metadata and model specification

use classic_core::{Error, Result, DEFAULT_ALPHA};
use std::collections::HashMap;

/// One column of input data with its type
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Predictor {
    Numeric {
        name: String,
        values: Vec<f64>,
    },
    Categorical {
        name: String,
        values: Vec<String>,
        /// Distinct levels, most frequent first
        levels: Vec<String>,
        /// Level absorbed by the intercept
        reference: String,
    },
}

impl Predictor {
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::Numeric {
            name: name.into(),
            values,
        }
    }

    /// Categorical predictor with levels inferred from `values`
    ///
    /// Levels are ordered by frequency (ties by first appearance) and the most
    /// frequent one becomes the reference.
    ///
    /// # Errors
    /// [`Error::InvalidInput`] when `values` is empty.
    pub fn categorical<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Result<Self> {
        let name = name.into();
        let values: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut levels: Vec<String> = Vec::new();
        for value in &values {
            let count = counts.entry(value.as_str()).or_insert(0);
            if *count == 0 {
                levels.push(value.clone());
            }
            *count += 1;
        }
        levels.sort_by(|a, b| counts[b.as_str()].cmp(&counts[a.as_str()]));

        let reference = levels
            .first()
            .cloned()
            .ok_or_else(|| {
                Error::InvalidInput(format!("categorical predictor '{name}' is empty"))
            })?;

        Ok(Self::Categorical {
            name,
            values,
            levels,
            reference,
        })
    }

    /// Replace the reference level of a categorical predictor
    ///
    /// # Errors
    /// [`Error::InvalidInput`] for a numeric predictor or an unknown level.
    pub fn with_reference(self, level: &str) -> Result<Self> {
        match self {
            Self::Categorical {
                name,
                values,
                levels,
                ..
            } => {
                if !levels.iter().any(|l| l == level) {
                    return Err(Error::InvalidInput(format!(
                        "'{level}' is not a level of '{name}'"
                    )));
                }
                Ok(Self::Categorical {
                    name,
                    values,
                    levels,
                    reference: level.to_string(),
                })
            }
            Self::Numeric { name, .. } => Err(Error::InvalidInput(format!(
                "'{name}' is numeric and has no reference level"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Numeric { name, .. } | Self::Categorical { name, .. } => name,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Numeric { values, .. } => values.len(),
            Self::Categorical { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric { .. })
    }

    /// Non-reference levels in stored order; empty for numeric predictors
    pub fn dummy_levels(&self) -> Vec<&str> {
        match self {
            Self::Categorical {
                levels, reference, ..
            } => levels
                .iter()
                .filter(|l| *l != reference)
                .map(String::as_str)
                .collect(),
            Self::Numeric { .. } => Vec::new(),
        }
    }
}

/// Product or square terms added after the main effects
///
/// Predictors are referred to by name. `ContinuousCategorical` accepts its
/// pair in either order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interaction {
    ContinuousContinuous(String, String),
    ContinuousCategorical(String, String),
    CategoricalCategorical(String, String),
    Quadratic(String),
}

impl Interaction {
    pub fn continuous(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::ContinuousContinuous(a.into(), b.into())
    }

    pub fn mixed(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::ContinuousCategorical(a.into(), b.into())
    }

    pub fn categorical(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::CategoricalCategorical(a.into(), b.into())
    }

    pub fn quadratic(a: impl Into<String>) -> Self {
        Self::Quadratic(a.into())
    }

    /// Names of the predictors involved
    pub fn variables(&self) -> Vec<&str> {
        match self {
            Self::ContinuousContinuous(a, b)
            | Self::ContinuousCategorical(a, b)
            | Self::CategoricalCategorical(a, b) => vec![a.as_str(), b.as_str()],
            Self::Quadratic(a) => vec![a.as_str()],
        }
    }

    pub fn involves(&self, name: &str) -> bool {
        self.variables().contains(&name)
    }
}

/// Full description of a multiple regression model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelSpec {
    pub predictors: Vec<Predictor>,
    pub interactions: Vec<Interaction>,
    /// Center numeric predictors that take part in an interaction or square
    pub center_continuous: bool,
    pub alpha: f64,
}

impl ModelSpec {
    pub fn new(predictors: Vec<Predictor>) -> Self {
        Self {
            predictors,
            interactions: Vec::new(),
            center_continuous: true,
            alpha: DEFAULT_ALPHA,
        }
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interactions.push(interaction);
        self
    }

    pub fn with_centering(mut self, center: bool) -> Self {
        self.center_continuous = center;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn predictor(&self, name: &str) -> Option<&Predictor> {
        self.predictors.iter().find(|p| p.name() == name)
    }

    /// Copy of this model with `name` and every interaction involving it
    /// removed
    pub fn without(&self, name: &str) -> Self {
        Self {
            predictors: self
                .predictors
                .iter()
                .filter(|p| p.name() != name)
                .cloned()
                .collect(),
            interactions: self
                .interactions
                .iter()
                .filter(|i| !i.involves(name))
                .cloned()
                .collect(),
            center_continuous: self.center_continuous,
            alpha: self.alpha,
        }
    }

    /// Whether a numeric predictor enters an interaction or square term
    pub fn in_interaction(&self, name: &str) -> bool {
        self.interactions.iter().any(|i| i.involves(name))
    }
}
