//! Design matrix construction
//!
//! A [`DesignLayout`] is the list of column recipes derived from a
//! [`ModelSpec`]. The same layout builds the training matrix and, later, the
//! one-row vectors used for prediction, so both always agree on centering and
//! dummy coding.

use super::predictor::{Interaction, ModelSpec, Predictor};
use classic_core::descriptive::{mean, standard_deviation};
use classic_core::{Error, Result};
use nalgebra::DMatrix;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Location and scale of one numeric predictor
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableCentering {
    pub name: String,
    pub mean: f64,
    pub sd: f64,
    /// Whether the design uses `value - mean` for this predictor
    pub centered: bool,
}

/// Centering constants of every numeric predictor, in predictor order
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CenteringConstants {
    pub variables: Vec<VariableCentering>,
}

impl CenteringConstants {
    pub fn get(&self, name: &str) -> Option<&VariableCentering> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Apply the stored centering of `name` to a raw value
    fn transform(&self, name: &str, value: f64) -> f64 {
        match self.get(name) {
            Some(c) if c.centered => value - c.mean,
            _ => value,
        }
    }
}

/// Recipe for one design column
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Term {
    Intercept,
    Numeric(String),
    Dummy {
        name: String,
        level: String,
    },
    Product(String, String),
    NumericByLevel {
        numeric: String,
        factor: String,
        level: String,
    },
    LevelByLevel {
        a: String,
        level_a: String,
        b: String,
        level_b: String,
    },
    Square(String),
}

impl Term {
    /// Column label
    pub fn label(&self) -> String {
        match self {
            Self::Intercept => "Intercept".to_string(),
            Self::Numeric(name) => name.clone(),
            Self::Dummy { name, level } => format!("{name}_{level}"),
            Self::Product(a, b) => format!("{a} × {b}"),
            Self::NumericByLevel {
                numeric,
                factor,
                level,
            } => format!("{numeric} × {factor}_{level}"),
            Self::LevelByLevel {
                a,
                level_a,
                b,
                level_b,
            } => format!("{a}_{level_a} × {b}_{level_b}"),
            Self::Square(name) => format!("{name}²"),
        }
    }

    fn value(&self, row: &impl RowSource, centering: &CenteringConstants) -> Result<f64> {
        let numeric = |name: &str| -> Result<f64> {
            Ok(centering.transform(name, row.numeric(name)?))
        };
        let indicator = |name: &str, level: &str| -> Result<f64> {
            Ok(if row.level(name)? == level { 1.0 } else { 0.0 })
        };
        Ok(match self {
            Self::Intercept => 1.0,
            Self::Numeric(name) => numeric(name)?,
            Self::Dummy { name, level } => indicator(name, level)?,
            Self::Product(a, b) => numeric(a)? * numeric(b)?,
            Self::NumericByLevel {
                numeric: n,
                factor,
                level,
            } => numeric(n)? * indicator(factor, level)?,
            Self::LevelByLevel {
                a,
                level_a,
                b,
                level_b,
            } => indicator(a, level_a)? * indicator(b, level_b)?,
            Self::Square(name) => numeric(name)?.powi(2),
        })
    }
}

/// Levels of one categorical predictor as seen at fit time
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactorLevels {
    pub name: String,
    pub levels: Vec<String>,
    pub reference: String,
}

/// Column recipes plus the predictor metadata needed to evaluate them
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DesignLayout {
    pub terms: Vec<Term>,
    pub numeric: Vec<String>,
    pub factors: Vec<FactorLevels>,
}

impl DesignLayout {
    pub fn factor(&self, name: &str) -> Option<&FactorLevels> {
        self.factors.iter().find(|f| f.name == name)
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric.iter().any(|n| n == name)
    }

    /// Evaluate every term for one observation
    pub(crate) fn row(
        &self,
        source: &impl RowSource,
        centering: &CenteringConstants,
    ) -> Result<Vec<f64>> {
        self.terms.iter().map(|t| t.value(source, centering)).collect()
    }
}

/// Access to one observation's predictor values by name
pub(crate) trait RowSource {
    fn numeric(&self, name: &str) -> Result<f64>;
    fn level(&self, name: &str) -> Result<&str>;
}

struct TrainingRow<'a> {
    predictors: &'a [Predictor],
    index: usize,
}

impl TrainingRow<'_> {
    fn find(&self, name: &str) -> Result<&Predictor> {
        self.predictors
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| Error::InvalidInput(format!("unknown predictor '{name}'")))
    }
}

impl RowSource for TrainingRow<'_> {
    fn numeric(&self, name: &str) -> Result<f64> {
        match self.find(name)? {
            Predictor::Numeric { values, .. } => Ok(values[self.index]),
            Predictor::Categorical { .. } => {
                Err(Error::InvalidInput(format!("'{name}' is not numeric")))
            }
        }
    }

    fn level(&self, name: &str) -> Result<&str> {
        match self.find(name)? {
            Predictor::Categorical { values, .. } => Ok(values[self.index].as_str()),
            Predictor::Numeric { .. } => {
                Err(Error::InvalidInput(format!("'{name}' is not categorical")))
            }
        }
    }
}

/// Matrix `X` with one row per observation and its column metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DesignMatrix {
    pub matrix: DMatrix<f64>,
    pub column_names: Vec<String>,
    pub centering: CenteringConstants,
    pub layout: DesignLayout,
}

impl DesignMatrix {
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }
}

/// Build the design matrix of a model
///
/// Columns: intercept, main effects in predictor order, then interaction
/// columns in declaration order. A numeric predictor is centered on its mean
/// when it appears in an interaction or square and
/// [`ModelSpec::center_continuous`] is set; its interaction columns use the
/// same centered values.
///
/// # Errors
/// [`Error::InvalidInput`] for an empty model, duplicate or unknown names,
/// interactions whose predictor types do not match, ragged or non-finite
/// columns, or zero observations.
#[instrument(
    skip(spec),
    fields(predictors = spec.predictors.len(), interactions = spec.interactions.len())
)]
pub fn build_design_matrix(spec: &ModelSpec) -> Result<DesignMatrix> {
    let first = spec
        .predictors
        .first()
        .ok_or_else(|| Error::InvalidInput("model has no predictors".to_string()))?;
    let n = first.len();
    if n == 0 {
        return Err(Error::InvalidInput("model has no observations".to_string()));
    }

    let mut seen = HashSet::new();
    for predictor in &spec.predictors {
        if !seen.insert(predictor.name()) {
            return Err(Error::InvalidInput(format!(
                "duplicate predictor '{}'",
                predictor.name()
            )));
        }
        if predictor.len() != n {
            return Err(Error::size_mismatch(n, predictor.len(), predictor.name()));
        }
        if let Predictor::Numeric { name, values } = predictor {
            if values.iter().any(|v| !v.is_finite()) {
                return Err(Error::non_finite(name));
            }
        }
    }

    let layout = layout(spec)?;
    let centering = CenteringConstants {
        variables: spec
            .predictors
            .iter()
            .filter_map(|p| match p {
                Predictor::Numeric { name, values } => Some(VariableCentering {
                    name: name.clone(),
                    mean: mean(values),
                    sd: standard_deviation(values),
                    centered: spec.center_continuous && spec.in_interaction(name),
                }),
                Predictor::Categorical { .. } => None,
            })
            .collect(),
    };

    let p = layout.terms.len();
    let mut matrix = DMatrix::zeros(n, p);
    for i in 0..n {
        let row = layout.row(
            &TrainingRow {
                predictors: &spec.predictors,
                index: i,
            },
            &centering,
        )?;
        for (j, value) in row.into_iter().enumerate() {
            matrix[(i, j)] = value;
        }
    }

    let column_names: Vec<String> = layout.terms.iter().map(Term::label).collect();
    debug!("design matrix {}x{}: {:?}", n, p, column_names);

    Ok(DesignMatrix {
        matrix,
        column_names,
        centering,
        layout,
    })
}

fn layout(spec: &ModelSpec) -> Result<DesignLayout> {
    let mut terms = vec![Term::Intercept];
    let mut numeric = Vec::new();
    let mut factors = Vec::new();

    for predictor in &spec.predictors {
        match predictor {
            Predictor::Numeric { name, .. } => {
                terms.push(Term::Numeric(name.clone()));
                numeric.push(name.clone());
            }
            Predictor::Categorical {
                name,
                levels,
                reference,
                ..
            } => {
                terms.extend(predictor.dummy_levels().into_iter().map(|level| Term::Dummy {
                    name: name.clone(),
                    level: level.to_string(),
                }));
                factors.push(FactorLevels {
                    name: name.clone(),
                    levels: levels.clone(),
                    reference: reference.clone(),
                });
            }
        }
    }

    let lookup = |name: &str| lookup(spec, name);
    let mismatch = |interaction: &Interaction| {
        Error::InvalidInput(format!(
            "predictor types do not match interaction {interaction:?}"
        ))
    };

    for interaction in &spec.interactions {
        match interaction {
            Interaction::ContinuousContinuous(a, b) => {
                if !(lookup(a)?.is_numeric() && lookup(b)?.is_numeric()) {
                    return Err(mismatch(interaction));
                }
                terms.push(Term::Product(a.clone(), b.clone()));
            }
            Interaction::ContinuousCategorical(a, b) => {
                let (pa, pb) = (lookup(a)?, lookup(b)?);
                let (cont, factor) = match (pa.is_numeric(), pb.is_numeric()) {
                    (true, false) => (pa, pb),
                    (false, true) => (pb, pa),
                    _ => return Err(mismatch(interaction)),
                };
                terms.extend(factor.dummy_levels().into_iter().map(|level| {
                    Term::NumericByLevel {
                        numeric: cont.name().to_string(),
                        factor: factor.name().to_string(),
                        level: level.to_string(),
                    }
                }));
            }
            Interaction::CategoricalCategorical(a, b) => {
                let (pa, pb) = (lookup(a)?, lookup(b)?);
                if pa.is_numeric() || pb.is_numeric() {
                    return Err(mismatch(interaction));
                }
                for level_a in pa.dummy_levels() {
                    for level_b in pb.dummy_levels() {
                        terms.push(Term::LevelByLevel {
                            a: a.clone(),
                            level_a: level_a.to_string(),
                            b: b.clone(),
                            level_b: level_b.to_string(),
                        });
                    }
                }
            }
            Interaction::Quadratic(a) => {
                if !lookup(a)?.is_numeric() {
                    return Err(mismatch(interaction));
                }
                terms.push(Term::Square(a.clone()));
            }
        }
    }

    Ok(DesignLayout {
        terms,
        numeric,
        factors,
    })
}

fn lookup<'a>(spec: &'a ModelSpec, name: &str) -> Result<&'a Predictor> {
    spec.predictor(name).ok_or_else(|| {
        Error::InvalidInput(format!("interaction refers to unknown predictor '{name}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn spec() -> ModelSpec {
        ModelSpec::new(vec![
            Predictor::numeric("age", vec![20.0, 30.0, 40.0, 50.0, 60.0]),
            Predictor::numeric("hours", vec![1.0, 3.0, 2.0, 5.0, 4.0]),
            Predictor::categorical("site", &["n", "s", "n", "e", "n"]).unwrap(),
            Predictor::categorical("tier", &["lo", "hi", "hi", "lo", "lo"]).unwrap(),
        ])
    }

    #[test]
    fn test_main_effects_only() {
        let design = build_design_matrix(&spec()).unwrap();
        assert_eq!(
            design.column_names,
            vec!["Intercept", "age", "hours", "site_s", "site_e", "tier_hi"]
        );
        assert_eq!(design.nrows(), 5);
        assert_abs_diff_eq!(design.matrix[(0, 0)], 1.0);
        assert_abs_diff_eq!(design.matrix[(0, 1)], 20.0);
        assert_abs_diff_eq!(design.matrix[(1, 3)], 1.0);
        assert_abs_diff_eq!(design.matrix[(3, 4)], 1.0);
        assert_abs_diff_eq!(design.matrix[(2, 5)], 1.0);
        assert!(design.centering.variables.iter().all(|c| !c.centered));
        assert_abs_diff_eq!(design.centering.get("age").unwrap().mean, 40.0);
    }

    #[test]
    fn test_interaction_columns_and_centering() {
        let spec = spec()
            .with_interaction(Interaction::continuous("age", "hours"))
            .with_interaction(Interaction::mixed("site", "hours"))
            .with_interaction(Interaction::categorical("site", "tier"))
            .with_interaction(Interaction::quadratic("age"));
        let design = build_design_matrix(&spec).unwrap();
        assert_eq!(
            &design.column_names[6..],
            &[
                "age × hours",
                "hours × site_s",
                "hours × site_e",
                "site_s × tier_hi",
                "site_e × tier_hi",
                "age²",
            ]
        );

        // age mean 40, hours mean 3, both centered
        assert!(design.centering.get("age").unwrap().centered);
        assert_abs_diff_eq!(design.matrix[(0, 1)], -20.0);
        assert_abs_diff_eq!(design.matrix[(0, 6)], -20.0 * -2.0);
        assert_abs_diff_eq!(design.matrix[(1, 7)], 0.0);
        assert_abs_diff_eq!(design.matrix[(0, 11)], 400.0);
        // row 1 is site s, tier hi
        assert_abs_diff_eq!(design.matrix[(1, 9)], 1.0);
    }

    #[test]
    fn test_centering_disabled() {
        let spec = spec()
            .with_interaction(Interaction::quadratic("age"))
            .with_centering(false);
        let design = build_design_matrix(&spec).unwrap();
        assert_abs_diff_eq!(design.matrix[(0, 1)], 20.0);
        assert_abs_diff_eq!(design.matrix[(0, 6)], 400.0);
    }

    #[test]
    fn test_invalid_models() {
        assert!(build_design_matrix(&ModelSpec::new(vec![])).is_err());
        let empty_column = ModelSpec::new(vec![Predictor::numeric("x", vec![])]);
        assert!(build_design_matrix(&empty_column).is_err());
        assert!(build_design_matrix(&ModelSpec::new(vec![
            Predictor::numeric("x", vec![1.0, 2.0]),
            Predictor::numeric("z", vec![1.0]),
        ]))
        .is_err());
        assert!(build_design_matrix(&ModelSpec::new(vec![
            Predictor::numeric("x", vec![1.0, 2.0]),
            Predictor::numeric("x", vec![1.0, 3.0]),
        ]))
        .is_err());
        for interaction in [
            Interaction::quadratic("site"),
            Interaction::continuous("age", "tier"),
            Interaction::mixed("age", "hours"),
            Interaction::categorical("site", "age"),
            Interaction::quadratic("missing"),
        ] {
            assert!(build_design_matrix(&spec().with_interaction(interaction)).is_err());
        }
    }
}
