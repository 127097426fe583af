//! Least-absolute-deviation fits of line and parabola models
//!
//! Each fit starts the simplex at the least-squares solution and then
//! minimizes the mean absolute error directly. Categorical variants add one
//! additive shift per category relative to a baseline category.

use crate::nelder_mead::{nelder_mead, NelderMeadOptions, Optimum};
use classic_core::matrix::invert;
use classic_core::{DMatrix, DVector, Error, Result};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument, warn};

/// Minimum observations for the quadratic categorical model
pub const MIN_QUADRATIC_CATEGORICAL: usize = 5;

const LINEAR_ITERATIONS: usize = 2000;
const QUADRATIC_ITERATIONS: usize = 3000;
const LINEAR_CATEGORICAL_ITERATIONS: usize = 3000;
const QUADRATIC_CATEGORICAL_ITERATIONS: usize = 4000;
const FIT_TOLERANCE: f64 = 1e-10;

/// Mean of `|actual - predicted|`
///
/// # Errors
/// [`Error::InvalidInput`] for empty or mismatched slices.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.len() != predicted.len() {
        return Err(Error::size_mismatch(actual.len(), predicted.len(), "mean absolute error"));
    }
    if actual.is_empty() {
        return Err(Error::InvalidInput("mean absolute error of no values".to_string()));
    }
    Ok(absolute_error(actual, predicted.iter().copied()))
}

fn absolute_error(actual: &[f64], predicted: impl Iterator<Item = f64>) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Shape of a fitted MAE model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum L1Model {
    /// `b0 + b1 x`
    Linear,
    /// `b0 + b1 x + b2 x²`
    Quadratic,
    /// `b0 + b1 x + shift[category]`
    LinearCategorical,
    /// `b0 + b1 x + b2 x² + shift[category]`
    QuadraticCategorical,
}

impl L1Model {
    /// Number of polynomial coefficients before the category shifts
    pub fn polynomial_terms(&self) -> usize {
        match self {
            Self::Linear | Self::LinearCategorical => 2,
            Self::Quadratic | Self::QuadraticCategorical => 3,
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::LinearCategorical | Self::QuadraticCategorical)
    }
}

impl fmt::Display for L1Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::LinearCategorical => "linear + category",
            Self::QuadraticCategorical => "quadratic + category",
        };
        write!(f, "{name}")
    }
}

/// A fitted MAE model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct L1Fit {
    pub model: L1Model,
    /// Polynomial coefficients, lowest order first, then one shift per
    /// non-baseline category
    pub params: Vec<f64>,
    pub mae: f64,
    /// Categories in order of first appearance; the first is the baseline
    pub categories: Vec<String>,
    pub optimum: Optimum,
}

impl L1Fit {
    /// Polynomial coefficients without category shifts
    pub fn coefficients(&self) -> &[f64] {
        &self.params[..self.model.polynomial_terms()]
    }

    /// Shift of `category` relative to the baseline; `None` if unknown
    pub fn shift(&self, category: &str) -> Option<f64> {
        let index = self.categories.iter().position(|c| c == category)?;
        Some(if index == 0 {
            0.0
        } else {
            self.params[self.model.polynomial_terms() + index - 1]
        })
    }

    /// Predicted value at `x`
    ///
    /// # Errors
    /// [`Error::InvalidInput`] when a categorical model gets no category or
    /// one it was not fitted on.
    pub fn predict(&self, x: f64, category: Option<&str>) -> Result<f64> {
        let polynomial = self
            .coefficients()
            .iter()
            .rev()
            .fold(0.0, |acc, b| acc * x + b);
        if !self.model.is_categorical() {
            return Ok(polynomial);
        }
        let category = category
            .ok_or_else(|| Error::InvalidInput(format!("{} model needs a category", self.model)))?;
        let shift = self
            .shift(category)
            .ok_or_else(|| Error::InvalidInput(format!("unknown category '{category}'")))?;
        Ok(polynomial + shift)
    }
}

/// Fit `b0 + b1 x` by minimizing the mean absolute error
///
/// # Errors
/// [`Error::InvalidInput`] for empty, mismatched or non-finite data.
#[instrument(skip(x, y), fields(n = x.len()))]
pub fn fit_linear(x: &[f64], y: &[f64]) -> Result<L1Fit> {
    check_xy(x, y, 1)?;
    let (b0, b1) = least_squares_line(x, y);
    let optimum = nelder_mead(
        |p: &[f64]| absolute_error(y, x.iter().map(|xi| p[0] + p[1] * xi)),
        &[b0, b1],
        &NelderMeadOptions::new(LINEAR_ITERATIONS, FIT_TOLERANCE),
    )?;
    Ok(finish(L1Model::Linear, optimum, Vec::new()))
}

/// Fit `b0 + b1 x + b2 x²` by minimizing the mean absolute error
///
/// The simplex starts at the least-squares parabola, or at the MAE line with
/// zero curvature when the normal equations are singular.
///
/// # Errors
/// * [`Error::InvalidInput`] for mismatched or non-finite data
/// * [`Error::InsufficientData`] for fewer than three observations
#[instrument(skip(x, y), fields(n = x.len()))]
pub fn fit_quadratic(x: &[f64], y: &[f64]) -> Result<L1Fit> {
    check_xy(x, y, 3)?;
    let seed = quadratic_seed(x, y)?;
    let optimum = nelder_mead(
        |p: &[f64]| absolute_error(y, x.iter().map(|xi| p[0] + p[1] * xi + p[2] * xi * xi)),
        &seed,
        &NelderMeadOptions::new(QUADRATIC_ITERATIONS, FIT_TOLERANCE),
    )?;
    Ok(finish(L1Model::Quadratic, optimum, Vec::new()))
}

/// Fit a line plus one shift per non-baseline category
///
/// The baseline is the first category in order of appearance. Shifts start at
/// the difference of each category's mean outcome from the baseline mean.
#[instrument(skip(x, categories, y), fields(n = x.len()))]
pub fn fit_linear_categorical<S: AsRef<str>>(
    x: &[f64],
    categories: &[S],
    y: &[f64],
) -> Result<L1Fit> {
    check_xy(x, y, 1)?;
    let coding = CategoryCoding::new(categories, y)?;
    let line = fit_linear(x, y)?;
    let mut seed = line.params.clone();
    seed.extend(coding.mean_shifts());

    let optimum = nelder_mead(
        |p: &[f64]| {
            absolute_error(
                y,
                x.iter()
                    .zip(&coding.codes)
                    .map(|(xi, &c)| p[0] + p[1] * xi + coding.shift(p, 2, c)),
            )
        },
        &seed,
        &NelderMeadOptions::new(LINEAR_CATEGORICAL_ITERATIONS, FIT_TOLERANCE),
    )?;
    Ok(finish(L1Model::LinearCategorical, optimum, coding.names))
}

/// Fit a parabola plus one shift per non-baseline category
///
/// # Errors
/// As [`fit_linear_categorical`], plus [`Error::InsufficientData`] for fewer
/// than five observations.
#[instrument(skip(x, categories, y), fields(n = x.len()))]
pub fn fit_quadratic_categorical<S: AsRef<str>>(
    x: &[f64],
    categories: &[S],
    y: &[f64],
) -> Result<L1Fit> {
    check_xy(x, y, MIN_QUADRATIC_CATEGORICAL)?;
    let coding = CategoryCoding::new(categories, y)?;
    let parabola = fit_quadratic(x, y)?;
    let mut seed = parabola.params.clone();
    seed.extend(coding.mean_shifts());

    let optimum = nelder_mead(
        |p: &[f64]| {
            absolute_error(
                y,
                x.iter().zip(&coding.codes).map(|(xi, &c)| {
                    p[0] + p[1] * xi + p[2] * xi * xi + coding.shift(p, 3, c)
                }),
            )
        },
        &seed,
        &NelderMeadOptions::new(QUADRATIC_CATEGORICAL_ITERATIONS, FIT_TOLERANCE),
    )?;
    Ok(finish(L1Model::QuadraticCategorical, optimum, coding.names))
}

fn finish(model: L1Model, optimum: Optimum, categories: Vec<String>) -> L1Fit {
    if !optimum.converged {
        warn!(
            "{} MAE fit stopped at the iteration cap ({})",
            model, optimum.iterations
        );
    }
    debug!("{} MAE fit: mae={:.6}, params={:?}", model, optimum.value, optimum.params);
    L1Fit {
        model,
        params: optimum.params.clone(),
        mae: optimum.value,
        categories,
        optimum,
    }
}

fn check_xy(x: &[f64], y: &[f64], minimum: usize) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::size_mismatch(x.len(), y.len(), "x and y"));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(Error::non_finite("model data"));
    }
    if x.is_empty() {
        return Err(Error::InvalidInput("no observations to fit".to_string()));
    }
    if x.len() < minimum {
        return Err(Error::InsufficientData {
            expected: minimum,
            actual: x.len(),
        });
    }
    Ok(())
}

/// Least-squares line; slope 0 when `x` is constant
fn least_squares_line(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (sxy, sxx) = x.iter().zip(y).fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
        (sxy + (xi - mx) * (yi - my), sxx + (xi - mx).powi(2))
    });
    let slope = if sxx != 0.0 { sxy / sxx } else { 0.0 };
    (my - slope * mx, slope)
}

fn quadratic_seed(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    let mut normal = DMatrix::<f64>::zeros(3, 3);
    let mut rhs = DVector::<f64>::zeros(3);
    for (&xi, &yi) in x.iter().zip(y) {
        let powers = [1.0, xi, xi * xi];
        for r in 0..3 {
            rhs[r] += powers[r] * yi;
            for c in 0..3 {
                normal[(r, c)] += powers[r] * powers[c];
            }
        }
    }
    match invert(&normal) {
        Ok(inverse) => Ok((inverse * rhs).iter().copied().collect()),
        Err(e) if e.is_singular() => {
            debug!("quadratic normal equations singular; seeding from the MAE line");
            let line = fit_linear(x, y)?;
            Ok(vec![line.params[0], line.params[1], 0.0])
        }
        Err(e) => Err(e),
    }
}

/// Integer codes of category labels in order of first appearance
struct CategoryCoding {
    names: Vec<String>,
    codes: Vec<usize>,
    means: Vec<f64>,
}

impl CategoryCoding {
    fn new<S: AsRef<str>>(labels: &[S], y: &[f64]) -> Result<Self> {
        if labels.len() != y.len() {
            return Err(Error::size_mismatch(y.len(), labels.len(), "categories"));
        }
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut names = Vec::new();
        let mut sums: Vec<(f64, usize)> = Vec::new();
        let mut codes = Vec::with_capacity(labels.len());
        for (label, &yi) in labels.iter().zip(y) {
            let label = label.as_ref();
            let code = *index.entry(label).or_insert_with(|| {
                names.push(label.to_string());
                sums.push((0.0, 0));
                names.len() - 1
            });
            sums[code].0 += yi;
            sums[code].1 += 1;
            codes.push(code);
        }
        Ok(Self {
            names,
            codes,
            means: sums.into_iter().map(|(s, n)| s / n as f64).collect(),
        })
    }

    /// Starting shifts: category mean minus baseline mean
    fn mean_shifts(&self) -> impl Iterator<Item = f64> + '_ {
        self.means.iter().skip(1).map(move |m| m - self.means[0])
    }

    /// Shift of category `code` given the parameter vector and the offset of
    /// the first shift
    fn shift(&self, params: &[f64], offset: usize, code: usize) -> f64 {
        if code == 0 {
            0.0
        } else {
            params[offset + code - 1]
        }
    }
}
