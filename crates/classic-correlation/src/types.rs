//! Types for correlation analysis

use classic_core::{Alternative, ConfidenceInterval, DEFAULT_ALPHA};
use std::fmt;

/// Which coefficient to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CorrelationMethod {
    /// Product-moment correlation on raw values
    #[default]
    Pearson,
    /// Pearson correlation on mid-ranks
    Spearman,
}

impl CorrelationMethod {
    /// Get the name of the method
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pearson => "Pearson",
            Self::Spearman => "Spearman",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Options for [`crate::correlate`] and [`crate::correlation_matrix`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationOptions {
    /// Coefficient to test
    pub method: CorrelationMethod,
    /// Significance level; clamped to [`crate::ALPHA_CLAMP`]
    pub alpha: f64,
    /// Tail of the significance test
    pub alternative: Alternative,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            method: CorrelationMethod::Pearson,
            alpha: DEFAULT_ALPHA,
            alternative: Alternative::TwoSided,
        }
    }
}

impl CorrelationOptions {
    pub fn with_method(mut self, method: CorrelationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }
}

/// Result of a paired correlation analysis
///
/// Degenerate inputs (a constant variable) leave the coefficient and every
/// statistic derived from it as `NaN`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationResult {
    /// Method the inference is based on
    pub method: CorrelationMethod,
    /// Number of pairs
    pub n: usize,
    /// Degrees of freedom (`n - 2`)
    pub df: usize,
    /// Significance level actually used (after clamping)
    pub alpha: f64,
    /// Coefficient for `method`
    pub r: f64,
    /// `r²`
    pub r_squared: f64,
    /// t statistic for H0: rho = 0
    pub t_statistic: f64,
    /// p-value for the configured alternative
    pub p_value: f64,
    /// Fisher-z interval at `1 - alpha`; undefined when `n <= 3`
    pub confidence_interval: ConfidenceInterval,
    /// Standard error on the Fisher-z scale, `1/sqrt(n - 3)`
    pub standard_error_z: f64,
    /// Mean of x
    pub mean_x: f64,
    /// Mean of y
    pub mean_y: f64,
    /// Sample standard deviation of x
    pub sd_x: f64,
    /// Sample standard deviation of y
    pub sd_y: f64,
    /// Pearson coefficient, whatever `method` is
    pub pearson_r: f64,
    /// Spearman coefficient, whatever `method` is
    pub spearman_r: f64,
}

impl CorrelationResult {
    /// Whether the test rejects at the result's alpha
    pub fn is_significant(&self) -> bool {
        self.p_value < self.alpha
    }
}

impl fmt::Display for CorrelationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} r = {:.4} (n = {}, t({}) = {:.3}, p = {:.4})",
            self.method, self.r, self.n, self.df, self.t_statistic, self.p_value
        )
    }
}

/// One off-diagonal cell of a correlation matrix
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairCorrelation {
    /// Row index of the first variable
    pub i: usize,
    /// Column index of the second variable
    pub j: usize,
    pub x_name: String,
    pub y_name: String,
    /// Full analysis for this pair
    pub result: CorrelationResult,
}

/// Correlations among k variables
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationMatrix {
    /// Variable names in matrix order
    pub names: Vec<String>,
    /// Symmetric `k x k` matrix with a unit diagonal
    pub matrix: classic_core::DMatrix<f64>,
    /// Every unordered pair `(i < j)` in row-major order
    pub pairs: Vec<PairCorrelation>,
}

impl CorrelationMatrix {
    /// Coefficient between two variables by name
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.matrix[(i, j)])
    }

    /// Pair analysis by name, in either order
    pub fn pair(&self, a: &str, b: &str) -> Option<&PairCorrelation> {
        self.pairs.iter().find(|p| {
            (p.x_name == a && p.y_name == b) || (p.x_name == b && p.y_name == a)
        })
    }
}
