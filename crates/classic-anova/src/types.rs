//! Types for one-way ANOVA

use classic_core::{ConfidenceInterval, ConfidenceLevel, DEFAULT_ALPHA};
use std::fmt;

/// Summary statistics of one group
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupSummary {
    pub name: String,
    pub mean: f64,
    /// Sample standard deviation
    pub sd: f64,
    pub n: usize,
}

impl GroupSummary {
    pub fn new(name: impl Into<String>, mean: f64, sd: f64, n: usize) -> Self {
        Self {
            name: name.into(),
            mean,
            sd,
            n,
        }
    }

    /// Standard error of the group mean
    pub fn standard_error(&self) -> f64 {
        self.sd / (self.n as f64).sqrt()
    }
}

/// How the Tukey HSD critical value is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TukeyCriticalMethod {
    /// Bonferroni-adjusted t critical value scaled by sqrt(2)
    ///
    /// Conservative stand-in for the studentized range quantile.
    #[default]
    BonferroniT,
    /// Studentized range quantile by numerical integration
    StudentizedRange,
}

impl fmt::Display for TukeyCriticalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BonferroniT => write!(f, "Bonferroni t"),
            Self::StudentizedRange => write!(f, "studentized range"),
        }
    }
}

/// Options for [`crate::one_way_anova`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaOptions {
    /// Significance level for the F test and Tukey comparisons
    pub alpha: f64,
    /// Level of the per-group mean intervals
    pub confidence_level: ConfidenceLevel,
    pub tukey_method: TukeyCriticalMethod,
}

impl Default for AnovaOptions {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            confidence_level: ConfidenceLevel::default(),
            tukey_method: TukeyCriticalMethod::default(),
        }
    }
}

impl AnovaOptions {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_tukey_method(mut self, method: TukeyCriticalMethod) -> Self {
        self.tukey_method = method;
        self
    }
}

/// Confidence interval for one group mean
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupInterval {
    pub name: String,
    pub n: usize,
    pub mean: f64,
    /// `sd / sqrt(n)`
    pub standard_error: f64,
    /// t critical value on `df_within` degrees of freedom
    pub critical_value: f64,
    pub interval: ConfidenceInterval,
}

/// One Tukey HSD contrast between groups `i` and `j`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TukeyComparison {
    pub i: usize,
    pub j: usize,
    pub group_a: String,
    pub group_b: String,
    /// `mean_i - mean_j`
    pub difference: f64,
    /// `sqrt((ms_within / 2)(1/n_i + 1/n_j))`
    pub standard_error: f64,
    /// `|difference| / standard_error`
    pub q_statistic: f64,
    /// `q_critical * standard_error`
    pub margin: f64,
    pub lower: f64,
    pub upper: f64,
    /// `q_statistic > q_critical`
    pub significant: bool,
}

/// Result of a one-way ANOVA on group summaries
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaResult {
    /// Number of groups
    pub k: usize,
    /// Total number of observations
    pub total_n: usize,
    /// Mean of all observations (weighted by group size)
    pub grand_mean: f64,
    /// Unweighted mean of the group means
    pub equal_weight_mean: f64,
    pub ss_between: f64,
    pub ss_within: f64,
    pub ss_total: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub df_total: usize,
    /// `NaN` when `df_between` is 0
    pub ms_between: f64,
    /// `NaN` when `df_within` is 0
    pub ms_within: f64,
    pub f_statistic: f64,
    pub p_value: f64,
    /// F quantile at `1 - alpha`
    pub f_critical: f64,
    pub alpha: f64,
    pub significant: bool,
    pub eta_squared: f64,
    pub omega_squared: f64,
    /// Per-group mean intervals at the configured level
    pub group_intervals: Vec<GroupInterval>,
    pub tukey_method: TukeyCriticalMethod,
    pub tukey_critical: f64,
    /// All pairwise contrasts in row-major `(i < j)` order
    pub comparisons: Vec<TukeyComparison>,
}

impl fmt::Display for AnovaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "F({}, {}) = {:.3}, p = {:.4}, eta² = {:.3}",
            self.df_between, self.df_within, self.f_statistic, self.p_value, self.eta_squared
        )
    }
}
