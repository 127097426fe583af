//! Types for McNemar's paired-proportion test

use classic_core::{ConfidenceInterval, ConfidenceLevel, DEFAULT_ALPHA};
use std::fmt;

/// 2x2 table of paired binary outcomes
///
/// Rows are outcome A, columns outcome B. The discordant cells are
/// `a_only_positive` (b) and `b_only_positive` (c).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContingencyCounts {
    pub both_positive: u64,
    pub a_only_positive: u64,
    pub b_only_positive: u64,
    pub both_negative: u64,
}

impl ContingencyCounts {
    pub fn new(
        both_positive: u64,
        a_only_positive: u64,
        b_only_positive: u64,
        both_negative: u64,
    ) -> Self {
        Self {
            both_positive,
            a_only_positive,
            b_only_positive,
            both_negative,
        }
    }

    pub fn total(&self) -> u64 {
        self.both_positive + self.a_only_positive + self.b_only_positive + self.both_negative
    }

    /// `b + c`
    pub fn discordant(&self) -> u64 {
        self.a_only_positive + self.b_only_positive
    }

    /// Pairs positive on A
    pub fn a_positive(&self) -> u64 {
        self.both_positive + self.a_only_positive
    }

    /// Pairs negative on A
    pub fn a_negative(&self) -> u64 {
        self.b_only_positive + self.both_negative
    }

    /// Pairs positive on B
    pub fn b_positive(&self) -> u64 {
        self.both_positive + self.b_only_positive
    }
}

/// Which statistic drives the reported p-value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum McNemarMethod {
    /// `(|b - c| - 1)² / (b + c)` on one degree of freedom
    #[default]
    ChiSquareCorrected,
    /// `(b - c)² / (b + c)` on one degree of freedom
    ChiSquare,
    /// Two-sided binomial test on the discordant pairs
    Exact,
}

impl McNemarMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChiSquareCorrected => "Chi-square (corrected)",
            Self::ChiSquare => "Chi-square (no correction)",
            Self::Exact => "Exact binomial",
        }
    }
}

impl fmt::Display for McNemarMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Options for [`crate::mcnemar_test`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct McNemarOptions {
    pub alpha: f64,
    /// Level of the odds-ratio interval
    pub confidence_level: ConfidenceLevel,
    pub method: McNemarMethod,
}

impl Default for McNemarOptions {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            confidence_level: ConfidenceLevel::default(),
            method: McNemarMethod::default(),
        }
    }
}

impl McNemarOptions {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_method(mut self, method: McNemarMethod) -> Self {
        self.method = method;
        self
    }
}

/// Result of McNemar's test
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct McNemarResult {
    pub counts: ContingencyCounts,
    pub total: u64,
    /// `b + c`
    pub discordant: u64,
    /// `c - b`
    pub net_difference: i64,
    /// `net_difference / total`
    pub net_share: f64,
    /// `discordant / total`
    pub discordant_share: f64,
    /// Share of pairs positive on A
    pub a_positive_rate: f64,
    /// Share of pairs positive on B
    pub b_positive_rate: f64,
    /// Uncorrected statistic; `NaN` without discordant pairs
    pub chi_square: f64,
    pub chi_square_p_value: f64,
    /// Continuity-corrected statistic; `NaN` without discordant pairs
    pub chi_square_corrected: f64,
    pub chi_square_corrected_p_value: f64,
    /// `NaN` without discordant pairs
    pub exact_p_value: f64,
    /// `c / b` with zero cells replaced by 0.5
    pub odds_ratio: f64,
    /// Standard error of the log odds ratio
    pub log_odds_ratio_se: f64,
    pub odds_ratio_interval: ConfidenceInterval,
    pub method: McNemarMethod,
    /// Statistic of the selected method (the p-value itself for `Exact`)
    pub statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
}

impl fmt::Display for McNemarResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.4}, p = {:.4} ({} discordant of {})",
            self.method, self.statistic, self.p_value, self.discordant, self.total
        )
    }
}
