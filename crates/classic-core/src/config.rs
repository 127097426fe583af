//! Shared configuration types passed into every engine
//!
//! Engines keep no module-level settings; significance levels, confidence
//! levels and tail choices travel with each call.

use crate::error::{Error, Result};
use std::fmt;

/// Default significance level used by every options struct
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Confidence level type with validation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// Create a new confidence level
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if `level` is not in (0, 1)
    pub fn try_new(level: f64) -> Result<Self> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(Error::InvalidParameter(format!(
                "confidence level {level} must be in (0, 1)"
            )))
        }
    }

    /// Confidence level matching a significance level (`1 - alpha`)
    pub fn from_alpha(alpha: f64) -> Result<Self> {
        Self::try_new(1.0 - validate_alpha(alpha)?)
    }

    /// Get the confidence level value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the alpha level (1 - confidence level)
    pub fn alpha(&self) -> f64 {
        1.0 - self.0
    }

    /// Get the tail probability (alpha/2 for two-tailed)
    pub fn tail_probability(&self) -> f64 {
        self.alpha() / 2.0
    }

    /// Upper quantile used for a two-sided interval, `0.5 + level/2`
    pub fn upper_quantile(&self) -> f64 {
        0.5 + self.0 / 2.0
    }

    /// Common confidence levels
    pub const NINETY: Self = Self(0.90);
    pub const NINETY_FIVE: Self = Self(0.95);
    pub const NINETY_NINE: Self = Self(0.99);
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::NINETY_FIVE
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = Error;

    fn try_from(level: f64) -> Result<Self> {
        Self::try_new(level)
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Direction of the alternative hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alternative {
    /// Effect in either direction
    #[default]
    TwoSided,
    /// Effect greater than zero
    Greater,
    /// Effect less than zero
    Less,
}

impl Alternative {
    /// p-value for a statistic given its CDF
    ///
    /// `cdf` must be the CDF of the statistic's null distribution, which is
    /// assumed symmetric around zero.
    pub fn p_value(&self, statistic: f64, cdf: impl Fn(f64) -> f64) -> f64 {
        match self {
            Self::TwoSided => 2.0 * (1.0 - cdf(statistic.abs())),
            Self::Greater => 1.0 - cdf(statistic),
            Self::Less => cdf(statistic),
        }
    }
}

/// Check that a significance level lies in (0, 1)
pub fn validate_alpha(alpha: f64) -> Result<f64> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(alpha)
    } else {
        Err(Error::invalid_alpha(alpha))
    }
}

/// Clamp a significance level into `[lo, hi]`
///
/// `NaN` falls back to [`DEFAULT_ALPHA`] before clamping.
pub fn clamp_alpha(alpha: f64, lo: f64, hi: f64) -> f64 {
    let alpha = if alpha.is_nan() { DEFAULT_ALPHA } else { alpha };
    alpha.clamp(lo, hi)
}
