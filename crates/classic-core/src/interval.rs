//! Confidence interval value type

use std::fmt;

/// A confidence interval with lower and upper bounds
///
/// Bounds are `NaN` when the interval is undefined for the data at hand
/// (for example a Fisher-z interval with three observations).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceInterval {
    /// Lower bound of the interval
    pub lower: f64,
    /// Upper bound of the interval
    pub upper: f64,
    /// The point estimate
    pub estimate: f64,
    /// Confidence level (e.g., 0.95 for 95% CI)
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    /// Create a new confidence interval
    pub fn new(lower: f64, upper: f64, estimate: f64, confidence_level: f64) -> Self {
        Self {
            lower,
            upper,
            estimate,
            confidence_level,
        }
    }

    /// Symmetric interval `estimate ± margin`
    pub fn symmetric(estimate: f64, margin: f64, confidence_level: f64) -> Self {
        Self::new(estimate - margin, estimate + margin, estimate, confidence_level)
    }

    /// Interval with undefined bounds
    pub fn undefined(estimate: f64, confidence_level: f64) -> Self {
        Self::new(f64::NAN, f64::NAN, estimate, confidence_level)
    }

    /// Whether both bounds are finite
    pub fn is_defined(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// Width of the confidence interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Margin of error (half-width)
    pub fn margin_of_error(&self) -> f64 {
        self.width() / 2.0
    }

    /// Check if a value is contained in the interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

impl fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}% CI: [{:.4}, {:.4}], estimate: {:.4}",
            self.confidence_level * 100.0,
            self.lower,
            self.upper,
            self.estimate
        )
    }
}
