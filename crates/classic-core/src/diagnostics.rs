//! Assumption-check verdicts shared by the engines
//!
//! Each engine defines its own check enum `K`; a [`Diagnostic<K>`] pairs the
//! check with the measured quantity and a [`Severity`].

use std::fmt;

/// Traffic-light severity of an assumption check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Assumption looks satisfied
    #[default]
    Good,
    /// Worth documenting
    Caution,
    /// Results should not be trusted as-is
    Alert,
}

impl Severity {
    /// Grade a value where larger is worse
    ///
    /// `Alert` if `value > alert`, `Caution` if `value > caution`.
    pub fn above(value: f64, caution: f64, alert: f64) -> Self {
        if value > alert {
            Self::Alert
        } else if value > caution {
            Self::Caution
        } else {
            Self::Good
        }
    }

    /// Grade a value where smaller is worse
    ///
    /// `Alert` if `value < alert`, `Caution` if `value < caution`.
    pub fn below(value: f64, caution: f64, alert: f64) -> Self {
        if value < alert {
            Self::Alert
        } else if value < caution {
            Self::Caution
        } else {
            Self::Good
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Good => "good",
            Self::Caution => "caution",
            Self::Alert => "alert",
        };
        write!(f, "{}", s)
    }
}

/// One assumption check and its verdict
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic<K> {
    /// Which check this is
    pub kind: K,
    /// Verdict
    pub severity: Severity,
    /// Quantity the verdict was based on (`NaN` if it could not be measured)
    pub value: f64,
}

impl<K> Diagnostic<K> {
    pub fn new(kind: K, severity: Severity, value: f64) -> Self {
        Self {
            kind,
            severity,
            value,
        }
    }
}

/// Worst severity in a set of diagnostics; `Good` when empty
pub fn overall_severity<K>(diagnostics: &[Diagnostic<K>]) -> Severity {
    diagnostics
        .iter()
        .map(|d| d.severity)
        .max()
        .unwrap_or_default()
}
