//! Assumption checks for one-way ANOVA

use crate::types::GroupSummary;
use classic_core::{overall_severity, Diagnostic, Severity};

/// Checks run by [`diagnose`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnovaCheck {
    /// Largest over smallest group sd
    SpreadRatio,
    /// Smallest group size
    SampleSize,
    /// Largest over smallest group size
    Balance,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaDiagnostics {
    pub checks: Vec<Diagnostic<AnovaCheck>>,
    pub overall: Severity,
}

impl AnovaDiagnostics {
    pub fn check(&self, kind: AnovaCheck) -> Option<&Diagnostic<AnovaCheck>> {
        self.checks.iter().find(|d| d.kind == kind)
    }
}

/// Grade equal-variance, size and balance assumptions
///
/// An empty slice yields no checks and an overall `Good`.
pub fn diagnose(groups: &[GroupSummary]) -> AnovaDiagnostics {
    if groups.is_empty() {
        return AnovaDiagnostics {
            checks: Vec::new(),
            overall: Severity::Good,
        };
    }

    let (sd_min, sd_max) = min_max(groups.iter().map(|g| g.sd));
    let (n_min, n_max) = min_max(groups.iter().map(|g| g.n as f64));

    let sd_ratio = if sd_min > 0.0 { sd_max / sd_min } else { f64::INFINITY };
    let balance = if n_min > 0.0 { n_max / n_min } else { f64::INFINITY };

    let checks = vec![
        Diagnostic::new(
            AnovaCheck::SpreadRatio,
            Severity::above(sd_ratio, 2.0, 4.0),
            sd_ratio,
        ),
        Diagnostic::new(
            AnovaCheck::SampleSize,
            Severity::below(n_min, 20.0, 10.0),
            n_min,
        ),
        Diagnostic::new(AnovaCheck::Balance, Severity::above(balance, 1.5, 3.0), balance),
    ];
    let overall = overall_severity(&checks);
    AnovaDiagnostics { checks, overall }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
