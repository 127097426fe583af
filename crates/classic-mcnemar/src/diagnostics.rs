//! Assumption checks for McNemar's test

use crate::types::{ContingencyCounts, McNemarMethod};
use classic_core::{overall_severity, Diagnostic, Severity};

/// Checks run by [`diagnose`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum McNemarCheck {
    /// Number of discordant pairs
    DiscordantVolume,
    /// Larger over smaller of the A-positive and A-negative rows
    OutcomeBalance,
    /// Whether the selected method suits the discordant volume
    MethodFit,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct McNemarDiagnostics {
    pub checks: Vec<Diagnostic<McNemarCheck>>,
    pub overall: Severity,
}

impl McNemarDiagnostics {
    pub fn check(&self, kind: McNemarCheck) -> Option<&Diagnostic<McNemarCheck>> {
        self.checks.iter().find(|d| d.kind == kind)
    }
}

/// Grade the table for the chosen method
pub fn diagnose(counts: &ContingencyCounts, method: McNemarMethod) -> McNemarDiagnostics {
    let discordant = counts.discordant() as f64;

    let volume = Severity::below(discordant, 25.0, 10.0);

    let balance_ratio = if counts.total() > 0 {
        let (pos, neg) = (counts.a_positive(), counts.a_negative());
        pos.max(neg) as f64 / pos.min(neg).max(1) as f64
    } else {
        f64::NAN
    };
    let balance = Severity::above(balance_ratio, 3.0, f64::INFINITY);

    let method_fit = match method {
        McNemarMethod::Exact if discordant >= 40.0 => Severity::Caution,
        McNemarMethod::Exact => Severity::Good,
        McNemarMethod::ChiSquareCorrected => Severity::below(discordant, 25.0, 10.0),
        McNemarMethod::ChiSquare => Severity::below(discordant, 25.0, f64::NEG_INFINITY),
    };

    let checks = vec![
        Diagnostic::new(McNemarCheck::DiscordantVolume, volume, discordant),
        Diagnostic::new(McNemarCheck::OutcomeBalance, balance, balance_ratio),
        Diagnostic::new(McNemarCheck::MethodFit, method_fit, discordant),
    ];
    let overall = overall_severity(&checks);
    McNemarDiagnostics { checks, overall }
}
