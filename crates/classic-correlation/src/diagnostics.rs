//! Assumption checks for a correlation analysis

use crate::types::{CorrelationMethod, CorrelationResult};
use classic_core::descriptive::{skewness, z_scores};
use classic_core::{overall_severity, Diagnostic, Severity};

/// |z| beyond which a point counts as an outlier
pub const OUTLIER_Z: f64 = 3.5;

/// Checks run by [`diagnose`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CorrelationCheck {
    /// Number of pairs
    SampleSize,
    /// Both variables vary
    Spread,
    /// Worst |skewness| of the two variables
    Skewness,
    /// Largest |z| of either variable
    Outliers,
    /// |pearson - spearman|
    MethodAlignment,
    /// Strength of the reported coefficient
    Relationship,
}

/// Verdicts plus a suggested coefficient
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationDiagnostics {
    pub checks: Vec<Diagnostic<CorrelationCheck>>,
    /// `None` when a variable has no spread
    pub recommended: Option<CorrelationMethod>,
    pub overall: Severity,
}

impl CorrelationDiagnostics {
    /// Verdict for one check, if it was run
    pub fn check(&self, kind: CorrelationCheck) -> Option<&Diagnostic<CorrelationCheck>> {
        self.checks.iter().find(|d| d.kind == kind)
    }
}

/// Grade the data behind `result`
///
/// `x` and `y` must be the slices `result` was computed from.
pub fn diagnose(x: &[f64], y: &[f64], result: &CorrelationResult) -> CorrelationDiagnostics {
    let mut checks = Vec::with_capacity(6);
    let mut recommended = None;

    checks.push(Diagnostic::new(
        CorrelationCheck::SampleSize,
        Severity::below(result.n as f64, 20.0, 10.0),
        result.n as f64,
    ));

    let has_spread = [result.sd_x, result.sd_y]
        .iter()
        .all(|sd| sd.is_finite() && *sd > 0.0);
    checks.push(Diagnostic::new(
        CorrelationCheck::Spread,
        if has_spread { Severity::Good } else { Severity::Alert },
        result.sd_x.min(result.sd_y),
    ));

    let worst_skew = skewness(x).abs().max(skewness(y).abs());
    let skew_severity = if !worst_skew.is_finite() {
        Severity::Caution
    } else if worst_skew >= 2.0 {
        Severity::Alert
    } else if worst_skew >= 1.0 {
        Severity::Caution
    } else {
        Severity::Good
    };
    if worst_skew >= 1.0 {
        recommended = Some(CorrelationMethod::Spearman);
    }
    checks.push(Diagnostic::new(
        CorrelationCheck::Skewness,
        skew_severity,
        worst_skew,
    ));

    if has_spread {
        let max_z = z_scores(x)
            .into_iter()
            .chain(z_scores(y))
            .map(f64::abs)
            .fold(0.0, f64::max);
        let severity = if max_z > OUTLIER_Z {
            recommended = Some(CorrelationMethod::Spearman);
            match result.method {
                CorrelationMethod::Pearson => Severity::Alert,
                CorrelationMethod::Spearman => Severity::Caution,
            }
        } else {
            Severity::Good
        };
        checks.push(Diagnostic::new(CorrelationCheck::Outliers, severity, max_z));
    } else {
        checks.push(Diagnostic::new(
            CorrelationCheck::Outliers,
            Severity::Caution,
            f64::NAN,
        ));
    }

    if result.pearson_r.is_finite() && result.spearman_r.is_finite() {
        let gap = (result.pearson_r - result.spearman_r).abs();
        let severity = if gap >= 0.2 {
            recommended = Some(CorrelationMethod::Spearman);
            Severity::Alert
        } else if gap >= 0.1 {
            Severity::Caution
        } else {
            if gap < 0.05 && recommended != Some(CorrelationMethod::Spearman) {
                recommended = Some(CorrelationMethod::Pearson);
            }
            Severity::Good
        };
        checks.push(Diagnostic::new(
            CorrelationCheck::MethodAlignment,
            severity,
            gap,
        ));
    }

    if result.r.is_finite() {
        let severity = match result.method {
            CorrelationMethod::Spearman => Severity::below(result.r.abs(), 0.3, 0.15),
            CorrelationMethod::Pearson => {
                if result.r_squared < 0.05 {
                    recommended.get_or_insert(CorrelationMethod::Spearman);
                    Severity::Caution
                } else {
                    recommended.get_or_insert(CorrelationMethod::Pearson);
                    Severity::Good
                }
            }
        };
        checks.push(Diagnostic::new(
            CorrelationCheck::Relationship,
            severity,
            result.r,
        ));
    }

    if !has_spread {
        recommended = None;
    }

    let overall = overall_severity(&checks);
    CorrelationDiagnostics {
        checks,
        recommended,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::correlate;
    use crate::types::CorrelationOptions;

    fn run(x: &[f64], y: &[f64], method: CorrelationMethod) -> CorrelationDiagnostics {
        let result = correlate(x, y, &CorrelationOptions::default().with_method(method)).unwrap();
        diagnose(x, y, &result)
    }

    #[test]
    fn test_clean_linear_data_recommends_pearson() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 2.0 * v + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let diagnostics = run(&x, &y, CorrelationMethod::Pearson);

        assert_eq!(diagnostics.recommended, Some(CorrelationMethod::Pearson));
        assert_eq!(
            diagnostics.check(CorrelationCheck::SampleSize).unwrap().severity,
            Severity::Good
        );
        assert_eq!(
            diagnostics.check(CorrelationCheck::Outliers).unwrap().severity,
            Severity::Good
        );
        assert_eq!(diagnostics.overall, Severity::Good);
    }

    #[test]
    fn test_small_sample_alerts() {
        let diagnostics = run(
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[2.0, 4.0, 5.0, 4.0, 5.0],
            CorrelationMethod::Pearson,
        );
        let size = diagnostics.check(CorrelationCheck::SampleSize).unwrap();
        assert_eq!(size.severity, Severity::Alert);
        assert_eq!(size.value, 5.0);
        assert_eq!(diagnostics.overall, Severity::Alert);
    }

    #[test]
    fn test_outlier_depends_on_method() {
        let mut x: Vec<f64> = (0..40).map(|i| (i % 10) as f64).collect();
        let mut y: Vec<f64> = x.iter().map(|v| v + 1.0).collect();
        x.push(200.0);
        y.push(5.0);

        let pearson = run(&x, &y, CorrelationMethod::Pearson);
        assert_eq!(
            pearson.check(CorrelationCheck::Outliers).unwrap().severity,
            Severity::Alert
        );
        assert_eq!(pearson.recommended, Some(CorrelationMethod::Spearman));

        let spearman = run(&x, &y, CorrelationMethod::Spearman);
        assert_eq!(
            spearman.check(CorrelationCheck::Outliers).unwrap().severity,
            Severity::Caution
        );
    }

    #[test]
    fn test_constant_variable() {
        let diagnostics = run(
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[3.0, 3.0, 3.0, 3.0, 3.0],
            CorrelationMethod::Pearson,
        );
        assert_eq!(
            diagnostics.check(CorrelationCheck::Spread).unwrap().severity,
            Severity::Alert
        );
        assert!(diagnostics.check(CorrelationCheck::Outliers).unwrap().value.is_nan());
        assert!(diagnostics.check(CorrelationCheck::MethodAlignment).is_none());
        assert!(diagnostics.check(CorrelationCheck::Relationship).is_none());
        assert_eq!(diagnostics.recommended, None);
    }

    #[test]
    fn test_weak_spearman_relationship() {
        let x: Vec<f64> = (0..24).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..24).map(|i| ((i * 7) % 24) as f64).collect();
        let diagnostics = run(&x, &y, CorrelationMethod::Spearman);
        let relationship = diagnostics.check(CorrelationCheck::Relationship).unwrap();
        assert!(relationship.value.abs() < 0.3);
        assert!(relationship.severity >= Severity::Caution);
    }
}
