//! Group validation and derivation from raw observations

use crate::types::GroupSummary;
use classic_core::{Error, Result, RunningStats};
use std::collections::HashMap;
use tracing::debug;

/// Smallest admissible group size
pub const MIN_GROUP_SIZE: usize = 2;

/// Check that the groups support inference
///
/// # Errors
/// * [`Error::InsufficientData`] for fewer than two groups or a group with
///   fewer than two observations
/// * [`Error::InvalidInput`] for a non-finite mean or an sd that is not
///   finite and positive
pub fn validate_groups(groups: &[GroupSummary]) -> Result<()> {
    if groups.len() < 2 {
        return Err(Error::InsufficientData {
            expected: 2,
            actual: groups.len(),
        });
    }
    for group in groups {
        if !group.mean.is_finite() {
            return Err(Error::non_finite(&format!("mean of group '{}'", group.name)));
        }
        if !(group.sd.is_finite() && group.sd > 0.0) {
            return Err(Error::InvalidInput(format!(
                "group '{}' needs a finite positive standard deviation, got {}",
                group.name, group.sd
            )));
        }
        if group.n < MIN_GROUP_SIZE {
            return Err(Error::InsufficientData {
                expected: MIN_GROUP_SIZE,
                actual: group.n,
            });
        }
    }
    Ok(())
}

/// Summarize `(label, value)` observations per label
///
/// Groups keep the order in which their label first appears. Labels with
/// fewer than two observations are dropped.
pub fn groups_from_raw<S: AsRef<str>>(observations: &[(S, f64)]) -> Vec<GroupSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut accumulators: Vec<(&str, RunningStats)> = Vec::new();

    for (label, value) in observations {
        let label = label.as_ref();
        let slot = *index.entry(label).or_insert_with(|| {
            accumulators.push((label, RunningStats::new()));
            accumulators.len() - 1
        });
        accumulators[slot].1.push(*value);
    }

    let total = accumulators.len();
    let groups: Vec<GroupSummary> = accumulators
        .into_iter()
        .filter(|(_, stats)| stats.count() >= MIN_GROUP_SIZE)
        .map(|(label, stats)| GroupSummary::new(label, stats.mean(), stats.sd(), stats.count()))
        .collect();
    if groups.len() < total {
        debug!("dropped {} groups with a single observation", total - groups.len());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_groups_from_raw_order_and_stats() {
        let observations = [
            ("control", 4.0),
            ("treated", 7.0),
            ("control", 6.0),
            ("solo", 1.0),
            ("treated", 9.0),
            ("control", 5.0),
        ];
        let groups = groups_from_raw(&observations);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "control");
        assert_eq!(groups[0].n, 3);
        assert_abs_diff_eq!(groups[0].mean, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(groups[0].sd, 1.0, epsilon = 1e-12);
        assert_eq!(groups[1].name, "treated");
        assert_abs_diff_eq!(groups[1].sd, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_groups_from_raw_accepts_owned_labels() {
        let observations = vec![
            ("a".to_string(), 1.0),
            ("a".to_string(), 3.0),
            ("b".to_string(), 2.0),
        ];
        let groups = groups_from_raw(&observations);
        assert_eq!(groups.len(), 1);
        assert_abs_diff_eq!(groups[0].mean, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_validate_groups() {
        let good = GroupSummary::new("a", 1.0, 1.0, 5);
        assert!(validate_groups(&[good.clone(), good.clone()]).is_ok());
        assert!(validate_groups(&[good.clone()]).is_err());

        let flat = GroupSummary::new("b", 1.0, 0.0, 5);
        assert!(matches!(
            validate_groups(&[good.clone(), flat]),
            Err(Error::InvalidInput(_))
        ));

        let tiny = GroupSummary::new("c", 1.0, 1.0, 1);
        assert!(matches!(
            validate_groups(&[good.clone(), tiny]),
            Err(Error::InsufficientData { expected: 2, actual: 1 })
        ));

        let broken = GroupSummary::new("d", f64::NAN, 1.0, 5);
        assert!(validate_groups(&[good, broken]).is_err());
    }
}
