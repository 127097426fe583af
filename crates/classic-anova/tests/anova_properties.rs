//! Property tests for one-way ANOVA built from raw observations

use approx::assert_abs_diff_eq;
use classic_anova::{groups_from_raw, one_way_anova, AnovaOptions, GroupSummary};
use proptest::prelude::*;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

fn labelled(groups: &[Vec<f64>]) -> Vec<(String, f64)> {
    groups
        .iter()
        .enumerate()
        .flat_map(|(g, values)| values.iter().map(move |&v| (format!("g{g}"), v)))
        .collect()
}

fn raw_groups() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(-50.0f64..50.0, 3..15), 2..6)
}

proptest! {
    #[test]
    fn prop_sums_of_squares_add_up(groups in raw_groups()) {
        let summaries = groups_from_raw(&labelled(&groups));
        prop_assume!(summaries.iter().all(|g| g.sd > 1e-9));
        let result = one_way_anova(&summaries, &AnovaOptions::default()).unwrap();

        let all: Vec<f64> = groups.iter().flatten().copied().collect();
        let grand = all.iter().sum::<f64>() / all.len() as f64;
        let direct_total: f64 = all.iter().map(|v| (v - grand).powi(2)).sum();

        prop_assert!((result.grand_mean - grand).abs() < 1e-9);
        prop_assert!((result.ss_total - direct_total).abs() < 1e-6 * direct_total.max(1.0));
        prop_assert_eq!(result.df_total, result.df_between + result.df_within);
    }

    #[test]
    fn prop_effect_sizes_are_ordered(groups in raw_groups()) {
        let summaries = groups_from_raw(&labelled(&groups));
        prop_assume!(summaries.iter().all(|g| g.sd > 1e-9));
        let result = one_way_anova(&summaries, &AnovaOptions::default()).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.eta_squared));
        prop_assert!(result.omega_squared <= result.eta_squared);
        prop_assert!((0.0..=1.0).contains(&result.p_value));
    }
}

#[test]
fn test_p_value_matches_reference_distribution() {
    let groups = vec![
        GroupSummary::new("low", 20.0, 4.0, 12),
        GroupSummary::new("mid", 22.5, 5.0, 15),
        GroupSummary::new("high", 23.0, 4.5, 10),
        GroupSummary::new("top", 25.0, 6.0, 9),
    ];
    let result = one_way_anova(&groups, &AnovaOptions::default()).unwrap();
    let reference = FisherSnedecor::new(result.df_between as f64, result.df_within as f64).unwrap();
    assert_abs_diff_eq!(
        result.p_value,
        1.0 - reference.cdf(result.f_statistic),
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        reference.cdf(result.f_critical),
        0.95,
        epsilon = 1e-5
    );
}

#[test]
fn test_raw_and_summary_paths_agree() {
    let observations = [
        ("a", 4.1),
        ("b", 6.3),
        ("a", 5.2),
        ("c", 8.8),
        ("b", 5.9),
        ("c", 7.4),
        ("a", 4.7),
        ("b", 6.8),
        ("c", 9.1),
    ];
    let summaries = groups_from_raw(&observations);
    let result = one_way_anova(&summaries, &AnovaOptions::default()).unwrap();

    let a = [4.1, 5.2, 4.7];
    let mean_a = a.iter().sum::<f64>() / 3.0;
    assert_eq!(summaries[0].name, "a");
    assert_abs_diff_eq!(summaries[0].mean, mean_a, epsilon = 1e-12);
    assert_eq!(result.k, 3);
    assert_eq!(result.df_within, 6);
    assert!(result.significant);
}
