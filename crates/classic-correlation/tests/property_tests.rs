//! Property tests for the correlation coefficients and matrix mode

use approx::assert_abs_diff_eq;
use classic_core::descriptive::rank_values;
use classic_correlation::{
    correlate, correlation_matrix, pearson, spearman, CorrelationMethod, CorrelationOptions,
};
use proptest::prelude::*;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn paired(len: std::ops::Range<usize>) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    len.prop_flat_map(|n| {
        (
            prop::collection::vec(-1e3f64..1e3, n),
            prop::collection::vec(-1e3f64..1e3, n),
        )
    })
}

proptest! {
    #[test]
    fn prop_pearson_is_bounded((x, y) in paired(3..40)) {
        let r = pearson(&x, &y).unwrap();
        if r.is_finite() {
            prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&r));
        }
    }

    #[test]
    fn prop_pearson_of_affine_copy_is_one(
        x in prop::collection::vec(-1e3f64..1e3, 3..40),
        scale in 0.1f64..10.0,
        shift in -100.0f64..100.0,
    ) {
        let y: Vec<f64> = x.iter().map(|v| scale * v + shift).collect();
        let neg: Vec<f64> = x.iter().map(|v| -scale * v + shift).collect();
        let r = pearson(&x, &y).unwrap();
        if r.is_finite() {
            prop_assert!((r - 1.0).abs() < 1e-9);
            prop_assert!((pearson(&x, &neg).unwrap() + 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_spearman_is_invariant_under_ranking((x, y) in paired(3..40)) {
        let direct = spearman(&x, &y).unwrap();
        let on_ranks = spearman(&rank_values(&x), &rank_values(&y)).unwrap();
        if direct.is_finite() {
            prop_assert!((direct - on_ranks).abs() < 1e-12);
        }
    }

    #[test]
    fn prop_spearman_ignores_monotone_transforms((x, y) in paired(3..40)) {
        let cubed: Vec<f64> = y.iter().map(|v| v.powi(3)).collect();
        let a = spearman(&x, &y).unwrap();
        let b = spearman(&x, &cubed).unwrap();
        if a.is_finite() {
            prop_assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn prop_interval_contains_estimate((x, y) in paired(5..40)) {
        let result = correlate(&x, &y, &CorrelationOptions::default()).unwrap();
        if result.r.is_finite() && result.r.abs() < 0.999 {
            let ci = result.confidence_interval;
            prop_assert!(ci.lower <= result.r && result.r <= ci.upper);
            prop_assert!(ci.lower >= -1.0 && ci.upper <= 1.0);
        }
    }
}

#[test]
fn test_matrix_matches_pairwise_calls() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let n = 60;
    let a: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let b: Vec<f64> = a.iter().map(|v| v + rng.gen_range(-0.5..0.5)).collect();
    let c: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..10.0)).collect();
    let d: Vec<f64> = b.iter().map(|v| v.exp()).collect();

    let names = ["a", "b", "c", "d"];
    let columns: [&[f64]; 4] = [&a, &b, &c, &d];
    let options = CorrelationOptions::default().with_method(CorrelationMethod::Spearman);
    let result = correlation_matrix(&names, &columns, &options).unwrap();

    assert_eq!(result.pairs.len(), 6);
    for pair in &result.pairs {
        let direct = correlate(columns[pair.i], columns[pair.j], &options).unwrap();
        assert_eq!(pair.result, direct);
        assert_abs_diff_eq!(result.matrix[(pair.i, pair.j)], direct.r, epsilon = 1e-15);
    }
    // exp is monotone, so b and d share their ranks
    assert_abs_diff_eq!(result.get("b", "d").unwrap(), 1.0, epsilon = 1e-12);
}
