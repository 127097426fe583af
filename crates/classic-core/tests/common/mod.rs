//! Shared utilities for integration tests

#![allow(dead_code)]

pub use approx::assert_abs_diff_eq;

/// Probabilities spanning all three branches of the normal quantile
pub fn probability_grid() -> Vec<f64> {
    vec![
        1e-6, 1e-4, 0.001, 0.01, 0.02, 0.02425, 0.03, 0.1, 0.25, 0.4, 0.5, 0.6, 0.75, 0.9, 0.97,
        0.97575, 0.98, 0.99, 0.999, 0.9999,
    ]
}

/// Degrees of freedom from very small to effectively normal
pub fn degrees_of_freedom() -> Vec<f64> {
    vec![1.0, 2.0, 3.0, 5.0, 10.0, 30.0, 120.0]
}
