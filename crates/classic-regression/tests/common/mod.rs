//! Shared data generators for regression integration tests

#![allow(dead_code)]

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

pub const SEED: u64 = 0x5eed_2024;

pub fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(SEED)
}

/// `n` draws from `N(mean, sd)`
pub fn normal_sample(rng: &mut ChaCha8Rng, n: usize, mean: f64, sd: f64) -> Vec<f64> {
    let dist = Normal::new(mean, sd).unwrap();
    (0..n).map(|_| dist.sample(rng)).collect()
}

/// `n` labels drawn uniformly from `levels`
pub fn labels(rng: &mut ChaCha8Rng, n: usize, levels: &[&'static str]) -> Vec<&'static str> {
    (0..n)
        .map(|_| levels[rng.gen_range(0..levels.len())])
        .collect()
}

/// Balanced two-factor +/-1 design: every sign combination equally often
pub fn orthogonal_columns(replicates: usize) -> (Vec<f64>, Vec<f64>) {
    let mut a = Vec::new();
    let mut b = Vec::new();
    for _ in 0..replicates {
        for (x, z) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)] {
            a.push(x);
            b.push(z);
        }
    }
    (a, b)
}
