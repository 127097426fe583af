//! Derivative-free minimization with the Nelder-Mead simplex

use classic_core::{Error, Result};
use tracing::{debug, instrument, trace};

/// Reflection coefficient
pub const REFLECTION: f64 = 1.0;
/// Expansion coefficient
pub const EXPANSION: f64 = 2.0;
/// Contraction coefficient
pub const CONTRACTION: f64 = 0.5;
/// Shrink coefficient
pub const SHRINK: f64 = 0.5;

/// Relative size of the initial simplex steps
const RELATIVE_STEP: f64 = 0.1;
/// Absolute step for parameters at or near zero
const ABSOLUTE_STEP: f64 = 0.1;
const NEAR_ZERO: f64 = 1e-6;

/// Stopping rules for [`nelder_mead`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NelderMeadOptions {
    pub max_iterations: usize,
    /// Converged once `f(worst) - f(best)` drops below this
    pub tolerance: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-8,
        }
    }
}

impl NelderMeadOptions {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Best point found by [`nelder_mead`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Optimum {
    pub params: Vec<f64>,
    pub value: f64,
    /// Iterations performed before stopping
    pub iterations: usize,
    /// `false` when the iteration cap was hit first
    pub converged: bool,
}

#[derive(Debug, Clone)]
struct Vertex {
    params: Vec<f64>,
    value: f64,
}

impl Vertex {
    fn new(params: Vec<f64>, objective: &impl Fn(&[f64]) -> f64) -> Self {
        let value = objective(&params);
        Self { params, value }
    }
}

/// Minimize `objective` starting from `initial`
///
/// The starting simplex holds `initial` plus one vertex per parameter, moved
/// by 10% of that parameter (0.1 when it is within 1e-6 of zero). Each
/// iteration reflects the worst vertex through the centroid of the others
/// and then expands, contracts or shrinks as needed.
///
/// Hitting the iteration cap is not an error: the best vertex is returned
/// with `converged` set to `false`.
///
/// # Errors
/// * [`Error::InvalidInput`] for an empty or non-finite starting point
/// * [`Error::InvalidParameter`] for a non-positive tolerance or a zero
///   iteration cap
#[instrument(skip(objective, initial, options), fields(dim = initial.len()))]
pub fn nelder_mead<F>(objective: F, initial: &[f64], options: &NelderMeadOptions) -> Result<Optimum>
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return Err(Error::InvalidInput("starting point is empty".to_string()));
    }
    if initial.iter().any(|v| !v.is_finite()) {
        return Err(Error::non_finite("starting point"));
    }
    if !(options.tolerance > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "tolerance must be positive, got {}",
            options.tolerance
        )));
    }
    if options.max_iterations == 0 {
        return Err(Error::InvalidParameter(
            "max_iterations must be at least 1".to_string(),
        ));
    }

    let mut simplex = Vec::with_capacity(n + 1);
    simplex.push(Vertex::new(initial.to_vec(), &objective));
    for i in 0..n {
        let mut params = initial.to_vec();
        params[i] += if initial[i].abs() > NEAR_ZERO {
            initial[i] * RELATIVE_STEP
        } else {
            ABSOLUTE_STEP
        };
        simplex.push(Vertex::new(params, &objective));
    }

    for iteration in 0..options.max_iterations {
        simplex.sort_by(|a, b| a.value.total_cmp(&b.value));
        let best = simplex[0].value;
        let worst = simplex[n].value;
        let second_worst = simplex[n - 1].value;

        trace!(iteration, best, spread = worst - best, "simplex step");
        if worst - best < options.tolerance {
            debug!("converged after {} iterations at {:.6e}", iteration, best);
            return Ok(Optimum {
                params: simplex[0].params.clone(),
                value: best,
                iterations: iteration,
                converged: true,
            });
        }

        let mut centroid = vec![0.0; n];
        for vertex in &simplex[..n] {
            for (c, p) in centroid.iter_mut().zip(&vertex.params) {
                *c += p;
            }
        }
        centroid.iter_mut().for_each(|c| *c /= n as f64);

        let toward = |from: &[f64], scale: f64, target: &[f64]| -> Vec<f64> {
            from.iter()
                .zip(target)
                .map(|(c, t)| c + scale * (t - c))
                .collect()
        };

        let reflected = Vertex::new(
            toward(&centroid, -REFLECTION, &simplex[n].params),
            &objective,
        );
        if reflected.value >= best && reflected.value < second_worst {
            simplex[n] = reflected;
            continue;
        }

        if reflected.value < best {
            let expanded = Vertex::new(
                toward(&centroid, EXPANSION, &reflected.params),
                &objective,
            );
            simplex[n] = if expanded.value < reflected.value {
                expanded
            } else {
                reflected
            };
            continue;
        }

        let contracted = Vertex::new(
            toward(&centroid, CONTRACTION, &simplex[n].params),
            &objective,
        );
        if contracted.value < worst {
            simplex[n] = contracted;
            continue;
        }

        let anchor = simplex[0].params.clone();
        for vertex in simplex.iter_mut().skip(1) {
            let params = toward(&anchor, SHRINK, &vertex.params);
            *vertex = Vertex::new(params, &objective);
        }
    }

    simplex.sort_by(|a, b| a.value.total_cmp(&b.value));
    debug!(
        "iteration cap {} reached at {:.6e}",
        options.max_iterations, simplex[0].value
    );
    let best = simplex.swap_remove(0);
    Ok(Optimum {
        params: best.params,
        value: best.value,
        iterations: options.max_iterations,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn bowl(p: &[f64]) -> f64 {
        (p[0] - 3.0).powi(2) + 2.0 * (p[1] + 1.0).powi(2)
    }

    #[test]
    fn test_quadratic_bowl() {
        let optimum = nelder_mead(bowl, &[0.0, 0.0], &NelderMeadOptions::default()).unwrap();
        assert!(optimum.converged);
        assert_abs_diff_eq!(optimum.params[0], 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(optimum.params[1], -1.0, epsilon = 1e-3);
        assert!(optimum.value < 1e-7);
        assert!(optimum.iterations > 0);
    }

    #[test]
    fn test_rosenbrock() {
        let rosenbrock = |p: &[f64]| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2);
        let optimum = nelder_mead(
            rosenbrock,
            &[-1.2, 1.0],
            &NelderMeadOptions::new(10_000, 1e-14),
        )
        .unwrap();
        assert_abs_diff_eq!(optimum.params[0], 1.0, epsilon = 0.05);
        assert_abs_diff_eq!(optimum.params[1], 1.0, epsilon = 0.1);
    }

    #[test]
    fn test_one_dimensional_absolute_value() {
        let optimum = nelder_mead(
            |p: &[f64]| (p[0] - 2.0).abs(),
            &[10.0],
            &NelderMeadOptions::default(),
        )
        .unwrap();
        assert!(optimum.converged);
        assert_abs_diff_eq!(optimum.params[0], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_iteration_cap_is_reported() {
        let optimum = nelder_mead(bowl, &[0.0, 0.0], &NelderMeadOptions::new(3, 1e-12)).unwrap();
        assert!(!optimum.converged);
        assert_eq!(optimum.iterations, 3);
        // never worse than the seed
        assert!(optimum.value <= bowl(&[0.0, 0.0]));
    }

    #[test]
    fn test_invalid_arguments() {
        let options = NelderMeadOptions::default();
        assert!(matches!(
            nelder_mead(bowl, &[], &options),
            Err(Error::InvalidInput(_))
        ));
        assert!(nelder_mead(bowl, &[f64::NAN, 0.0], &options).is_err());
        assert!(matches!(
            nelder_mead(bowl, &[0.0, 0.0], &options.with_tolerance(0.0)),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            nelder_mead(bowl, &[0.0, 0.0], &options.with_max_iterations(0)),
            Err(Error::InvalidParameter(_))
        ));
    }
}
