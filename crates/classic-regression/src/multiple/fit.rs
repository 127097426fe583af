//! Ordinary least squares on a design matrix

use super::design::{build_design_matrix, CenteringConstants, DesignLayout, DesignMatrix};
use super::predictor::ModelSpec;
use classic_core::descriptive::{mean, standard_deviation};
use classic_core::math::{f_cdf, t_cdf, t_inv};
use classic_core::matrix::invert;
use classic_core::{validate_alpha, ConfidenceInterval, Error, Result};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, instrument, warn};

/// VIF above which a coefficient is flagged as collinear
pub const HIGH_VIF: f64 = 10.0;

/// One estimated coefficient
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub standard_error: f64,
    pub t_statistic: f64,
    /// Two-sided, Student t on `df_error`
    pub p_value: f64,
    pub interval: ConfidenceInterval,
    /// `NaN` for the intercept
    pub vif: f64,
    /// `t² / (t² + df_error)`
    pub partial_eta_squared: f64,
}

impl Coefficient {
    pub fn high_vif(&self) -> bool {
        self.vif > HIGH_VIF
    }
}

/// Result of [`fit`] or [`fit_design`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultipleRegressionResult {
    pub coefficients: Vec<Coefficient>,
    pub n: usize,
    /// Number of non-intercept columns
    pub k: usize,
    /// `n - k - 1`
    pub df_error: usize,
    pub sse: f64,
    pub ssr: f64,
    pub sst: f64,
    pub r_squared: f64,
    pub adjusted_r_squared: f64,
    /// `sse / df_error`
    pub mse: f64,
    /// `sqrt(mse)`
    pub rmse: f64,
    pub mae: f64,
    pub f_statistic: f64,
    pub model_p_value: f64,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    pub residual_mean: f64,
    pub residual_sd: f64,
    /// `(XᵀX)⁻¹ · mse`
    pub covariance: DMatrix<f64>,
    pub alpha: f64,
    /// `t_inv(1 - alpha/2, df_error)`
    pub t_critical: f64,
    pub centering: CenteringConstants,
    pub layout: DesignLayout,
}

impl MultipleRegressionResult {
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.coefficients.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn estimates(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.estimate).collect()
    }

    /// Coefficients whose VIF exceeds [`HIGH_VIF`]
    pub fn high_vif(&self) -> Vec<&Coefficient> {
        self.coefficients.iter().filter(|c| c.high_vif()).collect()
    }

    /// Whether the overall F test rejects at the model alpha
    pub fn is_significant(&self) -> bool {
        self.model_p_value < self.alpha
    }
}

/// Share of outcome variance attributable to one predictor
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictorEffect {
    pub name: String,
    /// Design columns removed with the predictor
    pub columns: usize,
    /// `SSE_reduced - SSE_full`
    pub ss_effect: f64,
    /// `ss_effect / (ss_effect + SSE_full)`
    pub partial_eta_squared: f64,
}

/// Build the design matrix of `spec` and fit it against `y`
#[instrument(skip(spec, y), fields(n = y.len()))]
pub fn fit(spec: &ModelSpec, y: &[f64]) -> Result<MultipleRegressionResult> {
    let design = build_design_matrix(spec)?;
    fit_design(&design, y, spec.alpha)
}

/// Fit `y` against a prepared design matrix by ordinary least squares
///
/// # Errors
/// * [`Error::InvalidInput`] when `y` does not match the design rows or is
///   non-finite
/// * [`Error::InvalidParameter`] for an alpha outside (0, 1)
/// * [`Error::InsufficientData`] unless there are more rows than columns
/// * [`Error::SingularMatrix`] when `XᵀX` cannot be inverted
#[instrument(skip(design, y), fields(rows = design.nrows(), cols = design.ncols()))]
pub fn fit_design(
    design: &DesignMatrix,
    y: &[f64],
    alpha: f64,
) -> Result<MultipleRegressionResult> {
    let x = &design.matrix;
    let (n, p) = (x.nrows(), x.ncols());
    if y.len() != n {
        return Err(Error::size_mismatch(n, y.len(), "outcome and design rows"));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(Error::non_finite("outcome"));
    }
    let alpha = validate_alpha(alpha)?;
    if n <= p {
        return Err(Error::InsufficientData {
            expected: p + 1,
            actual: n,
        });
    }

    let xt = x.transpose();
    let xtx_inv = invert(&(&xt * x))?;
    let y_vec = DVector::from_column_slice(y);
    let beta = &xtx_inv * (&xt * &y_vec);

    let fitted_vec = x * &beta;
    let fitted: Vec<f64> = fitted_vec.iter().copied().collect();
    let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(a, f)| a - f).collect();

    let k = p - 1;
    let df_error = n - p;
    let dfe = df_error as f64;
    let y_mean = mean(y);
    let sse: f64 = residuals.iter().map(|e| e * e).sum();
    let sst: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let ssr = sst - sse;
    let r_squared = if sst > 0.0 { ssr / sst } else { f64::NAN };
    let adjusted_r_squared = 1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / dfe;
    let mse = sse / dfe;
    let covariance = &xtx_inv * mse;

    let (f_statistic, model_p_value) = if k > 0 {
        let f = (ssr / k as f64) / mse;
        let p = if f.is_nan() {
            f64::NAN
        } else {
            1.0 - f_cdf(f, k as f64, dfe)
        };
        (f, p)
    } else {
        (f64::NAN, f64::NAN)
    };

    let t_critical = t_inv(1.0 - alpha / 2.0, dfe)?;
    let vifs = variance_inflation(x);
    let coefficients: Vec<Coefficient> = (0..p)
        .map(|j| {
            let estimate = beta[j];
            let standard_error = covariance[(j, j)].sqrt();
            let t_statistic = estimate / standard_error;
            let t2 = t_statistic * t_statistic;
            Coefficient {
                name: design.column_names[j].clone(),
                estimate,
                standard_error,
                t_statistic,
                p_value: if t_statistic.is_nan() {
                    f64::NAN
                } else {
                    2.0 * (1.0 - t_cdf(t_statistic.abs(), dfe))
                },
                interval: ConfidenceInterval::symmetric(
                    estimate,
                    t_critical * standard_error,
                    1.0 - alpha,
                ),
                vif: vifs[j],
                partial_eta_squared: t2 / (t2 + dfe),
            }
        })
        .collect();

    debug!(
        "fitted {} coefficients on {} rows: R²={:.4}, F={:.3}",
        p, n, r_squared, f_statistic
    );

    Ok(MultipleRegressionResult {
        coefficients,
        n,
        k,
        df_error,
        sse,
        ssr,
        sst,
        r_squared,
        adjusted_r_squared,
        mse,
        rmse: mse.sqrt(),
        mae: residuals.iter().map(|e| e.abs()).sum::<f64>() / n as f64,
        f_statistic,
        model_p_value,
        fitted,
        residual_mean: mean(&residuals),
        residual_sd: standard_deviation(&residuals),
        residuals,
        covariance,
        alpha,
        t_critical,
        centering: design.centering.clone(),
        layout: design.layout.clone(),
    })
}

/// Variance inflation factor of every column of `x`
///
/// Column 0 is taken to be the intercept and reported as `NaN`. Each other
/// column is regressed on all remaining columns; the VIF is
/// `1 / (1 - R²)` of that regression, or `NaN` when the column is constant or
/// the sub-regression is singular.
pub fn variance_inflation(x: &DMatrix<f64>) -> Vec<f64> {
    let p = x.ncols();
    let mut vifs = vec![f64::NAN; p];
    for (j, vif) in vifs.iter_mut().enumerate().skip(1) {
        let target: Vec<f64> = x.column(j).iter().copied().collect();
        let others = x.clone().remove_column(j);
        match auxiliary_r_squared(&others, &target) {
            Ok(r2) => *vif = 1.0 / (1.0 - r2),
            Err(e) => warn!("VIF for column {} unavailable: {}", j, e),
        }
    }
    vifs
}

fn auxiliary_r_squared(x: &DMatrix<f64>, y: &[f64]) -> Result<f64> {
    let y_mean = mean(y);
    let sst: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    if sst <= 0.0 {
        return Err(Error::Computation("column has zero variance".to_string()));
    }
    let xt = x.transpose();
    let xtx_inv = invert(&(&xt * x))?;
    let y_vec = DVector::from_column_slice(y);
    let beta = &xtx_inv * (&xt * &y_vec);
    let sse = (x * beta - y_vec).norm_squared();
    Ok(1.0 - sse / sst)
}

/// Partial eta squared of every predictor
///
/// For each predictor the model is refitted without it and without every
/// interaction it takes part in. A model reduced to no predictors falls back
/// to the intercept-only SSE, which is the total sum of squares.
#[instrument(skip(spec, y))]
pub fn predictor_effect_sizes(spec: &ModelSpec, y: &[f64]) -> Result<Vec<PredictorEffect>> {
    let full_design = build_design_matrix(spec)?;
    let full = fit_design(&full_design, y, spec.alpha)?;

    spec.predictors
        .iter()
        .map(|predictor| {
            let name = predictor.name();
            let reduced_spec = spec.without(name);
            let (sse_reduced, reduced_columns) = if reduced_spec.predictors.is_empty() {
                (full.sst, 1)
            } else {
                let design = build_design_matrix(&reduced_spec)?;
                let reduced = fit_design(&design, y, spec.alpha)?;
                (reduced.sse, design.ncols())
            };
            let ss_effect = sse_reduced - full.sse;
            Ok(PredictorEffect {
                name: name.to_string(),
                columns: full_design.ncols() - reduced_columns,
                ss_effect,
                partial_eta_squared: ss_effect / (ss_effect + full.sse),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multiple::predictor::{Interaction, Predictor};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_exact_plane() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let x2 = vec![2.0, 1.0, 4.0, 3.0, 6.0, 5.0];
        let y: Vec<f64> = x1.iter().zip(&x2).map(|(a, b)| 3.0 + 2.0 * a - 0.5 * b).collect();
        let spec = ModelSpec::new(vec![
            Predictor::numeric("x1", x1),
            Predictor::numeric("x2", x2),
        ]);
        let result = fit(&spec, &y).unwrap();

        assert_abs_diff_eq!(result.coefficient("Intercept").unwrap().estimate, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.coefficient("x1").unwrap().estimate, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.coefficient("x2").unwrap().estimate, -0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(result.r_squared, 1.0, epsilon = 1e-9);
        assert_eq!(result.k, 2);
        assert_eq!(result.df_error, 3);
        assert!(result.sse < 1e-18);
    }

    #[test]
    fn test_single_predictor_matches_closed_form() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 5.0, 4.0, 5.0];
        let result = fit(&ModelSpec::new(vec![Predictor::numeric("x", x)]), &y).unwrap();

        let slope = result.coefficient("x").unwrap();
        assert_abs_diff_eq!(slope.estimate, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(result.sse, 2.4, epsilon = 1e-10);
        assert_abs_diff_eq!(result.mse, 0.8, epsilon = 1e-10);
        assert_abs_diff_eq!(result.rmse, 0.8_f64.sqrt(), epsilon = 1e-10);
        assert_abs_diff_eq!(slope.standard_error, 0.08_f64.sqrt(), epsilon = 1e-10);
        assert_abs_diff_eq!(result.r_squared, 0.6, epsilon = 1e-10);
        assert_abs_diff_eq!(result.adjusted_r_squared, 1.0 - 0.4 * 4.0 / 3.0, epsilon = 1e-10);
        // with one predictor F = t²
        assert_abs_diff_eq!(result.f_statistic, slope.t_statistic.powi(2), epsilon = 1e-9);
        assert_abs_diff_eq!(result.model_p_value, slope.p_value, epsilon = 1e-6);
        assert_abs_diff_eq!(
            slope.partial_eta_squared,
            result.r_squared,
            epsilon = 1e-10
        );
        assert!(result.coefficients[0].vif.is_nan());
        assert_abs_diff_eq!(slope.vif, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.residual_mean, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_model_f_test_matches_fisher_snedecor() {
        use statrs::distribution::{ContinuousCDF, FisherSnedecor};

        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 5.0, 4.0, 5.0];
        let result = fit(&ModelSpec::new(vec![Predictor::numeric("x", x)]), &y).unwrap();
        // SSR = 3.6 on 1 df, MSE = 0.8 on 3 df
        assert_abs_diff_eq!(result.f_statistic, 4.5, epsilon = 1e-10);
        let reference = FisherSnedecor::new(1.0, 3.0).unwrap();
        assert_abs_diff_eq!(
            result.model_p_value,
            1.0 - reference.cdf(4.5),
            epsilon = 1e-6
        );

        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let x2 = vec![2.0, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 9.0];
        let y = vec![3.1, 3.9, 6.2, 5.8, 8.4, 7.7, 10.9, 11.2];
        let spec = ModelSpec::new(vec![
            Predictor::numeric("x1", x1),
            Predictor::numeric("x2", x2),
        ]);
        let result = fit(&spec, &y).unwrap();
        let f = (result.ssr / 2.0) / (result.sse / 5.0);
        assert_abs_diff_eq!(result.f_statistic, f, epsilon = 1e-9);
        let reference = FisherSnedecor::new(2.0, 5.0).unwrap();
        assert_abs_diff_eq!(
            result.model_p_value,
            1.0 - reference.cdf(f),
            epsilon = 1e-6
        );
        assert!(result.model_p_value < 0.01);
    }

    #[test]
    fn test_exact_fit_has_vanishing_model_p_value() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
        let result = fit(&ModelSpec::new(vec![Predictor::numeric("x", x)]), &y).unwrap();
        assert!(result.f_statistic > 1e12);
        assert!(result.model_p_value < 1e-12);
    }

    #[test]
    fn test_collinear_columns_are_singular() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let doubled: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
        let spec = ModelSpec::new(vec![
            Predictor::numeric("x", x),
            Predictor::numeric("x2", doubled),
        ]);
        let err = fit(&spec, &[1.0, 2.0, 3.0, 5.0, 4.0]).unwrap_err();
        assert!(err.is_singular());
    }

    #[test]
    fn test_near_collinear_flags_high_vif() {
        let x: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let z: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| v + if i % 2 == 0 { 0.05 } else { -0.05 })
            .collect();
        let y: Vec<f64> = x.iter().map(|v| 1.0 + v + (v * 0.7).sin()).collect();
        let result = fit(
            &ModelSpec::new(vec![Predictor::numeric("x", x), Predictor::numeric("z", z)]),
            &y,
        )
        .unwrap();
        assert_eq!(result.high_vif().len(), 2);
    }

    #[test]
    fn test_too_few_rows() {
        let spec = ModelSpec::new(vec![
            Predictor::numeric("a", vec![1.0, 2.0, 3.0]),
            Predictor::numeric("b", vec![1.0, 0.0, 2.0]),
        ]);
        assert!(matches!(
            fit(&spec, &[1.0, 2.0, 3.0]),
            Err(Error::InsufficientData { expected: 4, actual: 3 })
        ));
        assert!(fit(&spec, &[1.0, 2.0]).is_err());
        assert!(fit(&spec.with_alpha(2.0), &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_effect_sizes() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let g = ["a", "b", "a", "b", "a", "b", "a", "b"];
        let y = vec![1.2, 5.1, 2.9, 7.2, 5.0, 8.8, 7.1, 11.0];
        let spec = ModelSpec::new(vec![
            Predictor::numeric("x", x),
            Predictor::categorical("g", &g).unwrap().with_reference("a").unwrap(),
        ])
        .with_interaction(Interaction::mixed("x", "g"));
        let effects = predictor_effect_sizes(&spec, &y).unwrap();
        assert_eq!(effects.len(), 2);
        // dropping x also drops the x × g column
        assert_eq!(effects[0].columns, 2);
        assert_eq!(effects[1].columns, 2);
        for effect in &effects {
            assert!(effect.ss_effect >= -1e-9);
            assert!((0.0..=1.0).contains(&effect.partial_eta_squared));
        }
        assert!(effects[0].partial_eta_squared > 0.9);
    }

    #[test]
    fn test_effect_size_of_only_predictor() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 5.0, 4.0, 5.0];
        let spec = ModelSpec::new(vec![Predictor::numeric("x", x)]);
        let effects = predictor_effect_sizes(&spec, &y).unwrap();
        // SST = 6, SSE = 2.4
        assert_abs_diff_eq!(effects[0].ss_effect, 3.6, epsilon = 1e-10);
        assert_abs_diff_eq!(effects[0].partial_eta_squared, 0.6, epsilon = 1e-10);
    }
}
