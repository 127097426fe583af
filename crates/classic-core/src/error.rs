//! Error types for classical statistical analysis
//!
//! Provides the unified error type shared by every classic-stats crate.
//! Numerical degeneracies (zero variance, empty denominators) are reported
//! as `NaN` fields in result structs; the variants below cover structural
//! failures that a caller has to handle.

use thiserror::Error;

/// Core error type for classical statistical operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Argument outside the domain of a special function
    #[error("Domain error in {function}: argument {value} is outside (0, 1)")]
    Domain { function: &'static str, value: f64 },

    /// Matrix could not be inverted
    #[error("Matrix is singular (pivot magnitude {pivot:e})")]
    SingularMatrix { pivot: f64 },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!("{context} contains NaN or infinite values"))
    }

    /// Create a domain error for a probability argument
    pub fn invalid_probability(function: &'static str, p: f64) -> Self {
        Self::Domain { function, value: p }
    }

    /// Create an error for an alpha level outside (0, 1)
    pub fn invalid_alpha(alpha: f64) -> Self {
        Self::InvalidParameter(format!("alpha {alpha} must be in (0, 1)"))
    }

    /// Whether this error signals a singular system
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::SingularMatrix { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("alpha must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: alpha must be positive");

        let err = Error::InsufficientData { expected: 3, actual: 2 };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 3 samples, got 2"
        );

        let err = Error::Domain { function: "norm_inv", value: 1.5 };
        assert_eq!(
            err.to_string(),
            "Domain error in norm_inv: argument 1.5 is outside (0, 1)"
        );

        let err = Error::SingularMatrix { pivot: 0.0 };
        assert!(err.to_string().starts_with("Matrix is singular"));
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::size_mismatch(10, 8, "paired sample");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in paired sample: expected 10, got 8"
        );

        let err = Error::non_finite("outcome");
        assert_eq!(
            err.to_string(),
            "Invalid input: outcome contains NaN or infinite values"
        );

        match Error::invalid_probability("t_critical_approx", -0.1) {
            Error::Domain { function, value } => {
                assert_eq!(function, "t_critical_approx");
                assert_eq!(value, -0.1);
            }
            other => panic!("Wrong error type: {other:?}"),
        }

        assert_eq!(
            Error::invalid_alpha(2.0).to_string(),
            "Invalid parameter: alpha 2 must be in (0, 1)"
        );
    }

    #[test]
    fn test_singular_predicate() {
        assert!(Error::SingularMatrix { pivot: 1e-12 }.is_singular());
        assert!(!Error::Computation("x".into()).is_singular());
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom error message").into();
        match err {
            Error::Other(_) => assert!(err.to_string().contains("custom error message")),
            _ => panic!("Wrong error type"),
        }
    }
}
