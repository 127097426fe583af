//! Core types and numerical building blocks for classical statistics
//!
//! This crate holds everything the engine crates share:
//!
//! - [`error`]: the workspace-wide [`Error`] type
//! - [`math`]: special functions (erf, log-gamma, incomplete beta) and the
//!   normal, Student t and F distributions built on them
//! - [`descriptive`]: means, variances, mid-ranks, skewness, summaries
//! - [`matrix`]: Gauss-Jordan inversion for normal equations
//! - [`config`], [`interval`], [`diagnostics`]: value types passed between
//!   engines and their callers
//!
//! All functions are pure. Nothing in the workspace keeps global state.
//!
//! # Example
//!
//! ```rust
//! use classic_core::math::{norm_cdf, norm_inv, t_cdf};
//!
//! let z = norm_inv(0.975).unwrap();
//! assert!((z - 1.96).abs() < 1e-3);
//! assert!((norm_cdf(z) - 0.975).abs() < 1e-6);
//! assert!(t_cdf(0.0, 10.0) == 0.5);
//! ```

pub mod config;
pub mod descriptive;
pub mod diagnostics;
pub mod error;
pub mod interval;
pub mod math;
pub mod matrix;

pub use config::{clamp_alpha, validate_alpha, Alternative, ConfidenceLevel, DEFAULT_ALPHA};
pub use descriptive::{RunningStats, SummaryStats};
pub use diagnostics::{overall_severity, Diagnostic, Severity};
pub use error::{Error, Result};
pub use interval::ConfidenceInterval;

/// Re-exported so downstream crates agree on the matrix type
pub use nalgebra::{DMatrix, DVector};
