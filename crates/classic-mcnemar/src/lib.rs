//! McNemar's test for paired binary outcomes
//!
//! Works on the four cells of a paired 2x2 table. Only the discordant
//! pairs (`b`: positive on A only, `c`: positive on B only) carry
//! information about a change in the marginal proportions; the engine
//! reports the uncorrected and continuity-corrected chi-square statistics,
//! the exact binomial p-value and an odds ratio `c / b` with a log-scale
//! confidence interval.
//!
//! # Example
//!
//! ```rust
//! use classic_mcnemar::{mcnemar_test, ContingencyCounts, McNemarOptions};
//!
//! let counts = ContingencyCounts::new(120, 35, 42, 298);
//! let result = mcnemar_test(&counts, &McNemarOptions::default()).unwrap();
//!
//! assert_eq!(result.discordant, 77);
//! assert!((result.chi_square_corrected - 0.4675).abs() < 1e-4);
//! assert!(!result.significant);
//! ```

pub mod diagnostics;
pub mod mcnemar;
pub mod types;

pub use classic_core::{Error, Result};
pub use diagnostics::{diagnose, McNemarCheck, McNemarDiagnostics};
pub use mcnemar::{chi_square_p_value, exact_binomial_p_value, mcnemar_test, HALDANE_CORRECTION};
pub use types::{ContingencyCounts, McNemarMethod, McNemarOptions, McNemarResult};
