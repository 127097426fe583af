//! One-way analysis of variance from group summaries
//!
//! The engine works on `(name, mean, sd, n)` summaries; [`groups_from_raw`]
//! derives them from labelled observations. [`one_way_anova`] returns the
//! full ANOVA table with effect sizes (eta² and omega²), per-group mean
//! intervals and Tukey HSD contrasts.
//!
//! # Example
//!
//! ```rust
//! use classic_anova::{one_way_anova, AnovaOptions, GroupSummary};
//!
//! let groups = vec![
//!     GroupSummary::new("A", 10.0, 2.0, 20),
//!     GroupSummary::new("B", 12.0, 2.5, 20),
//!     GroupSummary::new("C", 15.0, 3.0, 20),
//! ];
//! let result = one_way_anova(&groups, &AnovaOptions::default()).unwrap();
//!
//! assert!(result.significant);
//! assert!((result.eta_squared - 0.409).abs() < 1e-3);
//! ```
//!
//! # Tukey critical values
//!
//! By default the HSD critical value is the Bonferroni-adjusted t quantile
//! times `sqrt(2)`. [`TukeyCriticalMethod::StudentizedRange`] integrates the
//! studentized range distribution instead, which gives narrower intervals.

pub mod diagnostics;
pub mod groups;
pub mod oneway;
pub mod tukey;
pub mod types;

pub use classic_core::{Error, Result};
pub use diagnostics::{diagnose, AnovaCheck, AnovaDiagnostics};
pub use groups::{groups_from_raw, validate_groups, MIN_GROUP_SIZE};
pub use oneway::{group_intervals, one_way_anova};
pub use tukey::{pairwise_comparisons, studentized_range_cdf, tukey_critical};
pub use types::{
    AnovaOptions, AnovaResult, GroupInterval, GroupSummary, TukeyComparison, TukeyCriticalMethod,
};
