//! Pairwise correlations among several variables

use crate::analysis::correlate;
use crate::coefficients::MIN_PAIRS;
use crate::types::{CorrelationMatrix, CorrelationOptions, PairCorrelation};
use classic_core::{DMatrix, Error, Result};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Correlate every pair among `k >= 2` equally long variables
///
/// The matrix holds the coefficient selected by `options.method`; each pair
/// also carries its own test and interval. Pairs are listed row-major with
/// `i < j`.
///
/// # Errors
/// * [`Error::InvalidInput`] for mismatched name/column counts or ragged
///   columns
/// * [`Error::InsufficientData`] for fewer than two variables or three rows
#[instrument(skip(names, columns, options), fields(k = columns.len()))]
pub fn correlation_matrix(
    names: &[&str],
    columns: &[&[f64]],
    options: &CorrelationOptions,
) -> Result<CorrelationMatrix> {
    if names.len() != columns.len() {
        return Err(Error::size_mismatch(names.len(), columns.len(), "variable names"));
    }
    let k = columns.len();
    if k < 2 {
        return Err(Error::InsufficientData {
            expected: 2,
            actual: k,
        });
    }
    let n = columns[0].len();
    if let Some(ragged) = columns.iter().find(|c| c.len() != n) {
        return Err(Error::size_mismatch(n, ragged.len(), "matrix column"));
    }
    if n < MIN_PAIRS {
        return Err(Error::InsufficientData {
            expected: MIN_PAIRS,
            actual: n,
        });
    }

    let index_pairs: Vec<(usize, usize)> = (0..k)
        .flat_map(|i| ((i + 1)..k).map(move |j| (i, j)))
        .collect();
    debug!("computing {} variable pairs over {} rows", index_pairs.len(), n);

    let compute = |&(i, j): &(usize, usize)| -> Result<PairCorrelation> {
        Ok(PairCorrelation {
            i,
            j,
            x_name: names[i].to_string(),
            y_name: names[j].to_string(),
            result: correlate(columns[i], columns[j], options)?,
        })
    };

    #[cfg(feature = "parallel")]
    let pairs = index_pairs
        .par_iter()
        .map(compute)
        .collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let pairs = index_pairs
        .iter()
        .map(compute)
        .collect::<Result<Vec<_>>>()?;

    let mut matrix = DMatrix::<f64>::identity(k, k);
    for pair in &pairs {
        matrix[(pair.i, pair.j)] = pair.result.r;
        matrix[(pair.j, pair.i)] = pair.result.r;
    }

    Ok(CorrelationMatrix {
        names: names.iter().map(|s| s.to_string()).collect(),
        matrix,
        pairs,
    })
}
