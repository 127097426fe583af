//! Dense matrix inversion for normal equations

use crate::error::{Error, Result};
use nalgebra::DMatrix;

/// Pivots smaller than this in magnitude mark the matrix as singular
pub const PIVOT_TOLERANCE: f64 = 1e-10;

/// Invert a square matrix by Gauss-Jordan elimination with partial pivoting
///
/// Works on the augmented system `[A | I]`. For each column the row with the
/// largest absolute entry at or below the diagonal becomes the pivot row.
///
/// # Errors
/// * [`Error::InvalidInput`] if the matrix is not square
/// * [`Error::SingularMatrix`] if a pivot magnitude falls below
///   [`PIVOT_TOLERANCE`]
pub fn invert(matrix: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = matrix.nrows();
    if matrix.ncols() != n {
        return Err(Error::InvalidInput(format!(
            "cannot invert a {}x{} matrix",
            n,
            matrix.ncols()
        )));
    }

    let mut augmented = DMatrix::<f64>::zeros(n, 2 * n);
    for i in 0..n {
        for j in 0..n {
            augmented[(i, j)] = matrix[(i, j)];
        }
        augmented[(i, n + i)] = 1.0;
    }

    for col in 0..n {
        let mut pivot_row = col;
        for row in (col + 1)..n {
            if augmented[(row, col)].abs() > augmented[(pivot_row, col)].abs() {
                pivot_row = row;
            }
        }

        let pivot = augmented[(pivot_row, col)];
        if pivot.abs() < PIVOT_TOLERANCE {
            return Err(Error::SingularMatrix { pivot: pivot.abs() });
        }
        if pivot_row != col {
            augmented.swap_rows(pivot_row, col);
        }

        for j in 0..2 * n {
            augmented[(col, j)] /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = augmented[(row, col)];
            if factor == 0.0 {
                continue;
            }
            for j in 0..2 * n {
                augmented[(row, j)] -= factor * augmented[(col, j)];
            }
        }
    }

    Ok(augmented.columns(n, n).into_owned())
}
