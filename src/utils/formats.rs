//! Utilities for converting between our CSR format and the sprs crate

use num_traits::Num;
use sprs::CsMat;

use crate::accumulator::sum_duplicates;
use crate::error::Result;
use crate::matrix::SparseMatrixCSR;

/// Converts our CSR matrix format to sprs CsMat format
///
/// sprs requires sorted column indices, so rows are sorted on a copy.
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCSR<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    let mut sorted = matrix.clone();
    sorted.sort_indices();

    let (row_ptr, col_idx, values) = sorted.into_raw_parts();
    CsMat::new((matrix.n_rows, matrix.n_cols), row_ptr, col_idx, values)
}

/// Converts sprs CsMat to our SparseMatrixCSR format
///
/// Explicitly stored zeros are dropped so the result satisfies
/// [`SparseMatrixCSR::validate`].
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let (n_rows, n_cols) = matrix.shape();
    let (mut row_ptr, mut col_idx, mut values) = matrix.into_raw_storage();

    sum_duplicates(&mut row_ptr, &mut col_idx, &mut values)?;

    SparseMatrixCSR::try_new(n_rows, n_cols, row_ptr, col_idx, values)
}
