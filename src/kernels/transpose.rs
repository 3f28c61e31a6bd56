//! Transpose by counting sort on the column index
//!
//! Column `j` of A becomes row `j` of the result. Entries inside a
//! transposed row appear in the order their source rows were scanned.

use log::debug;
use num_traits::Num;

use crate::error::Result;
use crate::matrix::SparseMatrixCSR;
use crate::utils::{exclusive_scan, try_filled, try_with_capacity};

/// Returns `Aᵀ`
///
/// `nnz` is preserved exactly; only allocation can fail.
pub fn transpose<T>(a: &SparseMatrixCSR<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num,
{
    // Count non-zeros per column of A
    let mut col_counts = try_filled(a.n_cols, 0usize)?;
    for &col in &a.col_idx {
        col_counts[col] += 1;
    }

    let row_ptr = exclusive_scan(&col_counts)?;

    let mut cursor = try_with_capacity(a.n_cols)?;
    cursor.extend_from_slice(&row_ptr[..a.n_cols]);

    let nnz = a.nnz();
    let mut col_idx = try_filled(nnz, 0)?;
    let mut values = try_filled(nnz, T::zero())?;

    for i in 0..a.n_rows {
        for k in a.row_ptr[i]..a.row_ptr[i + 1] {
            let col = a.col_idx[k];
            let pos = cursor[col];

            col_idx[pos] = i;
            values[pos] = a.values[k];

            cursor[col] += 1;
        }
    }

    debug!("transpose: {}x{} -> {}x{}, nnz {}", a.n_rows, a.n_cols, a.n_cols, a.n_rows, nnz);

    Ok(SparseMatrixCSR {
        n_rows: a.n_cols,
        n_cols: a.n_rows,
        row_ptr,
        col_idx,
        values,
    })
}
