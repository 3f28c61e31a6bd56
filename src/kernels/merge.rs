//! Row-wise union of two CSR matrices (addition and subtraction)
//!
//! For each row, the entries of A are copied to the output and their output
//! positions recorded per column. Entries of B then either accumulate into
//! an existing slot or are appended. Output is sized for the worst case
//! `nnz(A) + nnz(B)` and compacted afterwards to drop exact cancellations.

use log::debug;
use num_traits::Num;

use crate::accumulator::{ColumnTracker, CsrBuilder};
use crate::error::{Error, Result};
use crate::matrix::SparseMatrixCSR;

/// How entries of the right operand are combined into the left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// `A + B`
    Plus,
    /// `A - B`
    Minus,
}

impl Sign {
    /// Operation name used in errors and logs
    pub fn op_name(self) -> &'static str {
        match self {
            Sign::Plus => "add",
            Sign::Minus => "subtract",
        }
    }

    #[inline]
    fn apply<T: Copy + Num>(self, val: T) -> T {
        match self {
            Sign::Plus => val,
            Sign::Minus => T::zero() - val,
        }
    }
}

/// Combines two matrices of identical shape entry by entry
///
/// Fails with [`Error::DimensionMismatch`] before allocating anything if the
/// shapes differ. The result never stores zeros, so `combine(a, a, Sign::Minus)`
/// is empty.
pub fn combine<T>(
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    sign: Sign,
) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num,
{
    if a.shape() != b.shape() {
        return Err(Error::DimensionMismatch {
            op: sign.op_name(),
            lhs: a.shape(),
            rhs: b.shape(),
        });
    }

    let mut out = CsrBuilder::with_capacity(a.n_rows, a.n_cols, a.nnz() + b.nnz())?;
    let mut tracker = ColumnTracker::new(a.n_cols)?;

    for i in 0..a.n_rows {
        let row_start = out.start_row(i);

        for (col, &val) in a.row_iter(i) {
            let pos = out.push(col, val)?;
            tracker.record(col, pos);
        }

        for (col, &val) in b.row_iter(i) {
            match tracker.position(col, row_start) {
                Some(pos) => out.add_at(pos, sign.apply(val)),
                None => {
                    let pos = out.push(col, sign.apply(val))?;
                    tracker.record(col, pos);
                }
            }
        }

        tracker.reset_row();
    }

    let (c, dropped) = out.finish()?;
    debug!(
        "{}: {}x{}, nnz {} and {} -> {} ({} cancelled)",
        sign.op_name(),
        c.n_rows,
        c.n_cols,
        a.nnz(),
        b.nnz(),
        c.nnz(),
        dropped
    );
    Ok(c)
}

/// Computes `A + B`
pub fn add<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num,
{
    combine(a, b, Sign::Plus)
}

/// Computes `A - B`
pub fn subtract<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num,
{
    combine(a, b, Sign::Minus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_disjoint_and_overlapping() {
        // A = [1 0; 0 2], B = [0 3; 4 2]
        let a = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 2.0]);
        let b = SparseMatrixCSR::new(2, 2, vec![0, 1, 3], vec![1, 0, 1], vec![3.0, 4.0, 2.0]);

        let c = add(&a, &b).unwrap();

        // A's entries come first in each row, then B's new columns
        assert_eq!(c.row_ptr, vec![0, 2, 4]);
        assert_eq!(c.col_idx, vec![0, 1, 1, 0]);
        assert_eq!(c.values, vec![1.0, 3.0, 4.0, 4.0]);
    }

    #[test]
    fn test_subtract_negates_new_entries() {
        let a = SparseMatrixCSR::new(1, 3, vec![0, 1], vec![0], vec![5.0]);
        let b = SparseMatrixCSR::new(1, 3, vec![0, 2], vec![2, 0], vec![1.5, 2.0]);

        let c = subtract(&a, &b).unwrap();

        assert_eq!(c.col_idx, vec![0, 2]);
        assert_eq!(c.values, vec![3.0, -1.5]);
    }

    #[test]
    fn test_cancellation_is_compacted() {
        let a = SparseMatrixCSR::new(2, 2, vec![0, 2, 3], vec![0, 1, 0], vec![1.0, 2.0, 3.0]);
        let b = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![1, 0], vec![-2.0, 1.0]);

        let c = add(&a, &b).unwrap();

        assert_eq!(c.row_ptr, vec![0, 1, 2]);
        assert_eq!(c.col_idx, vec![0, 0]);
        assert_eq!(c.values, vec![1.0, 4.0]);
    }

    #[test]
    fn test_shape_mismatch() {
        let a = SparseMatrixCSR::<f64>::zeros(2, 3);
        let b = SparseMatrixCSR::<f64>::zeros(3, 2);

        let err = combine(&a, &b, Sign::Minus).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch { op: "subtract", lhs: (2, 3), rhs: (3, 2) }
        ));
    }

    #[test]
    fn test_integer_elements() {
        let a = SparseMatrixCSR::<i64>::identity(3);
        let c = subtract(&a, &a).unwrap();
        assert_eq!(c.nnz(), 0);
        assert_eq!(c.row_ptr, vec![0, 0, 0, 0]);
    }
}
