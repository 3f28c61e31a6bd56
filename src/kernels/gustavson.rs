//! Sparse matrix product using Gustavson's row-wise algorithm
//!
//! Row `i` of `C = A·B` is the sum over the entries `a_ik` of row `i` of A of
//! `a_ik` times row `k` of B. Partial products land in a [`ColumnTracker`]
//! indexed by output column, so the cost is proportional to the number of
//! intermediate products rather than to `n_rows · n_cols`.

use log::{debug, trace};
use num_traits::Num;

use crate::accumulator::{ColumnTracker, CsrBuilder};
use crate::error::{Error, Result};
use crate::matrix::{KernelConfig, OutputSizing, SparseMatrixCSR};

/// Computes `A·B` with the default configuration
///
/// Fails with [`Error::DimensionMismatch`] unless `a.n_cols == b.n_rows`.
pub fn multiply<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num,
{
    multiply_with(a, b, &KernelConfig::default())
}

/// Computes `A·B`, sizing the output as `config.output_sizing` says
pub fn multiply_with<T>(
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    config: &KernelConfig,
) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num,
{
    if a.n_cols != b.n_rows {
        return Err(Error::DimensionMismatch {
            op: "multiply",
            lhs: a.shape(),
            rhs: b.shape(),
        });
    }

    let mut tracker = ColumnTracker::new(b.n_cols)?;

    let capacity = match config.output_sizing {
        OutputSizing::Symbolic => symbolic_nnz(a, b, &mut tracker),
        OutputSizing::Growable => a.nnz().max(b.nnz()),
    };
    trace!("multiply: reserving {} output entries", capacity);

    let mut out = CsrBuilder::with_capacity(a.n_rows, b.n_cols, capacity)?;

    for i in 0..a.n_rows {
        let row_start = out.start_row(i);

        for (k, &a_ik) in a.row_iter(i) {
            for (j, &b_kj) in b.row_iter(k) {
                let product = a_ik * b_kj;
                match tracker.position(j, row_start) {
                    Some(pos) => out.add_at(pos, product),
                    None => {
                        let pos = out.push(j, product)?;
                        tracker.record(j, pos);
                    }
                }
            }
        }

        tracker.reset_row();
    }

    let (c, dropped) = out.finish()?;
    debug!(
        "multiply: {}x{} · {}x{} -> nnz {} ({} zero sums dropped)",
        a.n_rows,
        a.n_cols,
        b.n_rows,
        b.n_cols,
        c.nnz(),
        dropped
    );
    Ok(c)
}

/// Counts the distinct output columns of every row of `A·B`
///
/// This is the exact number of entries the numeric pass writes before
/// compaction. A running counter stands in for output positions so the same
/// staleness rule as the numeric pass applies.
fn symbolic_nnz<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>, tracker: &mut ColumnTracker) -> usize
where
    T: Copy + Num,
{
    let mut total = 0;

    for i in 0..a.n_rows {
        let row_start = total;

        for (k, _) in a.row_iter(i) {
            for (j, _) in b.row_iter(k) {
                if tracker.position(j, row_start).is_none() {
                    tracker.record(j, total);
                    total += 1;
                }
            }
        }

        tracker.reset_row();
    }

    total
}
