//! Oversized kernel output and the compaction pass
//!
//! Kernels write rows into a [`CsrBuilder`] whose buffers may hold entries
//! that cancelled to zero. [`CsrBuilder::finish`] drops those entries,
//! rebuilds a tight `row_ptr` and copies the survivors into exact-size
//! vectors.

use std::collections::HashMap;

use log::trace;
use num_traits::Num;

use crate::error::{Error, Result};
use crate::matrix::SparseMatrixCSR;
use crate::utils::{try_grow, try_row_ptr, try_with_capacity};

/// Row-by-row output buffer for a kernel
pub struct CsrBuilder<T> {
    n_rows: usize,
    n_cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T> CsrBuilder<T>
where
    T: Copy + Num,
{
    /// Allocates a builder for an `n_rows x n_cols` result holding up to `capacity`
    /// entries before it has to grow
    pub fn with_capacity(n_rows: usize, n_cols: usize, capacity: usize) -> Result<Self> {
        Ok(Self {
            n_rows,
            n_cols,
            row_ptr: try_row_ptr(n_rows)?,
            col_idx: try_with_capacity(capacity)?,
            values: try_with_capacity(capacity)?,
        })
    }

    /// Marks the start of row `i` and returns its output offset
    #[inline]
    pub fn start_row(&mut self, i: usize) -> usize {
        let start = self.col_idx.len();
        self.row_ptr[i] = start;
        start
    }

    /// Appends an entry to the current row and returns its position
    #[inline]
    pub fn push(&mut self, col: usize, val: T) -> Result<usize> {
        try_grow(&mut self.col_idx, 1)?;
        try_grow(&mut self.values, 1)?;

        let pos = self.col_idx.len();
        self.col_idx.push(col);
        self.values.push(val);
        Ok(pos)
    }

    /// Adds `val` into the entry at `pos`
    #[inline]
    pub fn add_at(&mut self, pos: usize, val: T) {
        self.values[pos] = self.values[pos] + val;
    }

    /// Entries written so far
    pub fn len(&self) -> usize {
        self.col_idx.len()
    }

    /// Returns `true` if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.col_idx.is_empty()
    }

    /// Closes the last row, compacts away zeros and returns the tight matrix
    /// together with the number of entries that were dropped
    pub fn finish(mut self) -> Result<(SparseMatrixCSR<T>, usize)> {
        self.row_ptr[self.n_rows] = self.col_idx.len();

        let dropped = compact(&mut self.row_ptr, &mut self.col_idx, &mut self.values);
        let col_idx = tighten(self.col_idx)?;
        let values = tighten(self.values)?;

        Ok((
            SparseMatrixCSR {
                n_rows: self.n_rows,
                n_cols: self.n_cols,
                row_ptr: self.row_ptr,
                col_idx,
                values,
            },
            dropped,
        ))
    }
}

/// Removes zero-valued entries in place and rewrites `row_ptr` to match
///
/// Returns how many entries were removed. Row order and the relative order of
/// surviving entries within a row are preserved.
pub fn compact<T>(row_ptr: &mut [usize], col_idx: &mut Vec<usize>, values: &mut Vec<T>) -> usize
where
    T: Copy + Num,
{
    let before = values.len();
    let n_rows = row_ptr.len() - 1;
    let mut write = 0;

    for i in 0..n_rows {
        let start = row_ptr[i];
        let end = row_ptr[i + 1];
        row_ptr[i] = write;

        for read in start..end {
            if !values[read].is_zero() {
                col_idx[write] = col_idx[read];
                values[write] = values[read];
                write += 1;
            }
        }
    }
    row_ptr[n_rows] = write;

    col_idx.truncate(write);
    values.truncate(write);

    let dropped = before - write;
    trace!("compaction kept {} of {} entries", write, before);
    dropped
}

/// Folds repeated columns within each row into a single entry, then compacts
///
/// Used where input may legitimately repeat a coordinate (Matrix Market files,
/// caller-supplied triplets). Scratch space is bounded by the longest row, not
/// by the column count, so very wide matrices cost nothing extra. The first
/// occurrence of a column keeps its place in the row. Returns how many entries
/// were removed in total.
pub fn sum_duplicates<T>(
    row_ptr: &mut [usize],
    col_idx: &mut Vec<usize>,
    values: &mut Vec<T>,
) -> Result<usize>
where
    T: Copy + Num,
{
    let before = values.len();
    let n_rows = row_ptr.len() - 1;
    let mut seen: HashMap<usize, usize> = HashMap::new();
    let mut write = 0;

    for i in 0..n_rows {
        let start = row_ptr[i];
        let end = row_ptr[i + 1];
        row_ptr[i] = write;

        seen.clear();
        seen.try_reserve(end - start).map_err(|_| Error::OutOfMemory {
            bytes: (end - start).saturating_mul(2 * std::mem::size_of::<usize>()),
        })?;

        for read in start..end {
            let col = col_idx[read];
            let val = values[read];
            match seen.get(&col) {
                Some(&pos) => values[pos] = values[pos] + val,
                None => {
                    col_idx[write] = col;
                    values[write] = val;
                    seen.insert(col, write);
                    write += 1;
                }
            }
        }
    }
    row_ptr[n_rows] = write;

    col_idx.truncate(write);
    values.truncate(write);

    let zeros = compact(row_ptr, col_idx, values);
    Ok(before - write + zeros)
}

/// Moves the contents of `v` into an allocation of exactly its length
pub fn tighten<T: Copy>(v: Vec<T>) -> Result<Vec<T>> {
    if v.capacity() == v.len() {
        return Ok(v);
    }
    let mut tight = try_with_capacity(v.len())?;
    tight.extend_from_slice(&v);
    Ok(tight)
}
