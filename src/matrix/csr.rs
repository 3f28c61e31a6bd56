//! Compressed Sparse Row (CSR) matrix format implementation

use std::collections::HashSet;
use std::fmt;

use ndarray::Array2;
use num_traits::Num;

use crate::accumulator::{sum_duplicates, tighten};
use crate::error::{Error, Result};
use crate::utils::{prefix_sum_in_place, try_filled, try_row_ptr, try_with_capacity};

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// Columns within a row are not kept in any particular order. Matrices
/// returned by the reader and the kernels never store zeros and never repeat
/// a column within a row.
///
/// A matrix owns its three arrays; dropping it releases them exactly once.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSR<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Arguments
    ///
    /// * `n_rows` - Number of rows
    /// * `n_cols` - Number of columns
    /// * `row_ptr` - Row pointers
    /// * `col_idx` - Column indices
    /// * `values` - Non-zero values
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - row_ptr.len() must be n_rows + 1
    /// - col_idx.len() must equal values.len()
    /// - row_ptr[n_rows] must equal col_idx.len()
    ///
    /// Use [`try_new`](Self::try_new) for arrays that come from untrusted input.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_ptr.len(), n_rows + 1, "row_ptr.len() must be n_rows + 1");
        assert_eq!(col_idx.len(), values.len(), "col_idx.len() must equal values.len()");
        assert_eq!(
            row_ptr[n_rows], col_idx.len(),
            "row_ptr[n_rows] must equal col_idx.len()"
        );

        // Check that column indices are within bounds
        for &col in &col_idx {
            assert!(col < n_cols, "Column index {} out of bounds (n_cols = {})", col, n_cols);
        }

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Creates a CSR matrix after checking every structural invariant
    ///
    /// Fails with [`Error::InvalidStructure`] if the arrays are inconsistent,
    /// a column is out of range, a value is zero, or a row repeats a column.
    pub fn try_new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        let matrix = Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Checks the CSR invariants
    ///
    /// - `row_ptr` has `n_rows + 1` entries, starts at 0, never decreases and
    ///   ends at `nnz`
    /// - `col_idx` and `values` both have `nnz` entries
    /// - every column lies in `[0, n_cols)`
    /// - no stored value is zero and no row repeats a column
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Result<()> { Err(Error::InvalidStructure { reason }) };

        if self.n_rows.checked_add(1) != Some(self.row_ptr.len()) {
            return invalid(format!(
                "row_ptr has {} entries for {} rows",
                self.row_ptr.len(),
                self.n_rows
            ));
        }
        if self.col_idx.len() != self.values.len() {
            return invalid(format!(
                "col_idx has {} entries but values has {}",
                self.col_idx.len(),
                self.values.len()
            ));
        }
        if self.row_ptr[0] != 0 {
            return invalid(format!("row_ptr[0] is {}, expected 0", self.row_ptr[0]));
        }
        if self.row_ptr[self.n_rows] != self.col_idx.len() {
            return invalid(format!(
                "row_ptr[{}] is {}, expected nnz = {}",
                self.n_rows,
                self.row_ptr[self.n_rows],
                self.col_idx.len()
            ));
        }
        if let Some(i) = self.row_ptr.windows(2).position(|w| w[0] > w[1]) {
            return invalid(format!("row_ptr decreases between rows {} and {}", i, i + 1));
        }
        if let Some(&col) = self.col_idx.iter().find(|&&col| col >= self.n_cols) {
            return invalid(format!(
                "column index {} out of bounds (n_cols = {})",
                col, self.n_cols
            ));
        }
        if let Some(k) = self.values.iter().position(|v| v.is_zero()) {
            return invalid(format!("explicit zero stored at position {}", k));
        }

        let mut seen = HashSet::new();
        for i in 0..self.n_rows {
            seen.clear();
            for &col in &self.col_idx[self.row_ptr[i]..self.row_ptr[i + 1]] {
                if !seen.insert(col) {
                    return invalid(format!("row {} repeats column {}", i, col));
                }
            }
        }

        Ok(())
    }

    /// Builds a matrix from 0-indexed `(row, col, value)` triplets in any order
    ///
    /// Entries are placed by a counting sort on the row. Repeated coordinates
    /// are summed and zero results are dropped.
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        triplets: &[(usize, usize, T)],
    ) -> Result<Self> {
        let mut row_ptr = try_row_ptr(n_rows)?;
        for &(row, col, _) in triplets {
            if row >= n_rows || col >= n_cols {
                return Err(Error::InvalidStructure {
                    reason: format!(
                        "triplet ({}, {}) outside a {} x {} matrix",
                        row, col, n_rows, n_cols
                    ),
                });
            }
            row_ptr[row + 1] += 1;
        }
        prefix_sum_in_place(&mut row_ptr);

        let mut cursor = try_with_capacity(n_rows)?;
        cursor.extend_from_slice(&row_ptr[..n_rows]);

        let mut col_idx = try_filled(triplets.len(), 0)?;
        let mut values = try_filled(triplets.len(), T::zero())?;
        for &(row, col, val) in triplets {
            let pos = cursor[row];
            col_idx[pos] = col;
            values[pos] = val;
            cursor[row] += 1;
        }

        sum_duplicates(&mut row_ptr, &mut col_idx, &mut values)?;

        Ok(Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx: tighten(col_idx)?,
            values: tighten(values)?,
        })
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns `(n_rows, n_cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of stored entries in row i
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows`.
    pub fn row_nnz(&self, i: usize) -> usize {
        self.row_ptr[i + 1] - self.row_ptr[i]
    }

    /// Returns an iterator over the non-zero elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a non-zero element
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows`.
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }

    /// Iterates every stored entry as `(row, col, value)` in row-major order
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.n_rows).flat_map(move |i| {
            (self.row_ptr[i]..self.row_ptr[i + 1]).map(move |k| (i, self.col_idx[k], self.values[k]))
        })
    }

    /// Looks up the value at `(row, col)`, returning zero for implicit entries
    ///
    /// This scans the row, since columns are unordered.
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_rows`. A column outside the matrix reads as zero.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.row_iter(row)
            .find(|&(c, _)| c == col)
            .map(|(_, &v)| v)
            .unwrap_or_else(T::zero)
    }

    /// Sorts the columns of every row in ascending order
    pub fn sort_indices(&mut self) {
        let mut row: Vec<(usize, T)> = Vec::new();
        for i in 0..self.n_rows {
            let start = self.row_ptr[i];
            let end = self.row_ptr[i + 1];

            row.clear();
            row.extend((start..end).map(|k| (self.col_idx[k], self.values[k])));
            row.sort_unstable_by_key(|&(col, _)| col);

            for (k, (col, val)) in (start..end).zip(row.iter().copied()) {
                self.col_idx[k] = col;
                self.values[k] = val;
            }
        }
    }

    /// Expands the matrix into a dense array
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::zeros((self.n_rows, self.n_cols));
        for (i, j, v) in self.triplets() {
            dense[[i, j]] = dense[[i, j]] + v;
        }
        dense
    }

    /// Gives up ownership of the arrays as `(row_ptr, col_idx, values)`
    pub fn into_raw_parts(self) -> (Vec<usize>, Vec<usize>, Vec<T>) {
        (self.row_ptr, self.col_idx, self.values)
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        let row_ptr = vec![0; n_rows + 1];
        let col_idx = Vec::new();
        let values = Vec::new();

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            n_rows: n,
            n_cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }
}

impl<T: fmt::Debug + Copy + Num> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        // Print a sample of the matrix content
        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let start = self.row_ptr[i];
                let end = self.row_ptr[i + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for j in start..(start + max_elements) {
                        write!(f, "({}, {:?}) ", self.col_idx[j], self.values[j])?;
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
