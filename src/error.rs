//! Error types for csrmat
//!
//! Every fallible operation in the crate (reading a Matrix Market file,
//! allocating kernel output, combining matrices of incompatible shape)
//! reports one of these variants instead of aborting the process.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or operating on CSR matrices
#[derive(Error, Debug)]
pub enum Error {
    /// The input file could not be opened
    #[error("failed to open file {path}: {source}")]
    FileNotFound {
        /// Path that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading from an already opened source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dimensions line is missing or is not three non-negative integers
    #[error("malformed header {line:?}: {reason}")]
    MalformedHeader {
        /// The offending line (empty if the source ended first)
        line: String,
        /// What was wrong with it
        reason: &'static str,
    },

    /// A coordinate line is not `<row> <col> <value>`
    #[error("malformed entry on line {line_no}: {reason}")]
    MalformedEntry {
        /// 1-based line number in the source
        line_no: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The header's declared entry count disagrees with the lines present
    #[error("header declares {declared} entries but {found} were found")]
    EntryCountMismatch {
        /// Count from the header
        declared: usize,
        /// Count actually read (stops at `declared + 1`)
        found: usize,
    },

    /// A 1-indexed coordinate lies outside the declared shape
    #[error("entry ({row}, {col}) on line {line_no} is outside a {n_rows} x {n_cols} matrix")]
    EntryOutOfBounds {
        /// 1-based line number in the source
        line_no: usize,
        /// 1-indexed row as written
        row: usize,
        /// 1-indexed column as written
        col: usize,
        /// Declared number of rows
        n_rows: usize,
        /// Declared number of columns
        n_cols: usize,
    },

    /// A buffer could not be allocated
    #[error("out of memory: failed to allocate {bytes} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        bytes: usize,
    },

    /// Operand shapes are incompatible for the operation
    #[error("dimension mismatch in {op}: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        /// Operation name
        op: &'static str,
        /// Shape of the left operand
        lhs: (usize, usize),
        /// Shape of the right operand
        rhs: (usize, usize),
    },

    /// Raw CSR arrays do not describe a valid matrix
    #[error("invalid CSR structure: {reason}")]
    InvalidStructure {
        /// Which invariant was violated
        reason: String,
    },
}

impl Error {
    /// Returns `true` if this is a shape error from an arithmetic kernel.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Error::DimensionMismatch { .. })
    }

    /// Returns `true` if the error came from the contents of a Matrix Market source.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedHeader { .. }
                | Error::MalformedEntry { .. }
                | Error::EntryCountMismatch { .. }
                | Error::EntryOutOfBounds { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = Error::DimensionMismatch {
            op: "multiply",
            lhs: (2, 3),
            rhs: (2, 3),
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch in multiply: (2, 3) vs (2, 3)"
        );
        assert!(err.is_dimension_mismatch());
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_parse_error_predicate() {
        let err = Error::EntryCountMismatch {
            declared: 4,
            found: 3,
        };
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("declares 4"));

        let oom = Error::OutOfMemory { bytes: 64 };
        assert!(!oom.is_parse_error());
    }
}
