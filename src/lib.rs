//! # csrmat: sparse matrices in Compressed Sparse Row form
//!
//! Loads matrices from Matrix Market coordinate files and combines them
//! without ever touching the implicit zeros: every kernel runs in time
//! proportional to the stored entries (or, for multiplication, to the
//! intermediate products), never to `n_rows · n_cols`.
//!
//! ## Components
//!
//! 1. **Market Reader** ([`MatrixMarketReader`], [`parse_file`]): builds a
//!    valid CSR matrix from unordered, 1-indexed triplets.
//!
//! 2. **Merge Kernel** ([`add`], [`subtract`], [`combine`]): row-wise union
//!    with accumulation or negation, followed by a compaction pass that drops
//!    exact cancellations.
//!
//! 3. **Gustavson Kernel** ([`multiply`], [`multiply_with`]): row-wise sparse
//!    product with a column tracker and an exactly sized output.
//!
//! 4. **Transpose Kernel** ([`transpose`]): counting sort on column index.
//!
//! Every operation returns a [`Result`]; nothing in the library exits the
//! process. Each kernel allocates its own output and scratch space and never
//! modifies its inputs.
//!
//! ## Usage
//!
//! ```
//! use csrmat::{add, multiply, transpose, MatrixMarketReader};
//!
//! // A = [1 0; 0 2], B = [0 3; 4 0]
//! let reader = MatrixMarketReader::new();
//! let a = reader.parse_str("2 2 2\n1 1 1.0\n2 2 2.0\n")?;
//! let b = reader.parse_str("2 2 2\n1 2 3.0\n2 1 4.0\n")?;
//!
//! let sum = add(&a, &b)?;
//! assert_eq!(sum.get(0, 1), 3.0);
//!
//! let product = multiply(&a, &b)?;
//! assert_eq!(product.get(1, 0), 8.0);
//!
//! assert_eq!(transpose(&a)?, a);
//! # Ok::<(), csrmat::Error>(())
//! ```

pub mod accumulator;
pub mod error;
pub mod kernels;
pub mod market;
pub mod matrix;
pub mod utils;

// Re-export primary components
pub use error::{Error, Result};
pub use kernels::{add, combine, multiply, multiply_with, subtract, transpose, Sign};
pub use market::{parse_file, write_matrix, MatrixMarketReader};
pub use matrix::{KernelConfig, OutputSizing, ParseStrategy, SparseMatrixCSR};
pub use utils::{from_sprs_csr, to_sprs_csr};

/// Version information for the csrmat library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
