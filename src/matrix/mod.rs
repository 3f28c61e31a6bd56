// Matrix data structures and configuration

pub mod config;
pub mod csr;

pub use config::{KernelConfig, OutputSizing, ParseStrategy};
pub use csr::SparseMatrixCSR;
