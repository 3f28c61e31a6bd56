//! Arithmetic kernels over CSR matrices
//!
//! Every kernel borrows its operands, allocates fresh output and returns a
//! matrix that owns its arrays. Scratch space lives only for the duration of
//! one call.

pub mod gustavson;
pub mod merge;
pub mod transpose;

pub use gustavson::{multiply, multiply_with};
pub use merge::{add, combine, subtract, Sign};
pub use transpose::transpose;
