//! Per-row accumulation machinery shared by the kernels
//!
//! - [`ColumnTracker`] finds whether a column already has an output slot in
//!   the row being produced.
//! - [`CsrBuilder`] collects rows into oversized buffers and runs the
//!   compaction pass when the kernel is done.

pub mod compact;
pub mod tracker;

pub use compact::{compact, sum_duplicates, tighten, CsrBuilder};
pub use tracker::ColumnTracker;
