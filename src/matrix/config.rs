//! Configuration for the reader and the arithmetic kernels

/// How the Matrix Market reader turns coordinate lines into CSR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseStrategy {
    /// Count entries per row, rewind the source, then scatter into place.
    /// Peak memory is the output matrix; the source is read twice.
    #[default]
    TwoPass,
    /// Buffer every triplet on a single read, then counting-sort into CSR.
    /// Reads the source once at the cost of holding all triplets.
    Buffered,
}

/// How the multiply kernel sizes its output buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSizing {
    /// Run a symbolic pass that counts the exact output entries first
    #[default]
    Symbolic,
    /// Start small and double the buffers whenever they fill up
    Growable,
}

/// Configuration shared by the reader and the kernels
#[derive(Debug, Clone, Default)]
pub struct KernelConfig {
    /// Strategy used by [`MatrixMarketReader`](crate::MatrixMarketReader)
    pub parse_strategy: ParseStrategy,

    /// Output sizing used by [`multiply_with`](crate::multiply_with)
    pub output_sizing: OutputSizing,
}

impl KernelConfig {
    /// Returns a copy of this config using the given parse strategy
    pub fn with_parse_strategy(mut self, strategy: ParseStrategy) -> Self {
        self.parse_strategy = strategy;
        self
    }

    /// Returns a copy of this config using the given output sizing
    pub fn with_output_sizing(mut self, sizing: OutputSizing) -> Self {
        self.output_sizing = sizing;
        self
    }
}
