//! Matrix Market coordinate format reader/writer
//!
//! Input layout:
//!
//! ```text
//! %%MatrixMarket matrix coordinate real general
//! % any number of comment lines
//! <rows> <cols> <nnz>
//! <row> <col> <value>      (nnz lines, 1-indexed)
//! ```
//!
//! Lines starting with `%` and blank lines are skipped anywhere. The header's
//! entry count must match the number of coordinate lines exactly.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;
use num_traits::Num;

use crate::accumulator::{sum_duplicates, tighten};
use crate::error::{Error, Result};
use crate::matrix::{KernelConfig, ParseStrategy, SparseMatrixCSR};
use crate::utils::{prefix_sum_in_place, try_filled, try_grow, try_row_ptr, try_with_capacity};

/// Upper bound on the triplet buffer reserved up front from an untrusted header
const INITIAL_TRIPLETS: usize = 1 << 16;

/// Reads Matrix Market coordinate files into CSR
#[derive(Debug, Clone, Default)]
pub struct MatrixMarketReader {
    strategy: ParseStrategy,
}

impl MatrixMarketReader {
    /// Creates a reader using the default two-pass strategy
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reader using the strategy from `config`
    pub fn with_config(config: &KernelConfig) -> Self {
        Self::with_strategy(config.parse_strategy)
    }

    /// Creates a reader using `strategy`
    pub fn with_strategy(strategy: ParseStrategy) -> Self {
        Self { strategy }
    }

    /// Reads the file at `path`
    ///
    /// Fails with [`Error::FileNotFound`] if the file cannot be opened.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<SparseMatrixCSR<f64>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let matrix = self.read_from(BufReader::new(file))?;
        debug!(
            "read {}: {}x{}, nnz {} ({:?})",
            path.display(),
            matrix.n_rows,
            matrix.n_cols,
            matrix.nnz(),
            self.strategy
        );
        Ok(matrix)
    }

    /// Reads from any seekable buffered source
    pub fn read_from<R: BufRead + Seek>(&self, src: R) -> Result<SparseMatrixCSR<f64>> {
        match self.strategy {
            ParseStrategy::TwoPass => read_two_pass(src),
            ParseStrategy::Buffered => read_buffered(src),
        }
    }

    /// Parses Matrix Market text held in memory
    pub fn parse_str(&self, text: &str) -> Result<SparseMatrixCSR<f64>> {
        self.read_from(Cursor::new(text.as_bytes()))
    }
}

/// Reads a Matrix Market file with the default reader
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SparseMatrixCSR<f64>> {
    MatrixMarketReader::new().read(path)
}

/// Writes `matrix` in Matrix Market coordinate format
pub fn write_matrix<P, T>(path: P, matrix: &SparseMatrixCSR<T>) -> Result<()>
where
    P: AsRef<Path>,
    T: Copy + Num + Display,
{
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "%%MatrixMarket matrix coordinate real general")?;
    writeln!(out, "{} {} {}", matrix.n_rows, matrix.n_cols, matrix.nnz())?;

    for (i, j, val) in matrix.triplets() {
        writeln!(out, "{} {} {}", i + 1, j + 1, val)?;
    }

    out.flush()?;
    Ok(())
}

/// Dimensions line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    n_rows: usize,
    n_cols: usize,
    nnz: usize,
}

/// Line reader that skips comments and blank lines and tracks line numbers
struct ContentLines<R> {
    src: R,
    buf: String,
    line_no: usize,
}

impl<R: BufRead> ContentLines<R> {
    fn new(src: R) -> Self {
        Self {
            src,
            buf: String::new(),
            line_no: 0,
        }
    }

    /// Returns the next line with content, with its 1-based line number
    fn next_content(&mut self) -> Result<Option<(usize, &str)>> {
        loop {
            self.buf.clear();
            if self.src.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let skip = {
                let line = self.buf.trim();
                line.is_empty() || line.starts_with('%')
            };
            if !skip {
                return Ok(Some((self.line_no, self.buf.trim())));
            }
        }
    }

    fn header(&mut self) -> Result<Header> {
        match self.next_content()? {
            Some((_, line)) => parse_header(line),
            None => Err(Error::MalformedHeader {
                line: String::new(),
                reason: "missing dimensions line",
            }),
        }
    }
}

fn parse_header(line: &str) -> Result<Header> {
    let malformed = |reason| Error::MalformedHeader {
        line: line.to_string(),
        reason,
    };

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(malformed("expected <rows> <cols> <nnz>"));
    }

    let mut dims = [0usize; 3];
    for (dim, part) in dims.iter_mut().zip(&parts) {
        *dim = part
            .parse()
            .map_err(|_| malformed("dimensions must be non-negative integers"))?;
    }

    if dims[0] == usize::MAX {
        return Err(malformed("row count leaves no room for the row pointer"));
    }

    Ok(Header {
        n_rows: dims[0],
        n_cols: dims[1],
        nnz: dims[2],
    })
}

/// Parses `<row> <col> <value>` and returns 0-indexed coordinates
fn parse_entry(line_no: usize, line: &str, header: &Header) -> Result<(usize, usize, f64)> {
    let malformed = |reason: String| Error::MalformedEntry { line_no, reason };

    let mut fields = line.split_whitespace();
    let (row, col, val) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(row), Some(col), Some(val), None) => (row, col, val),
        _ => return Err(malformed("expected <row> <col> <value>".to_string())),
    };

    let row: usize = row
        .parse()
        .map_err(|_| malformed(format!("invalid row index {:?}", row)))?;
    let col: usize = col
        .parse()
        .map_err(|_| malformed(format!("invalid column index {:?}", col)))?;
    let val: f64 = val
        .parse()
        .map_err(|_| malformed(format!("invalid value {:?}", val)))?;

    if row == 0 || row > header.n_rows || col == 0 || col > header.n_cols {
        return Err(Error::EntryOutOfBounds {
            line_no,
            row,
            col,
            n_rows: header.n_rows,
            n_cols: header.n_cols,
        });
    }

    Ok((row - 1, col - 1, val))
}

/// Counts entries per row, rewinds, then scatters each entry into place
fn read_two_pass<R: BufRead + Seek>(mut src: R) -> Result<SparseMatrixCSR<f64>> {
    let mut lines = ContentLines::new(&mut src);
    let header = lines.header()?;

    let mut row_ptr = try_row_ptr(header.n_rows)?;
    let mut found = 0;
    while let Some((line_no, line)) = lines.next_content()? {
        found += 1;
        if found > header.nnz {
            break;
        }
        let (row, _, _) = parse_entry(line_no, line, &header)?;
        row_ptr[row + 1] += 1;
    }
    if found != header.nnz {
        return Err(Error::EntryCountMismatch {
            declared: header.nnz,
            found,
        });
    }
    prefix_sum_in_place(&mut row_ptr);

    src.seek(SeekFrom::Start(0))?;
    let mut lines = ContentLines::new(&mut src);
    lines.header()?;

    let mut cursor = try_with_capacity(header.n_rows)?;
    cursor.extend_from_slice(&row_ptr[..header.n_rows]);

    let mut col_idx = try_filled(header.nnz, 0)?;
    let mut values = try_filled(header.nnz, 0.0)?;

    for read in 0..header.nnz {
        let (line_no, line) = lines.next_content()?.ok_or(Error::EntryCountMismatch {
            declared: header.nnz,
            found: read,
        })?;
        let (row, col, val) = parse_entry(line_no, line, &header)?;

        let pos = cursor[row];
        col_idx[pos] = col;
        values[pos] = val;
        cursor[row] += 1;
    }

    let removed = sum_duplicates(&mut row_ptr, &mut col_idx, &mut values)?;
    if removed > 0 {
        debug!("dropped {} duplicate or zero entries", removed);
    }

    Ok(SparseMatrixCSR {
        n_rows: header.n_rows,
        n_cols: header.n_cols,
        row_ptr,
        col_idx: tighten(col_idx)?,
        values: tighten(values)?,
    })
}

/// Buffers every triplet on one read, then counting-sorts into CSR
fn read_buffered<R: BufRead>(src: R) -> Result<SparseMatrixCSR<f64>> {
    let mut lines = ContentLines::new(src);
    let header = lines.header()?;

    let mut triplets = try_with_capacity(header.nnz.min(INITIAL_TRIPLETS))?;
    while let Some((line_no, line)) = lines.next_content()? {
        if triplets.len() == header.nnz {
            return Err(Error::EntryCountMismatch {
                declared: header.nnz,
                found: header.nnz + 1,
            });
        }
        let entry = parse_entry(line_no, line, &header)?;
        try_grow(&mut triplets, 1)?;
        triplets.push(entry);
    }
    if triplets.len() != header.nnz {
        return Err(Error::EntryCountMismatch {
            declared: header.nnz,
            found: triplets.len(),
        });
    }

    SparseMatrixCSR::from_triplets(header.n_rows, header.n_cols, &triplets)
}
