//! Reading and writing Matrix Market files on disk

use std::io::Write;

use csrmat::{
    parse_file, transpose, write_matrix, Error, KernelConfig, MatrixMarketReader, ParseStrategy,
    SparseMatrixCSR,
};
use tempfile::NamedTempFile;

fn sorted_triplets(matrix: &SparseMatrixCSR<f64>) -> Vec<(usize, usize, f64)> {
    let mut triplets: Vec<_> = matrix.triplets().collect();
    triplets.sort_by_key(|&(row, col, _)| (row, col));
    triplets
}

#[test]
fn test_matrix_market_format() {
    // Create a Matrix Market format string
    let mtx_content = "%%MatrixMarket matrix coordinate real general\n\
                       % generated for a test\n\
                       3 4 5\n\
                       3 4 5.0\n\
                       1 1 1.0\n\
                       2 2 3.0\n\
                       1 3 2.0\n\
                       3 1 4.0\n";

    // Write to temporary file
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", mtx_content).unwrap();

    // Read the matrix
    let matrix = parse_file(temp_file.path()).unwrap();

    assert_eq!(matrix.n_rows, 3);
    assert_eq!(matrix.n_cols, 4);
    assert_eq!(matrix.nnz(), 5);
    assert_eq!(matrix.row_ptr, vec![0, 2, 3, 5]);
    assert!(matrix.validate().is_ok());

    assert_eq!(
        sorted_triplets(&matrix),
        vec![
            (0, 0, 1.0),
            (0, 2, 2.0),
            (1, 1, 3.0),
            (2, 0, 4.0),
            (2, 3, 5.0),
        ]
    );
}

#[test]
fn test_write_then_read() {
    let matrix = SparseMatrixCSR::new(
        3,
        3,
        vec![0, 2, 3, 5],
        vec![2, 0, 1, 0, 2],
        vec![0.1, -2.5, 3.0, 1e-7, 5.0],
    );

    let temp_file = NamedTempFile::new().unwrap();
    write_matrix(temp_file.path(), &matrix).unwrap();

    for strategy in [ParseStrategy::TwoPass, ParseStrategy::Buffered] {
        let loaded = MatrixMarketReader::with_strategy(strategy)
            .read(temp_file.path())
            .unwrap();

        // Values are written in shortest round-trip form, so they come back exactly
        assert_eq!(loaded, matrix);
    }
}

#[test]
fn test_reader_from_config() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "2 3 2\n2 3 1.0\n1 2 2.0\n").unwrap();

    let config = KernelConfig::default().with_parse_strategy(ParseStrategy::Buffered);
    let matrix = MatrixMarketReader::with_config(&config)
        .read(temp_file.path())
        .unwrap();

    let t = transpose(&matrix).unwrap();
    assert_eq!(t.shape(), (3, 2));
    assert_eq!(t.get(2, 1), 1.0);
    assert_eq!(t.get(1, 0), 2.0);
}

#[test]
fn test_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.mtx");

    match parse_file(&missing) {
        Err(Error::FileNotFound { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected FileNotFound, got {:?}", other),
    }
}

#[test]
fn test_header_count_mismatch_in_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "%%MatrixMarket matrix coordinate real general\n2 2 3\n1 1 1.0\n").unwrap();

    let err = parse_file(temp_file.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::EntryCountMismatch {
            declared: 3,
            found: 1
        }
    ));
}
