//! Validate the kernels against sprs

use csrmat::{add, from_sprs_csr, multiply, multiply_with, subtract, to_sprs_csr, transpose};
use csrmat::{KernelConfig, OutputSizing, SparseMatrixCSR};
use sprs::CsMat;

/// Create a simple test matrix
fn create_test_matrix() -> SparseMatrixCSR<f64> {
    // Create a 4x4 matrix:
    // [1 2 0 0]
    // [0 3 4 0]
    // [0 0 5 6]
    // [7 0 0 8]
    let row_ptr = vec![0, 2, 4, 6, 8];
    let col_idx = vec![1, 0, 2, 1, 2, 3, 3, 0];
    let values = vec![2.0, 1.0, 4.0, 3.0, 5.0, 6.0, 8.0, 7.0];

    SparseMatrixCSR::new(4, 4, row_ptr, col_idx, values)
}

/// A deterministic banded matrix with a few off-band entries
fn create_banded_matrix(n: usize, seed: u64) -> SparseMatrixCSR<f64> {
    let mut triplets = Vec::new();
    let mut state = seed;
    for i in 0..n {
        for offset in [0usize, 1, 3] {
            let j = (i + offset) % n;
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let val = ((state >> 33) % 9) as f64 - 4.0;
            triplets.push((i, j, val));
        }
    }
    SparseMatrixCSR::from_triplets(n, n, &triplets).unwrap()
}

/// Compare our result against sprs row by row, ignoring order within rows
fn assert_matches_sprs(ours: &SparseMatrixCSR<f64>, expected: &CsMat<f64>) {
    assert_eq!(ours.n_rows, expected.rows());
    assert_eq!(ours.n_cols, expected.cols());

    // sprs keeps explicit zeros from cancellation; compare dense views
    let dense = ours.to_dense();
    let expected_dense = expected.to_dense();
    for i in 0..ours.n_rows {
        for j in 0..ours.n_cols {
            assert!(
                (dense[[i, j]] - expected_dense[[i, j]]).abs() < 1e-10,
                "Value mismatch at ({}, {}): {} vs {}",
                i,
                j,
                dense[[i, j]],
                expected_dense[[i, j]]
            );
        }
    }

    assert!(ours.validate().is_ok());
}

#[test]
fn test_multiply_vs_sprs() {
    let a = create_test_matrix();
    let b = create_test_matrix();

    let result = multiply(&a, &b).unwrap();
    let result_sprs = &to_sprs_csr(&a) * &to_sprs_csr(&b);

    assert_matches_sprs(&result, &result_sprs);
}

#[test]
fn test_add_and_subtract_vs_sprs() {
    let a = create_banded_matrix(50, 1);
    let b = create_banded_matrix(50, 2);

    let a_sprs = to_sprs_csr(&a);
    let b_sprs = to_sprs_csr(&b);

    assert_matches_sprs(&add(&a, &b).unwrap(), &(&a_sprs + &b_sprs));
    assert_matches_sprs(&subtract(&a, &b).unwrap(), &(&a_sprs - &b_sprs));
}

#[test]
fn test_larger_multiply_vs_sprs() {
    let a = create_banded_matrix(200, 7);
    let b = create_banded_matrix(200, 11);
    let expected = &to_sprs_csr(&a) * &to_sprs_csr(&b);

    let growable = KernelConfig::default().with_output_sizing(OutputSizing::Growable);
    for c in [multiply(&a, &b).unwrap(), multiply_with(&a, &b, &growable).unwrap()] {
        assert_matches_sprs(&c, &expected);
    }
}

#[test]
fn test_transpose_vs_sprs() {
    let a = create_banded_matrix(40, 3);
    let expected = to_sprs_csr(&a).transpose_into().to_csr();

    let t = transpose(&a).unwrap();
    assert_matches_sprs(&t, &expected);
}

#[test]
fn test_sprs_roundtrip_preserves_entries() {
    let a = create_banded_matrix(30, 5);
    let back = from_sprs_csr(to_sprs_csr(&a)).unwrap();

    assert_eq!(back.nnz(), a.nnz());
    assert_eq!(back.to_dense(), a.to_dense());
}
