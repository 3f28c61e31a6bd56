//! Utility functions and helpers

pub mod formats;

pub use formats::{from_sprs_csr, to_sprs_csr};

use crate::error::{Error, Result};

/// Computes an exclusive prefix sum (scan) for a vector
pub fn exclusive_scan(input: &[usize]) -> Result<Vec<usize>> {
    let mut result = try_with_capacity(input.len() + 1)?;
    let mut sum = 0;

    result.push(0); // First element is always 0

    for &val in input {
        sum += val;
        result.push(sum);
    }

    Ok(result)
}

/// Turns per-row counts stored at `ptr[i + 1]` into row start offsets, in place
///
/// `ptr[0]` is expected to be zero; afterwards `ptr[i]` is the offset of row `i`
/// and the last element is the total.
pub fn prefix_sum_in_place(ptr: &mut [usize]) {
    for i in 1..ptr.len() {
        ptr[i] += ptr[i - 1];
    }
}

/// Allocates an empty vector able to hold `capacity` elements without reallocating
///
/// Allocation failure is reported as [`Error::OutOfMemory`] rather than aborting.
pub fn try_with_capacity<T>(capacity: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity).map_err(|_| Error::OutOfMemory {
        bytes: capacity.saturating_mul(std::mem::size_of::<T>()),
    })?;
    Ok(v)
}

/// Allocates a vector of `len` copies of `fill`
pub fn try_filled<T: Clone>(len: usize, fill: T) -> Result<Vec<T>> {
    let mut v = try_with_capacity(len)?;
    v.resize(len, fill);
    Ok(v)
}

/// Allocates a zeroed `row_ptr` for `n_rows` rows
///
/// A row count of `usize::MAX` has no representable `row_ptr` length and is
/// reported as [`Error::OutOfMemory`].
pub fn try_row_ptr(n_rows: usize) -> Result<Vec<usize>> {
    let len = n_rows.checked_add(1).ok_or(Error::OutOfMemory { bytes: usize::MAX })?;
    try_filled(len, 0)
}

/// Grows `v` so it can take `additional` more elements, doubling when possible
pub fn try_grow<T>(v: &mut Vec<T>, additional: usize) -> Result<()> {
    if v.capacity() - v.len() >= additional {
        return Ok(());
    }
    let wanted = (v.capacity() * 2).max(v.len() + additional);
    v.try_reserve_exact(wanted - v.len())
        .or_else(|_| v.try_reserve_exact(additional))
        .map_err(|_| Error::OutOfMemory {
            bytes: (v.len() + additional).saturating_mul(std::mem::size_of::<T>()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_scan() {
        let input = vec![1, 2, 3, 4];
        let expected = vec![0, 1, 3, 6, 10];
        assert_eq!(exclusive_scan(&input).unwrap(), expected);

        let input = vec![0, 0, 5, 0];
        let expected = vec![0, 0, 0, 5, 5];
        assert_eq!(exclusive_scan(&input).unwrap(), expected);
    }

    #[test]
    fn test_prefix_sum_in_place() {
        let mut ptr = vec![0, 2, 0, 3];
        prefix_sum_in_place(&mut ptr);
        assert_eq!(ptr, vec![0, 2, 2, 5]);
    }

    #[test]
    fn test_try_row_ptr() {
        assert_eq!(try_row_ptr(3).unwrap(), vec![0; 4]);
        assert!(matches!(try_row_ptr(usize::MAX), Err(Error::OutOfMemory { .. })));
        assert!(matches!(try_row_ptr(usize::MAX - 1), Err(Error::OutOfMemory { .. })));
    }

    #[test]
    fn test_try_grow_doubles() {
        let mut v: Vec<u32> = try_with_capacity(4).unwrap();
        v.extend([1, 2, 3, 4]);
        try_grow(&mut v, 1).unwrap();
        assert!(v.capacity() >= 8);
    }

    #[test]
    fn test_huge_allocation_is_out_of_memory() {
        let err = try_with_capacity::<u64>(usize::MAX / 4).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory { .. }));
    }
}
