//! Column tracker shared by the merge and multiply kernels
//!
//! The tracker maps a column of the row currently being produced to the
//! output position that already holds it. Each slot stores an absolute
//! output offset; offsets only grow as rows are emitted, so a slot whose
//! offset lies before the current row's start is stale and reads as empty.
//! That makes a full `O(n_cols)` clear per row unnecessary.

use crate::error::Result;
use crate::utils::{try_filled, try_with_capacity};

/// Marker for a column that has never been written
const SENTINEL: usize = usize::MAX;

/// Scratch space private to one kernel invocation
#[derive(Debug)]
pub struct ColumnTracker {
    /// Output position per column, or `SENTINEL`
    slots: Vec<usize>,

    /// Columns recorded since the last `reset_row`
    touched: Vec<usize>,
}

impl ColumnTracker {
    /// Creates a tracker for rows with `n_cols` columns
    pub fn new(n_cols: usize) -> Result<Self> {
        Ok(Self {
            slots: try_filled(n_cols, SENTINEL)?,
            touched: try_with_capacity(0)?,
        })
    }

    /// Returns the output position of `col` if it was recorded in the current row
    ///
    /// `row_start` is the output offset at which the current row began.
    #[inline]
    pub fn position(&self, col: usize, row_start: usize) -> Option<usize> {
        let slot = self.slots[col];
        if slot != SENTINEL && slot >= row_start {
            Some(slot)
        } else {
            None
        }
    }

    /// Records that `col` lives at output position `pos` in the current row
    #[inline]
    pub fn record(&mut self, col: usize, pos: usize) {
        self.slots[col] = pos;
        self.touched.push(col);
    }

    /// Returns the columns touched in the current row to the sentinel
    ///
    /// Only the touched columns are visited.
    pub fn reset_row(&mut self) {
        for &col in &self.touched {
            self.slots[col] = SENTINEL;
        }
        self.touched.clear();
    }

    /// Number of distinct columns recorded in the current row
    pub fn touched_len(&self) -> usize {
        self.touched.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lookup() {
        let mut tracker = ColumnTracker::new(4).unwrap();
        assert_eq!(tracker.position(2, 0), None);

        tracker.record(2, 5);
        assert_eq!(tracker.position(2, 5), Some(5));
        assert_eq!(tracker.position(2, 3), Some(5));
        assert_eq!(tracker.touched_len(), 1);
    }

    #[test]
    fn test_stale_slot_reads_empty() {
        let mut tracker = ColumnTracker::new(4).unwrap();
        tracker.record(1, 2);

        // Next row starts at offset 3, so the slot from the previous row is stale
        assert_eq!(tracker.position(1, 3), None);
    }

    #[test]
    fn test_reset_row() {
        let mut tracker = ColumnTracker::new(3).unwrap();
        tracker.record(0, 0);
        tracker.record(2, 1);
        tracker.reset_row();

        assert_eq!(tracker.position(0, 0), None);
        assert_eq!(tracker.position(2, 0), None);
        assert_eq!(tracker.touched_len(), 0);
    }
}
