//! Row-band decomposition of the global grid.
//!
//! Rows `[0, n)` are split into `size` contiguous bands of height
//! `n / size`; the last rank additionally absorbs the remainder so the
//! bands always cover every row.

use crate::heat_error::HeatError;
use std::ops::Range;

/// Half-open range `[start, stop)` of global rows owned by one rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RowBand {
    pub start: usize,
    pub stop: usize,
}

impl RowBand {
    /// Compute the band of `rank` in a group of `size` over `n` rows.
    ///
    /// Fails if the rank is outside the group or any band would be empty.
    pub fn for_rank(n: usize, rank: usize, size: usize) -> Result<Self, HeatError> {
        if size == 0 || rank >= size {
            return Err(HeatError::InvalidRank { rank, size });
        }
        if n < size {
            return Err(HeatError::EmptyBand { n, ranks: size });
        }
        let height = n / size;
        let start = rank * height;
        let stop = if rank + 1 == size { n } else { start + height };
        Ok(RowBand { start, stop })
    }

    /// Number of rows in the band.
    #[inline]
    pub fn height(&self) -> usize {
        self.stop - self.start
    }

    #[inline]
    pub fn first_row(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn last_row(&self) -> usize {
        self.stop - 1
    }

    #[inline]
    pub fn contains(&self, row: usize) -> bool {
        self.start <= row && row < self.stop
    }

    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.start..self.stop
    }

    /// Rows of the band the stencil may write: the band clipped to the
    /// global interior `[1, n - 1)`. Empty if the band lies on an edge only.
    #[inline]
    pub fn interior_rows(&self, n: usize) -> Range<usize> {
        let lo = self.start.max(1);
        let hi = self.stop.min(n.saturating_sub(1));
        lo..hi.max(lo)
    }
}

/// Bands of every rank in order. Used by tests and diagnostics.
pub fn partition_rows(n: usize, size: usize) -> Result<Vec<RowBand>, HeatError> {
    (0..size).map(|r| RowBand::for_rank(n, r, size)).collect()
}
