//! Linear rank chain: each rank talks only to the rank directly above and
//! the rank directly below it. There is no wraparound.

use crate::heat_error::HeatError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RankTopology {
    pub rank: usize,
    pub size: usize,
}

impl RankTopology {
    pub fn new(rank: usize, size: usize) -> Result<Self, HeatError> {
        if size == 0 || rank >= size {
            return Err(HeatError::InvalidRank { rank, size });
        }
        Ok(RankTopology { rank, size })
    }

    /// Owner of the rows just before this rank's band, if any.
    #[inline]
    pub fn above(&self) -> Option<usize> {
        self.rank.checked_sub(1)
    }

    /// Owner of the rows just after this rank's band, if any.
    #[inline]
    pub fn below(&self) -> Option<usize> {
        let next = self.rank + 1;
        (next < self.size).then_some(next)
    }

    #[inline]
    pub fn is_single(&self) -> bool {
        self.size == 1
    }
}
