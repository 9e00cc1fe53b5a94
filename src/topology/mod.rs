//! Domain decomposition: which rows a rank owns and who its neighbours are.

pub mod band;
pub mod rank;

pub use band::{RowBand, partition_rows};
pub use rank::RankTopology;
