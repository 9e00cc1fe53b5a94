//! HeatError: Unified error type for heatdist public APIs
//!
//! Configuration problems are reported here at startup, before any rank
//! touches the transport. Topology mismatches (a neighbour that never
//! joins an exchange) cannot be detected locally and still hang.

use thiserror::Error;

/// Unified error type for solver, transport and configuration operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeatError {
    /// The grid has no interior cells to update.
    #[error("grid side length {n} is too small: need at least 3 for an interior")]
    GridTooSmall { n: usize },
    /// More ranks than rows: at least one band would be empty.
    #[error("cannot split {n} rows across {ranks} ranks without an empty band")]
    EmptyBand { n: usize, ranks: usize },
    /// Rank id outside `[0, size)`.
    #[error("rank {rank} is outside a group of size {size}")]
    InvalidRank { rank: usize, size: usize },
    /// The timing reporter is not a member of the group.
    #[error("report rank {report_rank} is outside a group of size {size}")]
    ReportRankOutOfRange { report_rank: usize, size: usize },
    /// A received message does not fit the posted receive buffer.
    #[error("message length mismatch: expected {expected} bytes, got {actual}")]
    MessageLength { expected: usize, actual: usize },
    /// Transport-level failure (initialization, disconnected peer).
    #[error("communication error: {0}")]
    Comm(String),
    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
    /// Writing the console report failed.
    #[error("output error: {0}")]
    Output(String),
}

impl From<std::io::Error> for HeatError {
    fn from(e: std::io::Error) -> Self {
        HeatError::Output(e.to_string())
    }
}
