//! # heatdist
//!
//! heatdist is a distributed-memory 2D heat-diffusion stencil solver. A
//! fixed `N × N` grid is split into contiguous row bands, one per rank; each
//! rank repeatedly applies a five-point Jacobi average to its band and
//! trades boundary rows with the ranks directly above and below it.
//!
//! ## Features
//! - Row-band decomposition over a linear rank chain ([`topology`])
//! - Double-buffered grids with short-lived 2D views ([`grid`])
//! - Halo exchange over a pluggable [`Communicator`](algs::communicator::Communicator):
//!   a single-rank `NoComm`, an in-process thread group `LocalComm`, and
//!   `MpiComm` behind the `mpi-support` feature
//! - Barrier-bounded timing and a band-restricted global mean reduction
//!
//! ## Usage
//!
//! ```no_run
//! use heatdist::prelude::*;
//!
//! let cfg = HeatConfig::new(256, 100);
//! let reports = LocalComm::run_group(4, |comm| {
//!     run::<f32, _, _>(&cfg, &comm, &mut std::io::sink())
//! });
//! for r in reports {
//!     println!("{}", r.unwrap().global_mean);
//! }
//! ```

pub mod algs;
pub mod config;
pub mod driver;
pub mod grid;
pub mod heat_error;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::communicator::{Communicator, LocalComm, NoComm};
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::communicator::MpiComm;
    pub use crate::algs::halo::HaloLayout;
    pub use crate::algs::init::Seed;
    pub use crate::algs::reduction::{LocalSum, ReductionScope};
    pub use crate::config::{HeatConfig, Precision};
    pub use crate::driver::{HeatSolver, RunReport, run};
    pub use crate::grid::{Cell, GridBuffer, GridView, GridViewMut};
    pub use crate::heat_error::HeatError;
    pub use crate::topology::{RankTopology, RowBand};
}
