//! Re-export public algorithms.

pub mod communicator;
pub mod halo;
pub mod init;
pub mod reduction;
pub mod stencil;
pub mod wire;

pub use halo::{HaloLayout, exchange};
pub use init::{Seed, init, init_with};
pub use reduction::{LocalSum, ReductionScope, global_mean, local_sum};
pub use stencil::update;
