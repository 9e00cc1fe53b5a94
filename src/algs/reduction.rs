//! End-of-run reduction of the final grid to a mean cell value.

use crate::algs::communicator::Communicator;
use crate::grid::{Cell, GridView};
use crate::heat_error::HeatError;
use crate::topology::RowBand;
use std::fmt;
use std::str::FromStr;

/// Which cells a rank folds into its local sum.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReductionScope {
    /// Only the rank's own band, the rows it actually keeps up to date.
    #[default]
    Band,
    /// Every row of the local buffer, including rows owned by other ranks
    /// that this rank never updates.
    FullGrid,
}

impl fmt::Display for ReductionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReductionScope::Band => "band",
            ReductionScope::FullGrid => "full-grid",
        })
    }
}

impl FromStr for ReductionScope {
    type Err = HeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "band" => Ok(ReductionScope::Band),
            "full-grid" => Ok(ReductionScope::FullGrid),
            other => Err(HeatError::Config(format!(
                "unknown reduction scope `{other}` (expected `band` or `full-grid`)"
            ))),
        }
    }
}

/// Sum and cell count accumulated in `f64`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LocalSum {
    pub sum: f64,
    pub count: u64,
}

impl LocalSum {
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Sum the cells selected by `scope`, all columns of each row.
pub fn local_sum<T: Cell>(view: GridView<'_, T>, band: RowBand, scope: ReductionScope) -> LocalSum {
    let rows = match scope {
        ReductionScope::Band => band.rows(),
        ReductionScope::FullGrid => 0..view.n(),
    };
    let mut acc = LocalSum::default();
    for r in rows {
        for &v in view.row(r) {
            acc.sum += v.widen();
        }
        acc.count += view.n() as u64;
    }
    acc
}

/// Combine every rank's `(sum, count)` into one group-wide mean.
pub fn global_mean<C: Communicator + ?Sized>(local: LocalSum, comm: &C) -> Result<f64, HeatError> {
    let total = comm.all_reduce_sum(&[local.sum, local.count as f64])?;
    Ok(LocalSum {
        sum: total[0],
        count: total[1] as u64,
    }
    .mean())
}
