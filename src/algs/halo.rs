//! Halo exchange of a band's boundary rows with the vertical neighbours.
//!
//! The exchange works in place on the buffer the stencil just wrote:
//!
//! 1. snapshot the band's first row (`top`) and last row (`bottom`);
//! 2. send `top` up and receive `from_below` from the rank below;
//! 3. send `bottom` down and receive `from_above` from the rank above;
//! 4. write `from_above` / `from_below` back (see [`HaloLayout`]).
//!
//! The receive buffers start out as copies of the snapshots, so a missing
//! neighbour leaves the corresponding row exactly as it was. Both paired
//! operations are blocking rendezvous: a neighbour that never reaches
//! `exchange` stalls the whole chain.

use crate::algs::communicator::Communicator;
use crate::algs::wire::{self, HALO_DOWN_TAG, HALO_UP_TAG};
use crate::grid::{Cell, GridViewMut};
use crate::heat_error::HeatError;
use crate::topology::{RankTopology, RowBand};
use std::fmt;
use std::str::FromStr;

/// Where received neighbour rows are written.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HaloLayout {
    /// Received rows overwrite the band's own first and last row.
    #[default]
    InBand,
    /// Received rows land just outside the band, in rows `start - 1` and
    /// `stop`, so each rank reads its neighbours' freshly updated rows.
    Ghost,
}

impl fmt::Display for HaloLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HaloLayout::InBand => "in-band",
            HaloLayout::Ghost => "ghost",
        })
    }
}

impl FromStr for HaloLayout {
    type Err = HeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-band" => Ok(HaloLayout::InBand),
            "ghost" => Ok(HaloLayout::Ghost),
            other => Err(HeatError::Config(format!(
                "unknown halo layout `{other}` (expected `in-band` or `ghost`)"
            ))),
        }
    }
}

/// Rows received from the neighbours during one exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct HaloRows<T> {
    pub from_above: Vec<T>,
    pub from_below: Vec<T>,
}

/// Steps 1-3: snapshot the boundary rows and trade them with the neighbours.
pub fn trade_rows<T, C>(
    band: RowBand,
    view: &GridViewMut<'_, T>,
    topo: &RankTopology,
    comm: &C,
) -> Result<HaloRows<T>, HeatError>
where
    T: Cell,
    C: Communicator + ?Sized,
{
    let top = view.row(band.first_row()).to_vec();
    let bottom = view.row(band.last_row()).to_vec();
    let mut from_below = bottom.clone();
    let mut from_above = top.clone();

    comm.send_recv(
        topo.above(),
        wire::as_bytes(&top),
        topo.below(),
        wire::as_bytes_mut(&mut from_below),
        HALO_UP_TAG,
    )?;
    comm.send_recv(
        topo.below(),
        wire::as_bytes(&bottom),
        topo.above(),
        wire::as_bytes_mut(&mut from_above),
        HALO_DOWN_TAG,
    )?;

    Ok(HaloRows {
        from_above,
        from_below,
    })
}

/// Full exchange of `band`'s boundary rows on the current buffer.
pub fn exchange<T, C>(
    band: RowBand,
    view: &mut GridViewMut<'_, T>,
    topo: &RankTopology,
    comm: &C,
    layout: HaloLayout,
) -> Result<(), HeatError>
where
    T: Cell,
    C: Communicator + ?Sized,
{
    let rows = trade_rows(band, view, topo, comm)?;
    log::trace!(
        "rank {}: exchanged rows {}..{} ({layout})",
        topo.rank,
        band.start,
        band.stop
    );
    match layout {
        HaloLayout::InBand => {
            view.row_mut(band.first_row()).copy_from_slice(&rows.from_above);
            view.row_mut(band.last_row()).copy_from_slice(&rows.from_below);
        }
        HaloLayout::Ghost => {
            if topo.above().is_some() {
                view.row_mut(band.start - 1).copy_from_slice(&rows.from_above);
            }
            if topo.below().is_some() {
                view.row_mut(band.stop).copy_from_slice(&rows.from_below);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::communicator::NoComm;
    use crate::grid::GridBuffer;

    #[test]
    fn single_rank_exchange_is_a_no_op() {
        let n = 4;
        let data: Vec<f32> = (0..n * n).map(|i| i as f32).collect();
        let mut g = GridBuffer::from_vec(n, data.clone());
        let topo = RankTopology::new(0, 1).unwrap();
        let band = RowBand { start: 0, stop: n };
        for layout in [HaloLayout::InBand, HaloLayout::Ghost] {
            exchange(band, &mut g.view_mut(), &topo, &NoComm, layout).unwrap();
            assert_eq!(g.as_slice(), &data[..]);
        }
    }

    #[test]
    fn layout_names_parse() {
        assert_eq!("ghost".parse::<HaloLayout>().unwrap(), HaloLayout::Ghost);
        assert_eq!(HaloLayout::InBand.to_string(), "in-band");
        assert!("wrap".parse::<HaloLayout>().is_err());
    }
}
