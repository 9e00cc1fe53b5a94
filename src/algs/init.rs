//! Initial condition: seed a rank's row band with a deterministic function
//! of global position.

use crate::grid::{Cell, GridViewMut};
use crate::heat_error::HeatError;
use crate::topology::RowBand;
use std::fmt;
use std::str::FromStr;

/// Seed function applied once, before the first step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Seed {
    /// `(r - n/2)^2 * (c - n/2)^2`, zero along the centre lines.
    #[default]
    Quartic,
    /// All cells zero.
    Zero,
}

impl Seed {
    /// Value at global cell `(r, c)` of an `n × n` grid, in `f64`.
    #[inline]
    pub fn value(self, n: usize, r: usize, c: usize) -> f64 {
        match self {
            Seed::Quartic => {
                let mid = n as f64 / 2.0;
                (r as f64 - mid).powi(2) * (c as f64 - mid).powi(2)
            }
            Seed::Zero => 0.0,
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Seed::Quartic => "quartic",
            Seed::Zero => "zero",
        })
    }
}

impl FromStr for Seed {
    type Err = HeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quartic" => Ok(Seed::Quartic),
            "zero" => Ok(Seed::Zero),
            other => Err(HeatError::Config(format!(
                "unknown seed `{other}` (expected `quartic` or `zero`)"
            ))),
        }
    }
}

/// Fill every row of `band` with the default quartic seed.
pub fn init<T: Cell>(band: RowBand, view: &mut GridViewMut<'_, T>) {
    init_with(band, view, Seed::Quartic);
}

/// Fill every row of `band`, all columns, with `seed`. Rows outside the
/// band are not touched.
pub fn init_with<T: Cell>(band: RowBand, view: &mut GridViewMut<'_, T>, seed: Seed) {
    let n = view.n();
    for r in band.rows() {
        for (c, cell) in view.row_mut(r).iter_mut().enumerate() {
            *cell = T::lit(seed.value(n, r, c));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridBuffer;

    #[test]
    fn quartic_matches_closed_form() {
        let mut g = GridBuffer::<f64>::new(4);
        init(RowBand { start: 0, stop: 4 }, &mut g.view_mut());
        let v = g.view();
        // (r-2)^2 (c-2)^2
        assert_eq!(v[(0, 0)], 16.0);
        assert_eq!(v[(1, 3)], 1.0);
        assert_eq!(v[(2, 1)], 0.0);
        assert_eq!(v[(3, 0)], 4.0);
    }

    #[test]
    fn writes_only_the_band() {
        let mut g = GridBuffer::<f32>::new(6);
        g.view_mut().row_mut(0).fill(-1.0);
        init(RowBand { start: 2, stop: 4 }, &mut g.view_mut());
        assert_eq!(g.row(0), &[-1.0; 6]);
        assert_eq!(g.row(1), &[0.0; 6]);
        assert_eq!(g.row(4), &[0.0; 6]);
        assert_eq!(g.row(2)[0], 9.0);
    }

    #[test]
    fn seed_names_parse() {
        assert_eq!("zero".parse::<Seed>().unwrap(), Seed::Zero);
        assert!("gaussian".parse::<Seed>().is_err());
    }
}
