#![allow(dead_code)]
use heatdist::algs::init::{Seed, init_with};
use heatdist::grid::{Cell, GridBuffer};
use heatdist::topology::RowBand;

/// Plain double-buffered Jacobi loop over the whole grid: the reference
/// every decomposed run is compared against.
pub fn sequential<T: Cell>(n: usize, steps: usize, seed: Seed) -> GridBuffer<T> {
    let mut prev = GridBuffer::<T>::new(n);
    init_with(RowBand { start: 0, stop: n }, &mut prev.view_mut(), seed);
    let mut cur = GridBuffer::<T>::new(n);
    let w = T::lit(0.2);
    for _ in 0..steps {
        {
            let p = prev.view();
            let mut d = cur.view_mut();
            for r in 1..n - 1 {
                for c in 1..n - 1 {
                    d[(r, c)] = (p[(r, c)] + p[(r - 1, c)] + p[(r + 1, c)] + p[(r, c - 1)]
                        + p[(r, c + 1)])
                        * w;
                }
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

/// Assert rows `band` of `got` are bit-identical to the same rows of `want`.
pub fn assert_band_eq<T: Cell>(got: &GridBuffer<T>, want: &GridBuffer<T>, band: RowBand) {
    for r in band.rows() {
        assert_eq!(got.row(r), want.row(r), "row {r} differs");
    }
}

/// Fill `band` with values that identify the rank and cell.
pub fn tag_band(g: &mut GridBuffer<f64>, band: RowBand, rank: usize) {
    let n = g.n();
    let mut v = g.view_mut();
    for r in band.rows() {
        for c in 0..n {
            v[(r, c)] = 1000.0 * (rank as f64 + 1.0) + r as f64 + c as f64 / 100.0;
        }
    }
}
