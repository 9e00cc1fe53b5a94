//! Five-point Jacobi update of one row band.
//!
//! `dst(r,c) = 0.2 * (src(r,c) + src(r-1,c) + src(r+1,c) + src(r,c-1) + src(r,c+1))`
//! for every `r` in the band clipped to `[1, n-2]` and every `c` in
//! `[1, n-2]`. The global edge rows and columns of `dst` are never written
//! and keep whatever initialization or a previous exchange left there.

use crate::grid::{Cell, GridView, GridViewMut};
use crate::topology::RowBand;

/// Weight of each of the five stencil points.
pub const STENCIL_WEIGHT: f64 = 0.2;

/// One Jacobi sweep of `band` from `src` into `dst`.
///
/// # Panics
/// Panics if the two views have different extents.
pub fn update<T: Cell>(band: RowBand, dst: &mut GridViewMut<'_, T>, src: GridView<'_, T>) {
    let n = src.n();
    assert_eq!(dst.n(), n, "source and destination extents differ");
    if n < 3 {
        return;
    }
    let w = T::lit(STENCIL_WEIGHT);
    for r in band.interior_rows(n) {
        let up = src.row(r - 1);
        let mid = src.row(r);
        let down = src.row(r + 1);
        let out = dst.row_mut(r);
        for c in 1..n - 1 {
            out[c] = (mid[c] + up[c] + down[c] + mid[c - 1] + mid[c + 1]) * w;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridBuffer;

    #[test]
    fn averages_five_points() {
        let n = 3;
        let src = GridBuffer::from_vec(n, vec![0.0, 1.0, 0.0, 2.0, 5.0, 3.0, 0.0, 4.0, 0.0]);
        let mut dst = GridBuffer::<f64>::new(n);
        update(RowBand { start: 0, stop: 3 }, &mut dst.view_mut(), src.view());
        assert_eq!(dst.view()[(1, 1)], (5.0 + 1.0 + 4.0 + 2.0 + 3.0) * 0.2);
    }

    #[test]
    fn edges_are_never_written() {
        let n = 5;
        let src = GridBuffer::from_vec(n, vec![1.0f32; n * n]);
        let mut dst = GridBuffer::from_vec(n, vec![-7.0f32; n * n]);
        update(RowBand { start: 0, stop: n }, &mut dst.view_mut(), src.view());
        let v = dst.view();
        for i in 0..n {
            assert_eq!(v[(0, i)], -7.0);
            assert_eq!(v[(n - 1, i)], -7.0);
            assert_eq!(v[(i, 0)], -7.0);
            assert_eq!(v[(i, n - 1)], -7.0);
        }
        assert_eq!(v[(2, 2)], 1.0f32 * 5.0 * 0.2);
    }

    #[test]
    fn rows_outside_the_band_are_untouched() {
        let n = 6;
        let src = GridBuffer::from_vec(n, vec![1.0f64; n * n]);
        let mut dst = GridBuffer::<f64>::new(n);
        update(RowBand { start: 3, stop: 6 }, &mut dst.view_mut(), src.view());
        assert_eq!(dst.row(2), &[0.0; 6]);
        assert_eq!(dst.row(3)[2], 1.0);
        assert_eq!(dst.row(4)[2], 1.0);
        assert_eq!(dst.row(5), &[0.0; 6]);
    }
}
