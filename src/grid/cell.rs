//! Cell: the scalar type stored in every grid cell.

use bytemuck::Pod;
use num_traits::Float;
use std::fmt::Debug;

/// Floating-point cell value that can be shipped over the wire as raw bytes.
///
/// `Pod` lets whole rows be reinterpreted as `&[u8]` for the transport,
/// `Float` supplies the arithmetic used by the stencil and seed.
pub trait Cell: Float + Pod + Default + Debug + Send + Sync + 'static {
    /// Convert an `f64` literal into the cell type (rounding for `f32`).
    fn lit(v: f64) -> Self;
    /// Widen to `f64` for accumulation.
    fn widen(self) -> f64;
}

impl Cell for f32 {
    #[inline]
    fn lit(v: f64) -> Self {
        v as f32
    }
    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }
}

impl Cell for f64 {
    #[inline]
    fn lit(v: f64) -> Self {
        v
    }
    #[inline]
    fn widen(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_round_trips_representable_values() {
        assert_eq!(<f32 as Cell>::lit(0.5), 0.5f32);
        assert_eq!(Cell::widen(0.25f32), 0.25);
    }

    #[test]
    fn f64_is_identity() {
        assert_eq!(<f64 as Cell>::lit(0.2), 0.2);
    }
}
