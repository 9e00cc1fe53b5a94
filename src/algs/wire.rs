//! Byte-level views of grid rows and reduction payloads for the transport.
//!
//! Rows are shipped as their in-memory representation: both ends of a
//! message run the same binary on the same architecture, so no endianness
//! conversion is applied.

use crate::heat_error::HeatError;
use bytemuck::Pod;

/// Tag for rows travelling toward lower ranks.
pub const HALO_UP_TAG: u16 = 0x4801;
/// Tag for rows travelling toward higher ranks.
pub const HALO_DOWN_TAG: u16 = 0x4802;
/// Tag for gather/fan-out traffic of the default all-reduce.
pub const REDUCE_TAG: u16 = 0x5201;

#[inline]
pub fn as_bytes<T: Pod>(v: &[T]) -> &[u8] {
    bytemuck::cast_slice(v)
}

#[inline]
pub fn as_bytes_mut<T: Pod>(v: &mut [T]) -> &mut [u8] {
    bytemuck::cast_slice_mut(v)
}

/// Reject a message whose size differs from the posted receive buffer.
pub fn expect_exact_len(actual: usize, expected: usize) -> Result<(), HeatError> {
    if actual == expected {
        Ok(())
    } else {
        Err(HeatError::MessageLength { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_bytes_have_cell_width() {
        let row = [1.0f32, 2.0, 3.0];
        assert_eq!(as_bytes(&row).len(), 12);
        let wide = [0.5f64; 4];
        assert_eq!(as_bytes(&wide).len(), 32);
    }

    #[test]
    fn writes_through_byte_view() {
        let src = [7.25f32, -1.0];
        let mut dst = [0.0f32; 2];
        as_bytes_mut(&mut dst).copy_from_slice(as_bytes(&src));
        assert_eq!(dst, src);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        assert!(expect_exact_len(8, 8).is_ok());
        assert_eq!(
            expect_exact_len(4, 8),
            Err(HeatError::MessageLength { expected: 8, actual: 4 })
        );
    }
}
