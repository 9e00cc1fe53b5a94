//! Grid storage and non-owning 2D views.
//!
//! A [`GridBuffer`] owns a flat, row-major `Vec<T>` of `n * n` cells. The
//! driver keeps ownership of both buffers for the whole run and lends
//! [`GridView`] / [`GridViewMut`] handles to the stencil and halo code for
//! the duration of a single call. Cell `(row, col)` lives at offset
//! `row * n + col`.
//!
//! Indexing is not checked beyond the slice bounds check: an out-of-range
//! `(row, col)` is a programming error and panics.

pub mod cell;

pub use cell::Cell;

use std::ops::{Index, IndexMut};

/// Owned square grid, zero-filled on allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct GridBuffer<T> {
    n: usize,
    data: Vec<T>,
}

impl<T: Cell> GridBuffer<T> {
    /// Allocate an `n × n` grid with every cell set to zero.
    pub fn new(n: usize) -> Self {
        GridBuffer {
            n,
            data: vec![T::zero(); n * n],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Panics
    /// Panics if `data.len() != n * n`.
    pub fn from_vec(n: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), n * n, "buffer length must be n * n");
        GridBuffer { n, data }
    }

    /// Side length.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Borrow a single row.
    #[inline]
    pub fn row(&self, r: usize) -> &[T] {
        &self.data[r * self.n..(r + 1) * self.n]
    }

    /// Read-only view over the whole grid.
    #[inline]
    pub fn view(&self) -> GridView<'_, T> {
        GridView {
            n: self.n,
            data: &self.data,
        }
    }

    /// Mutable view over the whole grid.
    #[inline]
    pub fn view_mut(&mut self) -> GridViewMut<'_, T> {
        GridViewMut {
            n: self.n,
            data: &mut self.data,
        }
    }
}

/// Read-only `(row, col)` view over a flat buffer.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a, T> {
    n: usize,
    data: &'a [T],
}

impl<'a, T: Cell> GridView<'a, T> {
    /// View an external slice as an `n × n` grid.
    ///
    /// # Panics
    /// Panics if `data.len() != n * n`.
    pub fn new(n: usize, data: &'a [T]) -> Self {
        assert_eq!(data.len(), n * n, "view length must be n * n");
        GridView { n, data }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> T {
        self.data[r * self.n + c]
    }

    #[inline]
    pub fn row(&self, r: usize) -> &'a [T] {
        &self.data[r * self.n..(r + 1) * self.n]
    }
}

impl<T> Index<(usize, usize)> for GridView<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &T {
        &self.data[r * self.n + c]
    }
}

/// Mutable `(row, col)` view over a flat buffer.
#[derive(Debug)]
pub struct GridViewMut<'a, T> {
    n: usize,
    data: &'a mut [T],
}

impl<'a, T: Cell> GridViewMut<'a, T> {
    /// View an external mutable slice as an `n × n` grid.
    ///
    /// # Panics
    /// Panics if `data.len() != n * n`.
    pub fn new(n: usize, data: &'a mut [T]) -> Self {
        assert_eq!(data.len(), n * n, "view length must be n * n");
        GridViewMut { n, data }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> T {
        self.data[r * self.n + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, v: T) {
        self.data[r * self.n + c] = v;
    }

    #[inline]
    pub fn row(&self, r: usize) -> &[T] {
        &self.data[r * self.n..(r + 1) * self.n]
    }

    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        &mut self.data[r * self.n..(r + 1) * self.n]
    }
}

impl<T> Index<(usize, usize)> for GridViewMut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &T {
        &self.data[r * self.n + c]
    }
}

impl<T> IndexMut<(usize, usize)> for GridViewMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        &mut self.data[r * self.n + c]
    }
}
