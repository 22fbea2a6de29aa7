//! Owned row-major 2D container.

use std::ops::{Index, IndexMut};

use crate::error::GridError;

/// A `rows × cols` grid of `f32` in one contiguous row-major buffer.
///
/// Cell `(r, c)` lives at `r * cols + c`. Indexing with `grid[(r, c)]`
/// is bounds-checked per axis: a column past the end of a row panics
/// instead of silently reading the next row.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid2 {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Grid2 {
    /// Allocate a zero-filled grid.
    ///
    /// Returns [`GridError::AllocationFailed`] if the buffer cannot be
    /// reserved (including when `rows * cols` overflows).
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, GridError> {
        let cells = rows
            .checked_mul(cols)
            .ok_or(GridError::AllocationFailed { cells: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(cells)
            .map_err(|_| GridError::AllocationFailed { cells })?;
        data.resize(cells, 0.0);
        Ok(Self { rows, cols, data })
    }

    /// Wrap an existing row-major buffer.
    ///
    /// An overflowing `rows * cols` is reported as a mismatch against
    /// `usize::MAX`, which no buffer can match.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, GridError> {
        let expected = rows.checked_mul(cols).unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns; also the row stride.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat index of `(r, c)`, or `None` if out of range.
    pub fn offset(&self, r: usize, c: usize) -> Option<usize> {
        (r < self.rows && c < self.cols).then(|| r * self.cols + c)
    }

    /// Read a cell, or `None` if out of range.
    pub fn get(&self, r: usize, c: usize) -> Option<f32> {
        self.offset(r, c).map(|i| self.data[i])
    }

    /// Row `r` as a slice.
    pub fn row(&self, r: usize) -> &[f32] {
        let start = r * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Row `r` as a mutable slice.
    pub fn row_mut(&mut self, r: usize) -> &mut [f32] {
        let start = r * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// The whole buffer, row-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The whole buffer, row-major, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Overwrite this grid with the contents of a same-shaped grid.
    pub fn copy_from(&mut self, other: &Grid2) -> Result<(), GridError> {
        if other.rows != self.rows || other.cols != self.cols {
            return Err(GridError::ShapeMismatch {
                expected: self.len(),
                got: other.len(),
            });
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Consume the grid, returning its buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl Index<(usize, usize)> for Grid2 {
    type Output = f32;

    fn index(&self, (r, c): (usize, usize)) -> &f32 {
        assert!(
            r < self.rows && c < self.cols,
            "cell ({r}, {c}) out of bounds for {}x{} grid",
            self.rows,
            self.cols,
        );
        &self.data[r * self.cols + c]
    }
}

impl IndexMut<(usize, usize)> for Grid2 {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f32 {
        assert!(
            r < self.rows && c < self.cols,
            "cell ({r}, {c}) out of bounds for {}x{} grid",
            self.rows,
            self.cols,
        );
        &mut self.data[r * self.cols + c]
    }
}
