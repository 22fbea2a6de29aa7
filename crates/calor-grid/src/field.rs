//! The full global field held by the coordinator.

use std::ops::{Index, IndexMut};

use calor_core::GridDims;

use crate::error::GridError;
use crate::grid::Grid2;

/// An `NX × NY` field, row-major with X as the row index.
///
/// Exists only before scatter and after gather; workers never see it.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalField {
    dims: GridDims,
    cells: Grid2,
}

impl GlobalField {
    /// A zero-filled field.
    pub fn zeros(dims: GridDims) -> Result<Self, GridError> {
        Ok(Self {
            dims,
            cells: Grid2::zeros(dims.nx, dims.ny)?,
        })
    }

    /// A field whose cell `(x, y)` is `f(x, y)`.
    pub fn from_fn(dims: GridDims, mut f: impl FnMut(usize, usize) -> f32) -> Result<Self, GridError> {
        let mut field = Self::zeros(dims)?;
        for x in 0..dims.nx {
            for (y, cell) in field.cells.row_mut(x).iter_mut().enumerate() {
                *cell = f(x, y);
            }
        }
        Ok(field)
    }

    /// Wrap a row-major buffer of `nx * ny` values.
    pub fn from_vec(dims: GridDims, data: Vec<f32>) -> Result<Self, GridError> {
        Ok(Self {
            dims,
            cells: Grid2::from_vec(dims.nx, dims.ny, data)?,
        })
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Read cell `(x, y)`, or `None` if out of range.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        self.cells.get(x, y)
    }

    /// Row `x` (all Y values for a fixed X).
    pub fn row(&self, x: usize) -> &[f32] {
        self.cells.row(x)
    }

    /// Row `x`, mutably.
    pub fn row_mut(&mut self, x: usize) -> &mut [f32] {
        self.cells.row_mut(x)
    }

    /// The whole field, row-major.
    pub fn as_slice(&self) -> &[f32] {
        self.cells.as_slice()
    }

    /// The underlying grid.
    pub fn grid(&self) -> &Grid2 {
        &self.cells
    }
}

impl Index<(usize, usize)> for GlobalField {
    type Output = f32;

    fn index(&self, xy: (usize, usize)) -> &f32 {
        &self.cells[xy]
    }
}

impl IndexMut<(usize, usize)> for GlobalField {
    fn index_mut(&mut self, xy: (usize, usize)) -> &mut f32 {
        &mut self.cells[xy]
    }
}
