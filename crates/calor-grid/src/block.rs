//! One worker's block surrounded by a one-cell halo ring.

use std::ops::{Index, IndexMut};

use calor_core::{BlockShape, Direction};

use crate::error::GridError;
use crate::grid::Grid2;
use crate::region::{EdgeRegion, RegionRole};

/// A `(rows + 2) × (columns + 2)` buffer.
///
/// Local coordinates run over the haloed shape: interior cells are
/// `(1..=rows, 1..=columns)`, the halo ring is row `0`, row `rows + 1`,
/// column `0`, and column `columns + 1`. Halo cells hold copies of a
/// neighbor's boundary (or stay zero at domain edges) and are never
/// advanced by the stencil.
#[derive(Clone, Debug, PartialEq)]
pub struct HaloedBlock {
    shape: BlockShape,
    cells: Grid2,
}

impl HaloedBlock {
    /// Allocate a zero-filled block for `shape`.
    pub fn new(shape: BlockShape) -> Result<Self, GridError> {
        Ok(Self {
            shape,
            cells: Grid2::zeros(shape.haloed_rows(), shape.haloed_columns())?,
        })
    }

    /// Interior shape.
    pub fn shape(&self) -> BlockShape {
        self.shape
    }

    /// Row stride of the haloed buffer (`columns + 2`).
    pub fn stride(&self) -> usize {
        self.cells.cols()
    }

    /// The haloed buffer as a grid.
    pub fn grid(&self) -> &Grid2 {
        &self.cells
    }

    /// The flat haloed buffer.
    pub fn as_slice(&self) -> &[f32] {
        self.cells.as_slice()
    }

    /// The flat haloed buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        self.cells.as_mut_slice()
    }

    /// Haloed row `r` (including the two halo columns).
    pub fn row(&self, r: usize) -> &[f32] {
        self.cells.row(r)
    }

    /// Haloed row `r`, mutably.
    pub fn row_mut(&mut self, r: usize) -> &mut [f32] {
        self.cells.row_mut(r)
    }

    /// Copy a `rows × columns` row-major block into the interior.
    ///
    /// This is the receive side of the scatter wire layout; the halo ring
    /// is left untouched.
    pub fn load_interior(&mut self, values: &[f32]) -> Result<(), GridError> {
        let (rows, cols) = (self.shape.rows, self.shape.columns);
        if values.len() != rows * cols {
            return Err(GridError::ShapeMismatch {
                expected: rows * cols,
                got: values.len(),
            });
        }
        for (r, src) in values.chunks_exact(cols.max(1)).enumerate().take(rows) {
            self.cells.row_mut(r + 1)[1..=cols].copy_from_slice(src);
        }
        Ok(())
    }

    /// The interior as a `rows × columns` row-major buffer (the gather
    /// wire layout).
    pub fn interior_to_vec(&self) -> Vec<f32> {
        let (rows, cols) = (self.shape.rows, self.shape.columns);
        let mut out = Vec::with_capacity(rows * cols);
        for r in 1..=rows {
            out.extend_from_slice(&self.cells.row(r)[1..=cols]);
        }
        out
    }

    /// Values of the boundary ring on edge `dir` (what a neighbor in `dir`
    /// receives).
    pub fn boundary(&self, dir: Direction) -> Result<Vec<f32>, GridError> {
        EdgeRegion::for_edge(self.shape, dir, RegionRole::Boundary).pack(self.as_slice())
    }

    /// Values of the halo ring on edge `dir`.
    pub fn halo(&self, dir: Direction) -> Result<Vec<f32>, GridError> {
        EdgeRegion::for_edge(self.shape, dir, RegionRole::Halo).pack(self.as_slice())
    }

    /// Overwrite the halo ring on edge `dir`.
    pub fn set_halo(&mut self, dir: Direction, values: &[f32]) -> Result<(), GridError> {
        let shape = self.shape;
        EdgeRegion::for_edge(shape, dir, RegionRole::Halo).unpack(self.as_mut_slice(), values)
    }

    /// Overwrite this block with a same-shaped block, halo included.
    pub fn copy_from(&mut self, other: &HaloedBlock) -> Result<(), GridError> {
        self.cells.copy_from(&other.cells)
    }
}

impl Index<(usize, usize)> for HaloedBlock {
    type Output = f32;

    fn index(&self, rc: (usize, usize)) -> &f32 {
        &self.cells[rc]
    }
}

impl IndexMut<(usize, usize)> for HaloedBlock {
    fn index_mut(&mut self, rc: (usize, usize)) -> &mut f32 {
        &mut self.cells[rc]
    }
}
