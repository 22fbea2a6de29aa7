//! Mapping between the global field and per-rank blocks.
//!
//! Rank `r` at block-grid position `(br, bc)` owns the `rows × columns`
//! sub-rectangle of the global field whose top-left cell is
//! `(br * rows, bc * columns)`. On the wire a block travels as exactly
//! those `rows * columns` values, row-major, with no halo.
//!
//! Only the `xdim*rows × ydim*columns` top-left corner is covered; gather
//! leaves any remainder rows and columns of the target field untouched.

use calor_core::{BlockGrid, BlockShape, GridDims, Rank};
use calor_grid::{GlobalField, GridError, HaloedBlock};

use crate::error::DecompError;
use crate::partition::Partition;

/// Block-to-field mapping for one partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Distributor {
    dims: GridDims,
    grid: BlockGrid,
    shape: BlockShape,
}

impl Distributor {
    /// Mapping for `partition`.
    pub fn new(partition: &Partition) -> Self {
        Self {
            dims: partition.dims(),
            grid: partition.grid(),
            shape: partition.shape(),
        }
    }

    /// Shape of every block.
    pub fn shape(&self) -> BlockShape {
        self.shape
    }

    /// Global `(x, y)` of `rank`'s first cell.
    pub fn origin(&self, rank: Rank) -> Result<(usize, usize), DecompError> {
        let (br, bc) = self
            .grid
            .position_of(rank)
            .ok_or(DecompError::RankOutOfRange {
                rank,
                workers: self.grid.workers(),
            })?;
        Ok(self.shape.origin(br, bc))
    }

    fn check_dims(&self, field: &GlobalField) -> Result<(), DecompError> {
        if field.dims() != self.dims {
            return Err(DecompError::FieldDims {
                expected: self.dims,
                got: field.dims(),
            });
        }
        Ok(())
    }

    /// Copy `rank`'s sub-rectangle out of `field` in wire layout.
    pub fn extract(&self, field: &GlobalField, rank: Rank) -> Result<Vec<f32>, DecompError> {
        self.check_dims(field)?;
        let (x0, y0) = self.origin(rank)?;
        let (rows, cols) = (self.shape.rows, self.shape.columns);
        let mut out = Vec::with_capacity(rows * cols);
        for x in x0..x0 + rows {
            out.extend_from_slice(&field.row(x)[y0..y0 + cols]);
        }
        Ok(out)
    }

    /// Write `rank`'s block (wire layout) back into `field`.
    pub fn store(&self, field: &mut GlobalField, rank: Rank, values: &[f32]) -> Result<(), DecompError> {
        self.check_dims(field)?;
        let (x0, y0) = self.origin(rank)?;
        let (rows, cols) = (self.shape.rows, self.shape.columns);
        if values.len() != rows * cols {
            return Err(GridError::ShapeMismatch {
                expected: rows * cols,
                got: values.len(),
            }
            .into());
        }
        for (r, src) in values.chunks_exact(cols.max(1)).enumerate().take(rows) {
            field.row_mut(x0 + r)[y0..y0 + cols].copy_from_slice(src);
        }
        Ok(())
    }

    /// Split `field` into one haloed block per rank, halo rings zeroed.
    pub fn scatter(&self, field: &GlobalField) -> Result<Vec<HaloedBlock>, DecompError> {
        (0..self.grid.workers())
            .map(|i| {
                let mut block = HaloedBlock::new(self.shape)?;
                block.load_interior(&self.extract(field, Rank(i as u32))?)?;
                Ok::<_, DecompError>(block)
            })
            .collect()
    }

    /// Copy every block's interior back into `field`, indexed by rank.
    pub fn gather(&self, blocks: &[HaloedBlock], field: &mut GlobalField) -> Result<(), DecompError> {
        for (i, block) in blocks.iter().enumerate() {
            self.store(field, Rank(i as u32), &block.interior_to_vec())?;
        }
        Ok(())
    }
}
