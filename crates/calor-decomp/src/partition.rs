//! The block-grid partitioner.
//!
//! The factor pair is found by scanning downward from `⌊√W⌋ + 1` for the
//! first divisor of `W`. For a tall grid (`NY > NX`) the pair is swapped
//! when that leaves fewer block columns than block rows, so blocks follow
//! the longer axis.
//!
//! ```text
//! W = 6, NX = 256, NY = 320:   scan 3 → (3, 2) → tall, swap → (2, 3)
//!
//!   0 1 2        rank r sits at (r / ydim, r % ydim)
//!   3 4 5
//! ```

use calor_core::{BlockGrid, BlockShape, GridDims, PartitionAssignment, Rank};

use crate::error::DecompError;
use crate::validate::validate_worker_count;

/// The raw factor pair `(x, W / x)` where `x` is the largest divisor of
/// `workers` not above `⌊√workers⌋ + 1`.
///
/// `workers` must be at least 1; the result always has `x ≥ 1`.
pub fn factor_pair(workers: usize) -> (usize, usize) {
    let mut x = workers.isqrt() + 1;
    while x > 1 && workers % x != 0 {
        x -= 1;
    }
    (x, workers / x)
}

/// A partition of a global grid over a worker count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    dims: GridDims,
    grid: BlockGrid,
    shape: BlockShape,
}

impl Partition {
    /// Validate `workers` against `dims` and partition.
    pub fn new(dims: GridDims, workers: usize) -> Result<Self, DecompError> {
        validate_worker_count(dims, workers)?;
        let partition = Self::plan(dims, workers);
        if partition.shape.is_empty() {
            return Err(DecompError::EmptyBlock {
                dims,
                grid: partition.grid,
            });
        }
        Ok(partition)
    }

    /// Partition without validation.
    ///
    /// The caller is responsible for rejecting bad worker counts first;
    /// a prime count yields a `1 × W` or `W × 1` grid.
    pub fn plan(dims: GridDims, workers: usize) -> Self {
        let (mut xdim, mut ydim) = factor_pair(workers.max(1));
        if dims.is_tall() && ydim < xdim {
            std::mem::swap(&mut xdim, &mut ydim);
        }
        let grid = BlockGrid::new(xdim, ydim);
        Self {
            dims,
            grid,
            shape: BlockShape::for_grid(dims, grid),
        }
    }

    /// Global grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// The block grid.
    pub fn grid(&self) -> BlockGrid {
        self.grid
    }

    /// Shape shared by every block.
    pub fn shape(&self) -> BlockShape {
        self.shape
    }

    /// Number of workers.
    pub fn workers(&self) -> usize {
        self.grid.workers()
    }

    /// Rows and columns of the global grid covered by some block.
    ///
    /// Smaller than `dims` when the block grid does not divide each axis
    /// exactly; the remainder is never simulated.
    pub fn covered(&self) -> (usize, usize) {
        (
            self.grid.xdim * self.shape.rows,
            self.grid.ydim * self.shape.columns,
        )
    }

    /// The handshake for `rank`.
    pub fn assignment_for(&self, rank: Rank) -> Result<PartitionAssignment, DecompError> {
        let neighbors = self
            .grid
            .neighbors_of(rank)
            .ok_or(DecompError::RankOutOfRange {
                rank,
                workers: self.workers(),
            })?;
        Ok(PartitionAssignment {
            grid: self.grid,
            shape: self.shape,
            neighbors,
        })
    }

    /// Handshakes for every rank, indexed by rank.
    pub fn assignments(&self) -> Vec<PartitionAssignment> {
        (0..self.workers())
            .filter_map(|i| self.assignment_for(Rank(i as u32)).ok())
            .collect()
    }
}
