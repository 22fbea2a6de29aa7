//! Decomposition error types.

use calor_core::{BlockGrid, GridDims, Rank};
use calor_grid::GridError;

/// Errors from partitioning and block mapping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecompError {
    /// A run needs at least one worker.
    #[error("worker count must be at least 1")]
    NoWorkers,
    /// `NX * NY` does not fit in a `usize`.
    #[error("grid {dims} has more cells than can be addressed")]
    GridTooLarge {
        /// The rejected dimensions.
        dims: GridDims,
    },
    /// A prime worker count has no non-trivial factor pair.
    #[error("number of workers ({workers}) is prime; choose a composite count or 1")]
    PrimeWorkerCount {
        /// The rejected worker count.
        workers: usize,
    },
    /// The total cell count is not a multiple of the worker count.
    #[error("{cells} cells cannot be divided evenly over {workers} workers")]
    IndivisibleCells {
        /// `NX * NY`.
        cells: usize,
        /// The rejected worker count.
        workers: usize,
    },
    /// The block grid leaves blocks with no rows or no columns.
    #[error("grid {dims} split {grid} leaves empty blocks")]
    EmptyBlock {
        /// Global grid dimensions.
        dims: GridDims,
        /// The chosen block grid.
        grid: BlockGrid,
    },
    /// A rank outside `0..workers` was asked for.
    #[error("rank {rank} is outside 0..{workers}")]
    RankOutOfRange {
        /// The requested rank.
        rank: Rank,
        /// Worker count of the partition.
        workers: usize,
    },
    /// A global field does not match the partitioned grid.
    #[error("field is {got}, partition expects {expected}")]
    FieldDims {
        /// Dimensions the partition was built for.
        expected: GridDims,
        /// Dimensions of the supplied field.
        got: GridDims,
    },
    /// A field or block did not have the expected shape.
    #[error(transparent)]
    Grid(#[from] GridError),
}
