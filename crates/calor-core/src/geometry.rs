//! Grid, block, and neighbor geometry.
//!
//! Conventions used throughout the workspace: the global field is indexed
//! `(x, y)` with `x` as the row index (`0..nx`) and `y` as the column
//! index (`0..ny`), stored row-major. "Up" is towards row 0, "left" is
//! towards column 0.

use smallvec::SmallVec;
use std::fmt;

use crate::id::Rank;

// ── Direction ───────────────────────────────────────────────────

/// One of the four edges of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Towards lower column indices.
    Left,
    /// Towards higher column indices.
    Right,
    /// Towards lower row indices.
    Up,
    /// Towards higher row indices.
    Down,
}

impl Direction {
    /// All four directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// The facing direction: what a neighbor calls the shared edge.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Whether the edge in this direction is a row of the block
    /// (contiguous in memory) rather than a column (strided).
    pub fn is_row_edge(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Dense index in `0..4`, matching the order of [`Direction::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Up => 2,
            Self::Down => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        };
        f.write_str(name)
    }
}

// ── GridDims ────────────────────────────────────────────────────

/// Dimensions of the global grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    /// Number of rows (the X extent).
    pub nx: usize,
    /// Number of columns (the Y extent).
    pub ny: usize,
}

impl GridDims {
    /// Create grid dimensions.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }

    /// Total number of cells, or `None` if `nx * ny` overflows.
    pub fn cell_count(&self) -> Option<usize> {
        self.nx.checked_mul(self.ny)
    }

    /// Whether the grid is taller along Y than along X.
    pub fn is_tall(&self) -> bool {
        self.ny > self.nx
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X= {}  Y= {}", self.nx, self.ny)
    }
}

// ── BlockGrid ───────────────────────────────────────────────────

/// Shape of the worker grid: `xdim` block rows by `ydim` block columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockGrid {
    /// Number of block rows.
    pub xdim: usize,
    /// Number of block columns.
    pub ydim: usize,
}

impl BlockGrid {
    /// Create a block grid.
    pub fn new(xdim: usize, ydim: usize) -> Self {
        Self { xdim, ydim }
    }

    /// Number of workers the grid holds.
    pub fn workers(&self) -> usize {
        self.xdim * self.ydim
    }

    /// Block-grid position `(row, column)` of a rank, or `None` if the
    /// rank is outside the grid.
    pub fn position_of(&self, rank: Rank) -> Option<(usize, usize)> {
        let i = rank.index();
        if self.ydim == 0 || i >= self.workers() {
            return None;
        }
        Some((i / self.ydim, i % self.ydim))
    }

    /// Rank at a block-grid position, or `None` if out of range.
    pub fn rank_at(&self, row: usize, col: usize) -> Option<Rank> {
        if row >= self.xdim || col >= self.ydim {
            return None;
        }
        Some(Rank((row * self.ydim + col) as u32))
    }

    /// Neighbors of a rank in the non-periodic Cartesian topology.
    ///
    /// Returns `None` if the rank is outside the grid.
    pub fn neighbors_of(&self, rank: Rank) -> Option<NeighborSet> {
        let (r, c) = self.position_of(rank)?;
        Some(NeighborSet {
            left: c.checked_sub(1).and_then(|c| self.rank_at(r, c)),
            right: self.rank_at(r, c + 1),
            up: r.checked_sub(1).and_then(|r| self.rank_at(r, c)),
            down: self.rank_at(r + 1, c),
        })
    }
}

impl fmt::Display for BlockGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.xdim, self.ydim)
    }
}

// ── BlockShape ──────────────────────────────────────────────────

/// Dimensions of one worker's block, excluding the halo ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockShape {
    /// Interior rows.
    pub rows: usize,
    /// Interior columns.
    pub columns: usize,
}

impl BlockShape {
    /// Create a block shape.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Block shape for `dims` split over `grid`.
    ///
    /// Uses truncating division: when `nx % xdim != 0` or
    /// `ny % ydim != 0`, the remainder rows/columns of the global grid
    /// belong to no block and are never simulated.
    pub fn for_grid(dims: GridDims, grid: BlockGrid) -> Self {
        Self {
            rows: dims.nx / grid.xdim.max(1),
            columns: dims.ny / grid.ydim.max(1),
        }
    }

    /// Number of interior cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Rows including the halo ring.
    pub fn haloed_rows(&self) -> usize {
        self.rows + 2
    }

    /// Columns including the halo ring; also the row stride of a
    /// haloed block.
    pub fn haloed_columns(&self) -> usize {
        self.columns + 2
    }

    /// Whether the block has no interior cells.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Global `(x, y)` of this block's first interior cell for the block
    /// at block-grid position `(block_row, block_col)`.
    pub fn origin(&self, block_row: usize, block_col: usize) -> (usize, usize) {
        (block_row * self.rows, block_col * self.columns)
    }
}

impl fmt::Display for BlockShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.rows, self.columns)
    }
}

// ── NeighborSet ─────────────────────────────────────────────────

/// The four neighbors of a block; `None` marks a domain edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NeighborSet {
    /// Neighbor towards lower columns.
    pub left: Option<Rank>,
    /// Neighbor towards higher columns.
    pub right: Option<Rank>,
    /// Neighbor towards lower rows.
    pub up: Option<Rank>,
    /// Neighbor towards higher rows.
    pub down: Option<Rank>,
}

impl NeighborSet {
    /// A block with no neighbors (the single-worker case).
    pub const ISOLATED: NeighborSet = NeighborSet {
        left: None,
        right: None,
        up: None,
        down: None,
    };

    /// The neighbor in `dir`.
    pub fn get(&self, dir: Direction) -> Option<Rank> {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    /// Whether `dir` is a domain edge.
    pub fn is_domain_edge(&self, dir: Direction) -> bool {
        self.get(dir).is_none()
    }

    /// Present neighbors in [`Direction::ALL`] order.
    pub fn present(&self) -> SmallVec<[(Direction, Rank); 4]> {
        Direction::ALL
            .iter()
            .filter_map(|&d| self.get(d).map(|r| (d, r)))
            .collect()
    }
}

impl fmt::Display for NeighborSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |n: Option<Rank>| n.map_or_else(|| "none".to_string(), |r| r.to_string());
        write!(
            f,
            "left:{}, right:{}, up:{}, down:{}",
            show(self.left),
            show(self.right),
            show(self.up),
            show(self.down),
        )
    }
}
