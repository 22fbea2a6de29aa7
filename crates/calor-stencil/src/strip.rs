//! Geometry of the exterior ring.
//!
//! The exterior of a block is the outermost ring of interior cells:
//! local row `1`, row `rows`, column `1`, and column `columns`. It is
//! covered by four strips that never overlap:
//!
//! ```text
//!        c_lo ........... c_hi
//!   row 1    F F F F F F F F        F = FirstRow, L = LastRow
//!   row 2    A . . . . . . B        A = FirstColumn, B = LastColumn
//!    ...     A . interior  B
//!   row R-1  A . . . . . . B
//!   row R    L L L L L L L L
//! ```
//!
//! Cells that sit on the domain boundary are never updated, which gives
//! a fixed (Dirichlet) boundary without writing to it:
//!
//! - a row strip on a domain edge (`up`/`down` is `None`) is skipped,
//! - a column strip on a domain edge (`left`/`right` is `None`) is skipped,
//! - a row strip loses its first/last cell where the block touches a left
//!   or right domain edge.

use std::ops::RangeInclusive;

use calor_core::{BlockShape, NeighborSet};

/// One of the four exterior sub-passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExteriorStrip {
    /// Local row 1.
    FirstRow,
    /// Local row `rows`.
    LastRow,
    /// Local column 1, rows `2..=rows-1`.
    FirstColumn,
    /// Local column `columns`, rows `2..=rows-1`.
    LastColumn,
}

/// The cells a strip updates: a fixed row (or column) and an inclusive
/// range along the other axis, in haloed local coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StripSpan {
    /// Cells `(row, c)` for `c` in `columns`.
    Row {
        /// Haloed row index.
        row: usize,
        /// Haloed column range.
        columns: RangeInclusive<usize>,
    },
    /// Cells `(r, column)` for `r` in `rows`.
    Column {
        /// Haloed column index.
        column: usize,
        /// Haloed row range.
        rows: RangeInclusive<usize>,
    },
}

impl StripSpan {
    /// Number of cells in the span.
    pub fn len(&self) -> usize {
        let r = match self {
            Self::Row { columns, .. } => columns,
            Self::Column { rows, .. } => rows,
        };
        r.clone().count()
    }

    /// Whether the span has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every `(row, column)` the span covers.
    pub fn cells(&self) -> Vec<(usize, usize)> {
        match self {
            Self::Row { row, columns } => columns.clone().map(|c| (*row, c)).collect(),
            Self::Column { column, rows } => rows.clone().map(|r| (r, *column)).collect(),
        }
    }
}

impl ExteriorStrip {
    /// All strips in execution order.
    pub const ALL: [ExteriorStrip; 4] = [
        ExteriorStrip::FirstRow,
        ExteriorStrip::LastRow,
        ExteriorStrip::FirstColumn,
        ExteriorStrip::LastColumn,
    ];

    /// Cells this strip updates for a block of `shape` with `neighbors`,
    /// or `None` if the strip lies on the domain boundary (or is empty).
    pub fn span(self, shape: BlockShape, neighbors: &NeighborSet) -> Option<StripSpan> {
        let (rows, cols) = (shape.rows, shape.columns);
        if shape.is_empty() {
            return None;
        }
        let c_lo = if neighbors.left.is_some() { 1 } else { 2 };
        let c_hi = if neighbors.right.is_some() { cols } else { cols - 1 };

        let span = match self {
            // With a single row, row 1 is also row `rows`: it needs both
            // vertical neighbors to be off the domain boundary.
            Self::FirstRow if neighbors.up.is_some() && (rows > 1 || neighbors.down.is_some()) => {
                StripSpan::Row {
                    row: 1,
                    columns: c_lo..=c_hi,
                }
            }
            Self::LastRow if neighbors.down.is_some() && rows > 1 => StripSpan::Row {
                row: rows,
                columns: c_lo..=c_hi,
            },
            Self::FirstColumn
                if neighbors.left.is_some() && (cols > 1 || neighbors.right.is_some()) =>
            {
                StripSpan::Column {
                    column: 1,
                    rows: 2..=rows - 1,
                }
            }
            Self::LastColumn if neighbors.right.is_some() && cols > 1 => StripSpan::Column {
                column: cols,
                rows: 2..=rows - 1,
            },
            _ => return None,
        };
        (!span.is_empty()).then_some(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calor_core::Rank;

    fn all_neighbors() -> NeighborSet {
        NeighborSet {
            left: Some(Rank(1)),
            right: Some(Rank(2)),
            up: Some(Rank(3)),
            down: Some(Rank(4)),
        }
    }

    #[test]
    fn surrounded_block_uses_full_spans() {
        let shape = BlockShape::new(4, 5);
        let n = all_neighbors();
        assert_eq!(
            ExteriorStrip::FirstRow.span(shape, &n),
            Some(StripSpan::Row {
                row: 1,
                columns: 1..=5
            })
        );
        assert_eq!(
            ExteriorStrip::LastColumn.span(shape, &n),
            Some(StripSpan::Column {
                column: 5,
                rows: 2..=3
            })
        );
    }

    #[test]
    fn domain_edges_narrow_row_strips_and_drop_boundary_strips() {
        let shape = BlockShape::new(4, 5);
        let n = NeighborSet {
            left: None,
            right: Some(Rank(1)),
            up: None,
            down: Some(Rank(2)),
        };
        assert_eq!(ExteriorStrip::FirstRow.span(shape, &n), None);
        assert_eq!(ExteriorStrip::FirstColumn.span(shape, &n), None);
        assert_eq!(
            ExteriorStrip::LastRow.span(shape, &n),
            Some(StripSpan::Row {
                row: 4,
                columns: 2..=5
            })
        );
    }

    #[test]
    fn isolated_block_has_no_exterior() {
        let shape = BlockShape::new(6, 6);
        for strip in ExteriorStrip::ALL {
            assert_eq!(strip.span(shape, &NeighborSet::ISOLATED), None);
        }
    }

    #[test]
    fn single_row_block_between_neighbors() {
        let shape = BlockShape::new(1, 3);
        let n = all_neighbors();
        assert_eq!(
            ExteriorStrip::FirstRow.span(shape, &n),
            Some(StripSpan::Row {
                row: 1,
                columns: 1..=3
            })
        );
        assert_eq!(ExteriorStrip::LastRow.span(shape, &n), None);
        assert_eq!(ExteriorStrip::FirstColumn.span(shape, &n), None);
    }

    #[test]
    fn single_row_block_on_top_edge_is_frozen() {
        let shape = BlockShape::new(1, 3);
        let n = NeighborSet {
            up: None,
            ..all_neighbors()
        };
        for strip in ExteriorStrip::ALL {
            assert_eq!(strip.span(shape, &n), None);
        }
    }
}
