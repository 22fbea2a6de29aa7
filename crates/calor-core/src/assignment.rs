//! The partition handshake sent by the coordinator to every worker.
//!
//! On the wire the assignment is eight integers in the fixed order
//! `{xdim, ydim, columns, rows, left, right, up, down}`. Neighbor words
//! use [`NO_NEIGHBOR`] for a domain edge; the sentinel is negative and
//! therefore distinct from every valid rank.

use crate::error::WireError;
use crate::geometry::{BlockGrid, BlockShape, Direction, NeighborSet};
use crate::id::Rank;

/// Wire value of a missing neighbor.
pub const NO_NEIGHBOR: i64 = -1;

/// Number of words in the wire form.
pub const HANDSHAKE_LEN: usize = 8;

/// Everything a worker needs to know about its place in the partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionAssignment {
    /// Shape of the worker grid.
    pub grid: BlockGrid,
    /// Shape of this worker's block (excluding halo).
    pub shape: BlockShape,
    /// This worker's neighbors.
    pub neighbors: NeighborSet,
}

impl PartitionAssignment {
    /// Encode into the eight-word wire form.
    pub fn to_wire(&self) -> [i64; HANDSHAKE_LEN] {
        let n = |r: Option<Rank>| r.map_or(NO_NEIGHBOR, |r| i64::from(r.0));
        [
            self.grid.xdim as i64,
            self.grid.ydim as i64,
            self.shape.columns as i64,
            self.shape.rows as i64,
            n(self.neighbors.left),
            n(self.neighbors.right),
            n(self.neighbors.up),
            n(self.neighbors.down),
        ]
    }

    /// Decode the eight-word wire form.
    ///
    /// Dimensions must be positive and every neighbor word must be either
    /// [`NO_NEIGHBOR`] or a rank below `xdim * ydim`.
    pub fn from_wire(words: &[i64]) -> Result<Self, WireError> {
        if words.len() != HANDSHAKE_LEN {
            return Err(WireError::Arity {
                expected: HANDSHAKE_LEN,
                got: words.len(),
            });
        }
        let positive = |field: &'static str, value: i64| -> Result<usize, WireError> {
            if value <= 0 {
                return Err(WireError::NonPositive { field, value });
            }
            Ok(value as usize)
        };
        let xdim = positive("xdim", words[0])?;
        let ydim = positive("ydim", words[1])?;
        let columns = positive("columns", words[2])?;
        let rows = positive("rows", words[3])?;
        let workers = xdim
            .checked_mul(ydim)
            .ok_or(WireError::GridOverflow { xdim, ydim })?;

        let neighbor = |field: &'static str, value: i64| -> Result<Option<Rank>, WireError> {
            if value == NO_NEIGHBOR {
                return Ok(None);
            }
            let bad = WireError::BadNeighbor {
                field,
                value,
                workers,
            };
            let index = usize::try_from(value).map_err(|_| bad.clone())?;
            if index >= workers {
                return Err(bad);
            }
            let rank = u32::try_from(value).map_err(|_| bad)?;
            Ok(Some(Rank(rank)))
        };

        Ok(Self {
            grid: BlockGrid::new(xdim, ydim),
            shape: BlockShape::new(rows, columns),
            neighbors: NeighborSet {
                left: neighbor("left", words[4])?,
                right: neighbor("right", words[5])?,
                up: neighbor("up", words[6])?,
                down: neighbor("down", words[7])?,
            },
        })
    }

    /// The neighbor in `dir`.
    pub fn neighbor(&self, dir: Direction) -> Option<Rank> {
        self.neighbors.get(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PartitionAssignment {
        PartitionAssignment {
            grid: BlockGrid::new(2, 3),
            shape: BlockShape::new(128, 106),
            neighbors: NeighborSet {
                left: Some(Rank(3)),
                right: Some(Rank(5)),
                up: Some(Rank(1)),
                down: None,
            },
        }
    }

    #[test]
    fn wire_order_is_fixed() {
        assert_eq!(sample().to_wire(), [2, 3, 106, 128, 3, 5, 1, NO_NEIGHBOR]);
    }

    #[test]
    fn decode_restores_assignment() {
        let a = sample();
        assert_eq!(PartitionAssignment::from_wire(&a.to_wire()), Ok(a));
    }

    #[test]
    fn decode_rejects_wrong_arity() {
        let err = PartitionAssignment::from_wire(&[1, 1, 1]).unwrap_err();
        assert_eq!(
            err,
            WireError::Arity {
                expected: 8,
                got: 3
            }
        );
    }

    #[test]
    fn decode_rejects_zero_rows() {
        let err = PartitionAssignment::from_wire(&[1, 1, 4, 0, -1, -1, -1, -1]).unwrap_err();
        assert!(matches!(err, WireError::NonPositive { field: "rows", .. }));
    }

    #[test]
    fn decode_rejects_neighbor_outside_grid() {
        let err = PartitionAssignment::from_wire(&[2, 2, 4, 4, -1, 4, -1, 2]).unwrap_err();
        assert!(matches!(
            err,
            WireError::BadNeighbor {
                field: "right",
                value: 4,
                workers: 4
            }
        ));
    }

    #[test]
    fn decode_rejects_other_negative_sentinels() {
        let err = PartitionAssignment::from_wire(&[2, 2, 4, 4, -2, 1, -1, 2]).unwrap_err();
        assert!(matches!(err, WireError::BadNeighbor { field: "left", .. }));
    }

    #[test]
    fn decode_rejects_overflowing_block_grid() {
        let err =
            PartitionAssignment::from_wire(&[1 << 40, 1 << 40, 1, 1, -1, -1, -1, -1]).unwrap_err();
        assert_eq!(
            err,
            WireError::GridOverflow {
                xdim: 1 << 40,
                ydim: 1 << 40
            }
        );
    }

    #[test]
    fn decode_rejects_neighbor_beyond_rank_width() {
        // 2^33 workers make 2^32 an in-range index, but not a rank.
        let err =
            PartitionAssignment::from_wire(&[1 << 17, 1 << 16, 1, 1, 1 << 32, -1, -1, -1])
                .unwrap_err();
        assert!(matches!(
            err,
            WireError::BadNeighbor {
                field: "left",
                value: 4_294_967_296,
                ..
            }
        ));
    }
}
