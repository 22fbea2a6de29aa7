//! Contiguous and strided spans inside a haloed block.
//!
//! An [`EdgeRegion`] is the in-process counterpart of a vector datatype:
//! `count` cells starting at `offset`, `stride` apart. Row edges are
//! contiguous (`stride == 1`); column edges step by the haloed row width
//! (`columns + 2`), which is why haloed blocks keep a plain row-major
//! layout.
//!
//! ```text
//!   col:  0   1  ...  C  C+1          R = rows, C = columns
//! row 0   .   H  ...  H   .           H = halo row (Up, Halo)
//! row 1   H   B  ...  B   H           B = boundary row/column
//!  ...    H   B       B   H
//! row R   H   B  ...  B   H
//! row R+1 .   H  ...  H   .
//! ```
//!
//! The four halo corners are never addressed: the 5-point stencil does
//! not read them.

use calor_core::{BlockShape, Direction};

use crate::error::GridError;

/// Which ring of a haloed block an edge region addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionRole {
    /// The outermost ring of interior cells: the source of an outbound
    /// transfer.
    Boundary,
    /// The halo ring: the destination of an inbound transfer.
    Halo,
}

/// `count` cells at `offset, offset + stride, ...` in a flat buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeRegion {
    /// Flat index of the first cell.
    pub offset: usize,
    /// Number of cells.
    pub count: usize,
    /// Distance between consecutive cells.
    pub stride: usize,
}

impl EdgeRegion {
    /// The region for edge `dir` of a haloed block with interior `shape`.
    pub fn for_edge(shape: BlockShape, dir: Direction, role: RegionRole) -> Self {
        let s = shape.haloed_columns();
        let (rows, cols) = (shape.rows, shape.columns);
        match (dir, role) {
            (Direction::Up, RegionRole::Boundary) => Self::row(s + 1, cols),
            (Direction::Down, RegionRole::Boundary) => Self::row(rows * s + 1, cols),
            (Direction::Up, RegionRole::Halo) => Self::row(1, cols),
            (Direction::Down, RegionRole::Halo) => Self::row((rows + 1) * s + 1, cols),
            (Direction::Left, RegionRole::Boundary) => Self::column(s + 1, rows, s),
            (Direction::Right, RegionRole::Boundary) => Self::column(s + cols, rows, s),
            (Direction::Left, RegionRole::Halo) => Self::column(s, rows, s),
            (Direction::Right, RegionRole::Halo) => Self::column(s + cols + 1, rows, s),
        }
    }

    fn row(offset: usize, count: usize) -> Self {
        Self {
            offset,
            count,
            stride: 1,
        }
    }

    fn column(offset: usize, count: usize, stride: usize) -> Self {
        Self {
            offset,
            count,
            stride,
        }
    }

    /// Whether the cells are adjacent in memory.
    pub fn is_contiguous(&self) -> bool {
        self.stride == 1 || self.count <= 1
    }

    /// Flat indices covered by the region.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).map(move |k| self.offset + k * self.stride)
    }

    /// Whether every index lies inside a buffer of length `len`.
    pub fn fits(&self, len: usize) -> bool {
        self.count == 0 || self.offset + (self.count - 1) * self.stride < len
    }

    /// Append the region's values from `src` to `out`.
    pub fn pack_into(&self, src: &[f32], out: &mut Vec<f32>) -> Result<(), GridError> {
        self.check(src.len())?;
        out.reserve(self.count);
        if self.is_contiguous() {
            out.extend_from_slice(&src[self.offset..self.offset + self.count]);
        } else {
            out.extend(self.indices().map(|i| src[i]));
        }
        Ok(())
    }

    /// The region's values from `src` as a new buffer.
    pub fn pack(&self, src: &[f32]) -> Result<Vec<f32>, GridError> {
        let mut out = Vec::with_capacity(self.count);
        self.pack_into(src, &mut out)?;
        Ok(out)
    }

    /// Write `values` into the region of `dst`.
    pub fn unpack(&self, dst: &mut [f32], values: &[f32]) -> Result<(), GridError> {
        self.check(dst.len())?;
        if values.len() != self.count {
            return Err(GridError::ShapeMismatch {
                expected: self.count,
                got: values.len(),
            });
        }
        if self.is_contiguous() {
            dst[self.offset..self.offset + self.count].copy_from_slice(values);
        } else {
            for (i, &v) in self.indices().zip(values) {
                dst[i] = v;
            }
        }
        Ok(())
    }

    fn check(&self, len: usize) -> Result<(), GridError> {
        if self.fits(len) {
            Ok(())
        } else {
            Err(GridError::ShapeMismatch {
                expected: self.offset + self.count.saturating_sub(1) * self.stride + 1,
                got: len,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Cell value encodes its position: `r * 100 + c`.
    fn numbered(shape: BlockShape) -> Vec<f32> {
        let s = shape.haloed_columns();
        (0..shape.haloed_rows() * s)
            .map(|i| ((i / s) * 100 + i % s) as f32)
            .collect()
    }

    #[test]
    fn up_boundary_is_first_interior_row() {
        let shape = BlockShape::new(3, 4);
        let r = EdgeRegion::for_edge(shape, Direction::Up, RegionRole::Boundary);
        assert_eq!(r.pack(&numbered(shape)).unwrap(), vec![101.0, 102.0, 103.0, 104.0]);
    }

    #[test]
    fn down_halo_is_last_ring_row() {
        let shape = BlockShape::new(3, 4);
        let r = EdgeRegion::for_edge(shape, Direction::Down, RegionRole::Halo);
        assert_eq!(r.pack(&numbered(shape)).unwrap(), vec![401.0, 402.0, 403.0, 404.0]);
    }

    #[test]
    fn right_boundary_is_strided_last_interior_column() {
        let shape = BlockShape::new(3, 4);
        let r = EdgeRegion::for_edge(shape, Direction::Right, RegionRole::Boundary);
        assert_eq!(r.stride, 6);
        assert!(!r.is_contiguous());
        assert_eq!(r.pack(&numbered(shape)).unwrap(), vec![104.0, 204.0, 304.0]);
    }

    #[test]
    fn left_halo_is_column_zero_without_corners() {
        let shape = BlockShape::new(3, 4);
        let r = EdgeRegion::for_edge(shape, Direction::Left, RegionRole::Halo);
        assert_eq!(r.pack(&numbered(shape)).unwrap(), vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn unpack_writes_only_region_cells() {
        let shape = BlockShape::new(2, 2);
        let mut buf = vec![0.0; 16];
        let r = EdgeRegion::for_edge(shape, Direction::Right, RegionRole::Halo);
        r.unpack(&mut buf, &[1.0, 2.0]).unwrap();
        assert_eq!(buf.iter().filter(|&&v| v != 0.0).count(), 2);
        assert_eq!(buf[4 + 3], 1.0);
        assert_eq!(buf[8 + 3], 2.0);
    }

    #[test]
    fn unpack_rejects_wrong_length() {
        let shape = BlockShape::new(2, 2);
        let mut buf = vec![0.0; 16];
        let r = EdgeRegion::for_edge(shape, Direction::Up, RegionRole::Halo);
        assert_eq!(
            r.unpack(&mut buf, &[1.0]),
            Err(GridError::ShapeMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn pack_rejects_short_buffer() {
        let shape = BlockShape::new(2, 2);
        let r = EdgeRegion::for_edge(shape, Direction::Down, RegionRole::Halo);
        assert!(r.pack(&[0.0; 8]).is_err());
    }

    proptest! {
        #[test]
        fn boundary_and_halo_regions_are_disjoint_and_in_bounds(
            rows in 1usize..12,
            cols in 1usize..12,
        ) {
            let shape = BlockShape::new(rows, cols);
            let len = shape.haloed_rows() * shape.haloed_columns();
            let mut seen_halo = std::collections::HashSet::new();
            for dir in Direction::ALL {
                let b = EdgeRegion::for_edge(shape, dir, RegionRole::Boundary);
                let h = EdgeRegion::for_edge(shape, dir, RegionRole::Halo);
                prop_assert!(b.fits(len));
                prop_assert!(h.fits(len));
                let expected = if dir.is_row_edge() { cols } else { rows };
                prop_assert_eq!(b.count, expected);
                prop_assert_eq!(h.count, expected);
                for i in h.indices() {
                    // Halo cells belong to exactly one edge and are never interior.
                    prop_assert!(seen_halo.insert(i));
                    let (r, c) = (i / shape.haloed_columns(), i % shape.haloed_columns());
                    prop_assert!(r == 0 || r == rows + 1 || c == 0 || c == cols + 1);
                }
                for i in b.indices() {
                    let (r, c) = (i / shape.haloed_columns(), i % shape.haloed_columns());
                    prop_assert!((1..=rows).contains(&r) && (1..=cols).contains(&c));
                }
            }
        }
    }
}
