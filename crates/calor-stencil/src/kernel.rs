//! The five-point update and the interior/exterior passes.

use rayon::prelude::*;

use calor_core::{Diffusivity, NeighborSet};
use calor_grid::HaloedBlock;

use crate::strip::{ExteriorStrip, StripSpan};

/// The explicit update for one point.
///
/// Each opposing pair is summed in `f32`. The rest is evaluated in `f64`
/// and rounded to `f32` once, as in the C heat2D codes this reproduces.
///
/// Every code path (distributed passes and the serial reference) goes
/// through this function, so results agree bit for bit.
#[inline]
pub fn update_point(c: f32, up: f32, down: f32, left: f32, right: f32, d: Diffusivity) -> f32 {
    let c2 = 2.0 * f64::from(c);
    let along_x = f64::from(down + up) - c2;
    let along_y = f64::from(right + left) - c2;
    (f64::from(c) + f64::from(d.cx) * along_x + f64::from(d.cy) * along_y) as f32
}

/// Update cell `i` of a flat haloed buffer with row stride `s`.
#[inline]
fn update_at(src: &[f32], s: usize, i: usize, d: Diffusivity) -> f32 {
    update_point(src[i], src[i - s], src[i + s], src[i - 1], src[i + 1], d)
}

/// The heat stencil for a fixed pair of coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatStencil {
    diffusivity: Diffusivity,
}

impl HeatStencil {
    /// Create a stencil.
    pub fn new(diffusivity: Diffusivity) -> Self {
        Self { diffusivity }
    }

    /// Coefficients in use.
    pub fn diffusivity(&self) -> Diffusivity {
        self.diffusivity
    }

    /// Interior pass: local rows `2..=rows-1`, columns `2..=columns-1`.
    ///
    /// Reads only `cur`'s own data, never its halo ring, so it may run
    /// while transfers into that ring are in flight.
    pub fn interior(&self, cur: &HaloedBlock, next: &mut HaloedBlock) {
        let shape = cur.shape();
        debug_assert_eq!(shape, next.shape());
        if shape.rows < 3 || shape.columns < 3 {
            return;
        }
        let s = cur.stride();
        let d = self.diffusivity;
        let src = cur.as_slice();
        let cols = shape.columns;

        next.as_mut_slice()
            .par_chunks_mut(s)
            .enumerate()
            .skip(2)
            .take(shape.rows - 2)
            .for_each(|(r, out)| {
                let base = r * s;
                for c in 2..cols {
                    out[c] = update_at(src, s, base + c, d);
                }
            });
    }

    /// Exterior pass: the four strips next to the halo ring.
    ///
    /// Must run after every inbound halo of `cur` has arrived.
    pub fn exterior(&self, cur: &HaloedBlock, next: &mut HaloedBlock, neighbors: &NeighborSet) {
        for strip in ExteriorStrip::ALL {
            self.exterior_strip(cur, next, neighbors, strip);
        }
    }

    /// Run one exterior strip. A strip on the domain boundary is a no-op.
    pub fn exterior_strip(
        &self,
        cur: &HaloedBlock,
        next: &mut HaloedBlock,
        neighbors: &NeighborSet,
        strip: ExteriorStrip,
    ) {
        let Some(span) = strip.span(cur.shape(), neighbors) else {
            return;
        };
        let s = cur.stride();
        let d = self.diffusivity;
        let src = cur.as_slice();

        match span {
            StripSpan::Row { row, columns } => {
                let base = row * s;
                let lo = *columns.start();
                next.row_mut(row)[columns]
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(k, out)| *out = update_at(src, s, base + lo + k, d));
            }
            StripSpan::Column { column, rows } => {
                let first = *rows.start();
                next.as_mut_slice()
                    .par_chunks_mut(s)
                    .enumerate()
                    .skip(first)
                    .take(rows.count())
                    .for_each(|(r, out)| out[column] = update_at(src, s, r * s + column, d));
            }
        }
    }

    /// Interior followed by exterior: one full step of a block whose halo
    /// is already current.
    pub fn step(&self, cur: &HaloedBlock, next: &mut HaloedBlock, neighbors: &NeighborSet) {
        self.interior(cur, next);
        self.exterior(cur, next, neighbors);
    }
}
