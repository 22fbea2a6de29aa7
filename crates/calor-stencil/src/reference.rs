//! Serial whole-grid solver.
//!
//! Advances the full field with no decomposition and no halo. Uses the
//! same [`update_point`] as the distributed passes, so for a field whose
//! dimensions divide evenly over the block grid the two agree exactly.

use calor_core::Diffusivity;
use calor_grid::GlobalField;

use crate::kernel::update_point;

/// One step over every cell not on the global boundary.
///
/// `next` must have the same dimensions as `cur`; its boundary cells are
/// left untouched.
pub fn step(cur: &GlobalField, next: &mut GlobalField, d: Diffusivity) {
    let dims = cur.dims();
    debug_assert_eq!(dims, next.dims());
    if dims.nx < 3 || dims.ny < 3 {
        return;
    }
    for x in 1..dims.nx - 1 {
        let (above, row, below) = (cur.row(x - 1), cur.row(x), cur.row(x + 1));
        let out = next.row_mut(x);
        for y in 1..dims.ny - 1 {
            out[y] = update_point(row[y], above[y], below[y], row[y - 1], row[y + 1], d);
        }
    }
}

/// Advance `field` by `steps` explicit steps and return the result.
pub fn advance(field: &GlobalField, d: Diffusivity, steps: u64) -> GlobalField {
    let mut cur = field.clone();
    let mut next = field.clone();
    for _ in 0..steps {
        step(&cur, &mut next, d);
        std::mem::swap(&mut cur, &mut next);
    }
    cur
}
