//! Initial temperature field.

use calor_core::GridDims;
use calor_grid::{GlobalField, GridError};

/// `u(ix, iy) = ix (nx-ix-1) iy (ny-iy-1)`.
///
/// Zero on the whole boundary and highest in the middle. The product is
/// taken in integers and rounded to `f32` once per cell.
pub fn initial_field(dims: GridDims) -> Result<GlobalField, GridError> {
    let (nx, ny) = (dims.nx, dims.ny);
    GlobalField::from_fn(dims, |ix, iy| {
        (ix * (nx - ix - 1) * iy * (ny - iy - 1)) as f32
    })
}
