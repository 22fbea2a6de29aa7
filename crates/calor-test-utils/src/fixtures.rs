//! Deterministic initial fields.
//!
//! - [`parabolic`]: `x(nx-x-1) y(ny-y-1)`, peaked in the middle, zero on
//!   the boundary
//! - [`uniform`]: one value everywhere, boundary included
//! - [`ramp`]: the row-major index of each cell, unique per cell
//! - [`seeded`]: uniform random values from a seeded ChaCha8 stream

use calor_core::GridDims;
use calor_grid::{GlobalField, GridError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The product is formed in integers and rounded to `f32` once.
pub fn parabolic(dims: GridDims) -> Result<GlobalField, GridError> {
    let (nx, ny) = (dims.nx, dims.ny);
    GlobalField::from_fn(dims, |x, y| (x * (nx - x - 1) * y * (ny - y - 1)) as f32)
}

pub fn uniform(dims: GridDims, value: f32) -> Result<GlobalField, GridError> {
    GlobalField::from_fn(dims, |_, _| value)
}

/// Cell `(x, y)` holds `x * ny + y`, so a misplaced value points at the
/// cell it came from.
pub fn ramp(dims: GridDims) -> Result<GlobalField, GridError> {
    GlobalField::from_fn(dims, |x, y| (x * dims.ny + y) as f32)
}

/// Values in `[0, 100)`; the same seed always yields the same field.
pub fn seeded(dims: GridDims, seed: u64) -> Result<GlobalField, GridError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    GlobalField::from_fn(dims, |_, _| rng.random_range(0.0f32..100.0))
}
