//! Benchmark profiles for Calor.
//!
//! - [`reference_profile`]: 256x320 grid, 100 steps, 4 workers
//! - [`stress_profile`]: 1024x1024 grid, 20 steps, 16 workers
//! - [`haloed_block`]: a filled block with a populated halo ring

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use calor_core::{BlockShape, GridDims};
use calor_engine::SimConfig;
use calor_grid::{GridError, HaloedBlock};

/// The default run: 256x320 cells, 100 steps, 4 workers, 1 thread each.
pub fn reference_profile(threads: usize) -> SimConfig {
    SimConfig {
        threads,
        ..SimConfig::default()
    }
}

/// About 1M cells over a 4x4 block grid.
pub fn stress_profile(threads: usize) -> SimConfig {
    SimConfig {
        dims: GridDims::new(1024, 1024),
        steps: 20,
        workers: 16,
        threads,
        ..SimConfig::default()
    }
}

/// A block of `shape` where every cell, halo included, holds half its
/// flat index.
pub fn haloed_block(shape: BlockShape) -> Result<HaloedBlock, GridError> {
    let mut block = HaloedBlock::new(shape)?;
    for (i, v) in block.as_mut_slice().iter_mut().enumerate() {
        *v = i as f32 * 0.5;
    }
    Ok(block)
}
