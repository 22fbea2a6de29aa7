//! Double-buffered ping-pong pair of haloed blocks.
//!
//! [`HaloBuffer`] owns two [`HaloedBlock`]s that alternate between the
//! "current" role (read by the stencil, source and target of halo
//! transfers) and the "next" role (written by the stencil). The lifecycle
//! per step is:
//!
//! 1. Halo transfers read and fill `current`
//! 2. Stencil passes read `current` and write `next` via [`HaloBuffer::split`]
//! 3. [`HaloBuffer::flip`] swaps the roles
//!
//! ```text
//! blocks[0]  ←─── current (even flips) / next (odd flips)
//! blocks[1]  ←─── next (even flips) / current (odd flips)
//! ```

use calor_core::BlockShape;

use crate::block::HaloedBlock;
use crate::error::GridError;

/// The current/next pair for one worker.
#[derive(Clone, Debug)]
pub struct HaloBuffer {
    blocks: [HaloedBlock; 2],
    /// Index of the current block (0 or 1).
    current: usize,
    /// Number of flips since construction.
    flips: u64,
}

impl HaloBuffer {
    /// Allocate both blocks, zero-filled.
    pub fn new(shape: BlockShape) -> Result<Self, GridError> {
        Ok(Self {
            blocks: [HaloedBlock::new(shape)?, HaloedBlock::new(shape)?],
            current: 0,
            flips: 0,
        })
    }

    /// Interior shape shared by both blocks.
    pub fn shape(&self) -> BlockShape {
        self.blocks[0].shape()
    }

    /// The block read during this step.
    pub fn current(&self) -> &HaloedBlock {
        &self.blocks[self.current]
    }

    /// The block read during this step, mutably (halo receives land here).
    pub fn current_mut(&mut self) -> &mut HaloedBlock {
        &mut self.blocks[self.current]
    }

    /// The block written during this step.
    pub fn next(&self) -> &HaloedBlock {
        &self.blocks[1 - self.current]
    }

    /// Borrow `(current, next)` at once: the shape every stencil pass takes.
    pub fn split(&mut self) -> (&HaloedBlock, &mut HaloedBlock) {
        let (a, b) = self.blocks.split_at_mut(1);
        if self.current == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        }
    }

    /// Copy `current` over `next`, halo included.
    ///
    /// Used once after scatter so cells the stencil never writes (the
    /// domain boundary) hold their initial value in both blocks.
    pub fn sync_next(&mut self) -> Result<(), GridError> {
        let (cur, next) = self.split();
        next.copy_from(cur)
    }

    /// Swap the current and next roles.
    pub fn flip(&mut self) {
        self.current = 1 - self.current;
        self.flips += 1;
    }

    /// Index (0 or 1) of the current block.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of flips performed.
    pub fn flips(&self) -> u64 {
        self.flips
    }

    /// Consume the pair, keeping only the current block.
    pub fn into_current(self) -> HaloedBlock {
        let [a, b] = self.blocks;
        if self.current == 0 {
            a
        } else {
            b
        }
    }
}
