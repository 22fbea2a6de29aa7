//! Calor: explicit 2D heat diffusion over a block-decomposed grid.
//!
//! The grid is split into equal rectangular blocks, one per worker. Each
//! worker keeps its block inside a one-cell halo ring, refreshes that ring
//! from its neighbors every step, and overlaps the transfer with the part
//! of the stencil that does not depend on it. The coordinator scatters the
//! initial field and gathers the result.
//!
//! # Quick start
//!
//! ```rust
//! use calor::prelude::*;
//!
//! let config = SimConfig {
//!     dims: GridDims::new(8, 6),
//!     steps: 3,
//!     workers: 4,
//!     ..SimConfig::default()
//! };
//! let initial = GlobalField::from_fn(config.dims, |x, y| (x * y) as f32).unwrap();
//!
//! let cluster = Cluster::new(config.clone()).unwrap();
//! let report = cluster.run(&initial).unwrap();
//!
//! // Same answer as the serial solver.
//! let serial = calor::stencil::reference::advance(&initial, config.diffusivity, config.steps);
//! assert_eq!(report.field, serial);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `calor-core` | ranks, directions, grid and block geometry, the handshake |
//! | [`grid`] | `calor-grid` | global field, haloed blocks, edge regions, ping-pong buffers |
//! | [`stencil`] | `calor-stencil` | five-point update, interior/exterior passes, serial solver |
//! | [`decomp`] | `calor-decomp` | partitioner, worker-count validation, scatter/gather mapping |
//! | [`comm`] | `calor-comm` | message world, transfer descriptors, halo exchange, collectives |
//! | [`engine`] | `calor-engine` | configuration, per-worker loop, cluster launcher |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Identifiers, geometry, and the assignment handshake (`calor-core`).
pub use calor_core as types;

/// Field and block storage (`calor-grid`).
///
/// [`grid::HaloedBlock`] is a worker's block plus its halo ring;
/// [`grid::HaloBuffer`] holds the two buffers a worker alternates between.
pub use calor_grid as grid;

/// The heat stencil (`calor-stencil`).
pub use calor_stencil as stencil;

/// Domain decomposition (`calor-decomp`).
///
/// [`decomp::Partition`] picks the block grid for a worker count;
/// [`decomp::Distributor`] maps blocks to and from the global field.
pub use calor_decomp as decomp;

/// Inter-worker messaging (`calor-comm`).
///
/// Most users never touch this directly. [`comm::HaloExchangeEngine`] owns
/// the eight persistent [`comm::TransferDescriptor`]s of one worker.
pub use calor_comm as comm;

/// Configuration and execution (`calor-engine`).
pub use calor_engine as engine;

/// Common imports.
///
/// ```rust
/// use calor::prelude::*;
/// ```
pub mod prelude {
    // Geometry
    pub use calor_core::{BlockGrid, BlockShape, Diffusivity, Direction, GridDims, Rank};

    // Storage
    pub use calor_grid::{GlobalField, HaloedBlock};

    // Stencil
    pub use calor_stencil::HeatStencil;

    // Decomposition
    pub use calor_decomp::Partition;

    // Engine
    pub use calor_engine::{Cluster, RunError, RunReport, SimConfig, WorkerMetrics};
}
