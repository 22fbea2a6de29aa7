//! Core types for the Calor distributed heat-diffusion engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate in the workspace: worker
//! ranks, edge directions, block shapes, the physical parameters of the
//! explicit scheme, and the partition handshake exchanged once per run.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod assignment;
pub mod error;
pub mod geometry;
pub mod id;
pub mod params;

pub use assignment::{PartitionAssignment, HANDSHAKE_LEN, NO_NEIGHBOR};
pub use error::WireError;
pub use geometry::{BlockGrid, BlockShape, Direction, GridDims, NeighborSet};
pub use id::{Rank, StepId};
pub use params::Diffusivity;
