//! Grid storage for Calor workers.
//!
//! Every buffer in the workspace is a single contiguous, row-major
//! allocation wrapped in a shape-aware type:
//!
//! - [`Grid2`]: the owned 2D container all other types build on
//! - [`GlobalField`]: the full `NX × NY` field held by the coordinator
//! - [`HaloedBlock`]: one worker's block plus its one-cell halo ring
//! - [`HaloBuffer`]: the current/next ping-pong pair of haloed blocks
//! - [`EdgeRegion`]: a contiguous or strided span inside a haloed block,
//!   used to address halo transfers

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod error;
pub mod field;
pub mod grid;
pub mod pingpong;
pub mod region;

pub use block::HaloedBlock;
pub use error::GridError;
pub use field::GlobalField;
pub use grid::Grid2;
pub use pingpong::HaloBuffer;
pub use region::{EdgeRegion, RegionRole};
