//! Domain decomposition for Calor.
//!
//! - [`Partition`]: chooses the `xdim × ydim` block grid for a worker
//!   count and hands every rank its [`PartitionAssignment`]
//! - [`validate_worker_count`]: rejects worker counts no partition can
//!   serve (prime, indivisible, empty blocks)
//! - [`Distributor`]: the mapping between the global field and per-rank
//!   blocks used by scatter and gather
//!
//! [`PartitionAssignment`]: calor_core::PartitionAssignment

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod distributor;
pub mod error;
pub mod partition;
pub mod validate;

pub use distributor::Distributor;
pub use error::DecompError;
pub use partition::{factor_pair, Partition};
pub use validate::{is_prime, validate_worker_count};
