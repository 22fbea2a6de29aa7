//! Message passing between Calor workers.
//!
//! Workers share no memory; they cooperate only through [`Envelope`]s
//! moved over a [`Communicator`]. On top of the point-to-point layer
//! this crate provides:
//!
//! - [`TransferDescriptor`]: a persistent, restartable description of one
//!   halo-edge transfer
//! - [`HaloExchangeEngine`]: the eight descriptors of one worker, started
//!   and completed once per step
//! - [`collective`]: the partition handshake, scatter, gather, and barrier
//!
//! # Liveness
//!
//! Every blocking receive polls a world-wide abort flag and, if a
//! liveness timeout is configured, fails with [`ExchangeError::Stalled`]
//! once it has waited that long. A transfer that never completes is
//! therefore always reported, never silently ignored.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collective;
pub mod communicator;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod halo;

pub use communicator::{world, AbortHandle, Communicator, DEFAULT_LIVENESS_TIMEOUT};
pub use descriptor::{DescriptorState, TransferDescriptor, TransferKind};
pub use envelope::{Envelope, Payload, Tag};
pub use error::ExchangeError;
pub use halo::{ExchangeStats, HaloExchangeEngine};
