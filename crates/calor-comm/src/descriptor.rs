//! Persistent halo transfer descriptors.
//!
//! A descriptor is built once, when a worker learns its block shape and
//! neighbors, and then cycles `Inactive → Active → Inactive` once per
//! step via [`start`](TransferDescriptor::start) and
//! [`wait`](TransferDescriptor::wait). It is never rebuilt.
//!
//! A descriptor with no peer (a domain edge) is a null transfer: starting
//! and waiting on it are no-ops that complete immediately.
//!
//! Sends are eager: `start` copies the boundary out of the block and
//! hands it to the fabric, so the block may be read again immediately.
//! Any delivery failure is held and reported by the matching `wait`.

use std::fmt;

use calor_core::{BlockShape, Direction, Rank, StepId};
use calor_grid::{EdgeRegion, HaloedBlock, RegionRole};

use crate::communicator::Communicator;
use crate::envelope::{Payload, Tag};
use crate::error::ExchangeError;

/// Direction of data flow relative to the owning worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferKind {
    /// Boundary out to a neighbor.
    Send,
    /// Halo in from a neighbor.
    Recv,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => f.write_str("send"),
            Self::Recv => f.write_str("recv"),
        }
    }
}

/// Lifecycle state of a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorState {
    /// Ready to start.
    Inactive,
    /// Started for `step` and not yet waited on.
    Active {
        /// The step the transfer belongs to.
        step: StepId,
    },
}

/// One of the eight halo-edge transfers of a worker.
#[derive(Debug)]
pub struct TransferDescriptor {
    direction: Direction,
    kind: TransferKind,
    peer: Option<Rank>,
    region: EdgeRegion,
    tag: Tag,
    state: DescriptorState,
    delivery: Option<ExchangeError>,
    starts: u64,
}

impl TransferDescriptor {
    /// Build the descriptor for edge `direction` of a block of `shape`.
    ///
    /// A send reads the boundary ring on that edge and is tagged with the
    /// direction of travel; a receive writes the halo ring on that edge
    /// and expects data travelling the opposite way.
    pub fn new(
        direction: Direction,
        kind: TransferKind,
        shape: BlockShape,
        peer: Option<Rank>,
    ) -> Self {
        let (role, tag) = match kind {
            TransferKind::Send => (RegionRole::Boundary, Tag::Halo(direction)),
            TransferKind::Recv => (RegionRole::Halo, Tag::Halo(direction.opposite())),
        };
        Self {
            direction,
            kind,
            peer,
            region: EdgeRegion::for_edge(shape, direction, role),
            tag,
            state: DescriptorState::Inactive,
            delivery: None,
            starts: 0,
        }
    }

    /// Edge of the block this descriptor serves.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Send or receive.
    pub fn kind(&self) -> TransferKind {
        self.kind
    }

    /// The neighbor on this edge, `None` at a domain edge.
    pub fn peer(&self) -> Option<Rank> {
        self.peer
    }

    /// Cells addressed in the haloed block.
    pub fn region(&self) -> EdgeRegion {
        self.region
    }

    /// Tag the transfer travels under.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DescriptorState {
        self.state
    }

    /// Whether this is a null transfer on a domain edge.
    pub fn is_null(&self) -> bool {
        self.peer.is_none()
    }

    /// Whether the descriptor has been started and not waited on.
    pub fn is_active(&self) -> bool {
        matches!(self.state, DescriptorState::Active { .. })
    }

    /// Number of times the descriptor has been started.
    pub fn starts(&self) -> u64 {
        self.starts
    }

    /// Begin the transfer for `step`. Never blocks.
    ///
    /// For a send, `block` is the source of the boundary values.
    pub fn start(
        &mut self,
        comm: &Communicator,
        block: &HaloedBlock,
        step: StepId,
    ) -> Result<(), ExchangeError> {
        if self.is_active() {
            return Err(ExchangeError::DescriptorBusy {
                direction: self.direction,
                kind: self.kind,
            });
        }
        self.state = DescriptorState::Active { step };
        self.starts += 1;
        if let (TransferKind::Send, Some(peer)) = (self.kind, self.peer) {
            let values = self.region.pack(block.as_slice())?;
            self.delivery = comm.send(peer, self.tag, step, Payload::Values(values)).err();
        }
        Ok(())
    }

    /// Complete a send. Never blocks.
    pub fn wait_send(&mut self) -> Result<usize, ExchangeError> {
        debug_assert_eq!(self.kind, TransferKind::Send);
        if !self.is_active() {
            return Ok(0);
        }
        self.state = DescriptorState::Inactive;
        match self.delivery.take() {
            Some(err) => Err(err),
            None if self.is_null() => Ok(0),
            None => Ok(self.region.count),
        }
    }

    /// Complete a receive, writing the halo into `block`.
    ///
    /// Blocks until the neighbor's message for the active step arrives.
    /// Returns the number of values written.
    pub fn wait_recv(
        &mut self,
        comm: &mut Communicator,
        block: &mut HaloedBlock,
    ) -> Result<usize, ExchangeError> {
        debug_assert_eq!(self.kind, TransferKind::Recv);
        let DescriptorState::Active { step } = self.state else {
            return Ok(0);
        };
        self.state = DescriptorState::Inactive;
        let Some(peer) = self.peer else {
            return Ok(0);
        };
        let (got, values) = comm.recv_values(peer, self.tag, self.region.count)?;
        if got != step {
            return Err(ExchangeError::OutOfOrder {
                peer,
                tag: self.tag,
                expected: step,
                got,
            });
        }
        self.region.unpack(block.as_mut_slice(), &values)?;
        Ok(values.len())
    }

    /// Complete the transfer, whichever kind it is.
    pub fn wait(
        &mut self,
        comm: &mut Communicator,
        block: &mut HaloedBlock,
    ) -> Result<usize, ExchangeError> {
        match self.kind {
            TransferKind::Send => self.wait_send(),
            TransferKind::Recv => self.wait_recv(comm, block),
        }
    }
}
