//! Collectives rooted at the coordinator.
//!
//! Each collective comes in a root half (run by [`Rank::COORDINATOR`])
//! and a member half (run by every other rank). All of them block until
//! the data they move has arrived, and every message they send is
//! stamped with [`StepId::PRIME`].

use tracing::debug;

use calor_core::{PartitionAssignment, Rank, StepId};
use calor_decomp::Distributor;
use calor_grid::GlobalField;

use crate::communicator::Communicator;
use crate::envelope::{Payload, Tag};
use crate::error::ExchangeError;

fn members(comm: &Communicator) -> impl Iterator<Item = Rank> {
    (1..comm.size()).map(|i| Rank(i as u32))
}

/// Root: send every member its assignment (indexed by rank) and return
/// the coordinator's own.
pub fn send_assignments(
    comm: &Communicator,
    assignments: &[PartitionAssignment],
) -> Result<PartitionAssignment, ExchangeError> {
    for rank in members(comm) {
        let a = assignments.get(rank.index()).ok_or(ExchangeError::NoSuchPeer {
            rank: comm.rank(),
            peer: rank,
        })?;
        comm.send(rank, Tag::Handshake, StepId::PRIME, Payload::Handshake(a.to_wire()))?;
    }
    assignments
        .first()
        .copied()
        .ok_or(ExchangeError::NoSuchPeer {
            rank: comm.rank(),
            peer: Rank::COORDINATOR,
        })
}

/// Member: receive and decode this rank's assignment.
pub fn recv_assignment(comm: &mut Communicator) -> Result<PartitionAssignment, ExchangeError> {
    let env = comm.recv(Rank::COORDINATOR, Tag::Handshake)?;
    match env.payload {
        Payload::Handshake(words) => Ok(PartitionAssignment::from_wire(&words)?),
        other => Err(ExchangeError::UnexpectedPayload {
            peer: Rank::COORDINATOR,
            tag: Tag::Handshake,
            got: other.kind(),
        }),
    }
}

/// Root: send every member its block of `field` and return the
/// coordinator's own block, all in wire layout.
pub fn scatter_root(
    comm: &Communicator,
    distributor: &Distributor,
    field: &GlobalField,
) -> Result<Vec<f32>, ExchangeError> {
    for rank in members(comm) {
        let block = distributor.extract(field, rank)?;
        comm.send(rank, Tag::Scatter, StepId::PRIME, Payload::Values(block))?;
    }
    debug!(workers = comm.size(), "scatter sent");
    Ok(distributor.extract(field, Rank::COORDINATOR)?)
}

/// Member: receive this rank's block of `cells` values.
pub fn scatter_recv(comm: &mut Communicator, cells: usize) -> Result<Vec<f32>, ExchangeError> {
    let (_, values) = comm.recv_values(Rank::COORDINATOR, Tag::Scatter, cells)?;
    Ok(values)
}

/// Root: write the coordinator's block and every member's block into
/// `field`. Cells no block covers keep their value.
pub fn gather_root(
    comm: &mut Communicator,
    distributor: &Distributor,
    own: &[f32],
    field: &mut GlobalField,
) -> Result<(), ExchangeError> {
    distributor.store(field, Rank::COORDINATOR, own)?;
    let cells = distributor.shape().cell_count();
    for i in 1..comm.size() {
        let rank = Rank(i as u32);
        let (_, values) = comm.recv_values(rank, Tag::Gather, cells)?;
        distributor.store(field, rank, &values)?;
    }
    debug!(workers = comm.size(), "gather complete");
    Ok(())
}

/// Member: send this rank's block to the coordinator.
pub fn gather_send(comm: &Communicator, block: Vec<f32>) -> Result<(), ExchangeError> {
    comm.send(Rank::COORDINATOR, Tag::Gather, StepId::PRIME, Payload::Values(block))
}

/// Block until every rank has arrived.
///
/// Members report to the coordinator and wait for its release; the
/// coordinator releases once every member has reported.
pub fn barrier(comm: &mut Communicator) -> Result<(), ExchangeError> {
    if comm.rank().is_coordinator() {
        for rank in members(comm).collect::<Vec<_>>() {
            comm.recv(rank, Tag::Barrier)?;
        }
        for rank in members(comm) {
            comm.send(rank, Tag::Release, StepId::PRIME, Payload::Empty)?;
        }
    } else {
        comm.send(Rank::COORDINATOR, Tag::Barrier, StepId::PRIME, Payload::Empty)?;
        comm.recv(Rank::COORDINATOR, Tag::Release)?;
    }
    Ok(())
}
