//! The per-worker halo exchange engine.
//!
//! Owns the worker's eight [`TransferDescriptor`]s for its whole
//! lifetime. A step drives them as
//!
//! ```text
//! start_all(current, step)      every send leaves, every receive is posted
//!   ... interior pass ...       (no halo reads)
//! wait_inbound(current)         all four halos are now from `step`
//!   ... exterior pass ...
//! wait_outbound()               all four sends are accounted for
//! ```
//!
//! Inbound completion order across directions is whatever order the
//! neighbors' messages happen to arrive in; only the set matters.

use tracing::{debug, trace};

use calor_core::{Direction, PartitionAssignment, Rank, StepId};
use calor_grid::HaloedBlock;

use crate::communicator::Communicator;
use crate::descriptor::{TransferDescriptor, TransferKind};
use crate::error::ExchangeError;

/// Counters accumulated over an engine's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExchangeStats {
    /// Completed `start_all` / wait cycles.
    pub rounds: u64,
    /// Values sent to neighbors.
    pub values_sent: u64,
    /// Values received into the halo ring.
    pub values_received: u64,
}

/// The eight persistent transfers of one worker.
#[derive(Debug)]
pub struct HaloExchangeEngine {
    rank: Rank,
    sends: [TransferDescriptor; 4],
    recvs: [TransferDescriptor; 4],
    stats: ExchangeStats,
}

impl HaloExchangeEngine {
    /// Build all eight descriptors from a worker's assignment.
    pub fn new(rank: Rank, assignment: &PartitionAssignment) -> Self {
        let build = |kind| {
            Direction::ALL.map(|dir| {
                TransferDescriptor::new(dir, kind, assignment.shape, assignment.neighbors.get(dir))
            })
        };
        Self {
            rank,
            sends: build(TransferKind::Send),
            recvs: build(TransferKind::Recv),
            stats: ExchangeStats::default(),
        }
    }

    /// Every descriptor, sends first, in [`Direction::ALL`] order.
    pub fn descriptors(&self) -> impl Iterator<Item = &TransferDescriptor> {
        self.sends.iter().chain(self.recvs.iter())
    }

    /// Number of descriptors currently in flight.
    pub fn active(&self) -> usize {
        self.descriptors().filter(|d| d.is_active()).count()
    }

    /// Counters so far.
    pub fn stats(&self) -> ExchangeStats {
        self.stats
    }

    /// Start all eight transfers for `step`, reading boundaries from
    /// `block`. Never blocks.
    pub fn start_all(
        &mut self,
        comm: &Communicator,
        block: &HaloedBlock,
        step: StepId,
    ) -> Result<(), ExchangeError> {
        trace!(rank = %self.rank, %step, "starting halo transfers");
        for d in self.recvs.iter_mut().chain(self.sends.iter_mut()) {
            d.start(comm, block, step)?;
        }
        Ok(())
    }

    /// Wait for every inbound halo, writing each into `block`.
    pub fn wait_inbound(
        &mut self,
        comm: &mut Communicator,
        block: &mut HaloedBlock,
    ) -> Result<(), ExchangeError> {
        for d in &mut self.recvs {
            let n = d.wait_recv(comm, block)?;
            self.stats.values_received += n as u64;
        }
        Ok(())
    }

    /// Complete every outbound transfer.
    pub fn wait_outbound(&mut self) -> Result<(), ExchangeError> {
        for d in &mut self.sends {
            let n = d.wait_send()?;
            self.stats.values_sent += n as u64;
        }
        self.stats.rounds += 1;
        Ok(())
    }

    /// A full blocking exchange: start, then wait in both directions.
    ///
    /// Used to prime the halo ring before the first step.
    pub fn exchange(
        &mut self,
        comm: &mut Communicator,
        block: &mut HaloedBlock,
        step: StepId,
    ) -> Result<(), ExchangeError> {
        self.start_all(comm, block, step)?;
        self.wait_inbound(comm, block)?;
        self.wait_outbound()
    }

    /// Release the descriptors. Every transfer must be complete.
    pub fn release(self) -> Result<ExchangeStats, ExchangeError> {
        let active = self.active();
        if active > 0 {
            return Err(ExchangeError::ReleasedWhileActive {
                rank: self.rank,
                active,
            });
        }
        debug!(rank = %self.rank, rounds = self.stats.rounds, "released halo descriptors");
        Ok(self.stats)
    }
}
