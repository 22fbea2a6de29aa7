//! One worker's simulation loop.
//!
//! ```text
//!  Setup ──► Step ──► Step ──► ... ──► Done
//!    │        (exactly `steps` times)    │
//!    │                                   └ gather, release descriptors
//!    └ handshake, allocate, scatter, build descriptors,
//!      prime the halo, barrier, start the timer
//! ```
//!
//! A step is
//!
//! ```text
//! start_all(current) → interior(current → next) → wait_inbound(current)
//!     → exterior(current → next) → wait_outbound → flip
//! ```
//!
//! The control thread issues and completes every transfer; the compute
//! pool only ever runs inside [`rayon::ThreadPool::install`], which
//! returns once the whole pass is done. That return is the
//! synchronization point between passes, so every pool thread sees the
//! same current/next binding for the whole of a pass.
//!
//! Transition from `Step` to `Done` depends only on the step count. The
//! loop never tests for convergence.

use std::time::Instant;

use tracing::{debug, info};

use calor_comm::{collective, Communicator, HaloExchangeEngine};
use calor_core::{PartitionAssignment, StepId};
use calor_decomp::Distributor;
use calor_grid::{GlobalField, HaloBuffer};
use calor_stencil::HeatStencil;

use crate::cluster::RunError;
use crate::config::SimConfig;
use crate::metrics::WorkerMetrics;

/// Externally visible state of a [`SimulationLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the partition and initial block.
    Setup,
    /// Stepping; `completed` steps are done.
    Step {
        /// Steps completed so far.
        completed: u64,
    },
    /// Results gathered, descriptors released.
    Done,
}

/// What a worker hands back when it finishes.
#[derive(Debug)]
pub struct WorkerOutput {
    /// Timing for this worker.
    pub metrics: WorkerMetrics,
    /// The gathered field; only the coordinator has one.
    pub field: Option<GlobalField>,
}

/// State that exists only between setup and done.
struct Active {
    assignment: PartitionAssignment,
    buffer: HaloBuffer,
    engine: HaloExchangeEngine,
    distributor: Option<Distributor>,
    step: StepId,
    started: Instant,
}

/// One worker: its communicator, compute pool, and buffers.
pub struct SimulationLoop {
    comm: Communicator,
    config: SimConfig,
    stencil: HeatStencil,
    pool: rayon::ThreadPool,
    active: Option<Active>,
    phase: Phase,
    metrics: WorkerMetrics,
}

impl SimulationLoop {
    /// Build a worker around `comm`, with a compute pool of
    /// `config.threads` threads.
    pub fn new(comm: Communicator, config: SimConfig) -> Result<Self, RunError> {
        let rank = comm.rank();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(move |i| format!("calor-{rank}-pool-{i}"))
            .build()
            .map_err(|source| RunError::ThreadPool { rank, source })?;
        Ok(Self {
            comm,
            stencil: HeatStencil::new(config.diffusivity),
            config,
            pool,
            active: None,
            phase: Phase::Setup,
            metrics: WorkerMetrics {
                rank,
                ..WorkerMetrics::default()
            },
        })
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// This worker's partition assignment, once set up.
    pub fn assignment(&self) -> Option<&PartitionAssignment> {
        self.active.as_ref().map(|a| &a.assignment)
    }

    /// This worker's ping-pong buffers, once set up.
    pub fn buffer(&self) -> Option<&HaloBuffer> {
        self.active.as_ref().map(|a| &a.buffer)
    }

    /// Run the whole lifecycle: setup, exactly `config.steps` steps, done.
    ///
    /// `initial` is required on the coordinator and ignored elsewhere.
    /// Returns early on the first error; dropping the loop then aborts
    /// the rest of the world.
    pub fn run(mut self, initial: Option<&GlobalField>) -> Result<WorkerOutput, RunError> {
        self.setup(initial)?;
        for _ in 0..self.config.steps {
            self.step()?;
        }
        self.finish(initial.cloned())
    }

    /// `Setup`: receive the assignment, allocate, scatter, build the
    /// descriptors, prime the halo, and meet at the barrier.
    pub fn setup(&mut self, initial: Option<&GlobalField>) -> Result<(), RunError> {
        if self.phase != Phase::Setup {
            return Err(RunError::InvalidPhase {
                expected: "setup",
                got: self.phase,
            });
        }
        let rank = self.comm.rank();

        let (assignment, distributor) = if rank.is_coordinator() {
            let partition = self.config.validate()?;
            info!(
                threads = self.config.threads,
                workers = partition.workers(),
                "grid {}, block grid {}, block size {}",
                partition.dims(),
                partition.grid(),
                partition.shape(),
            );
            let own = collective::send_assignments(&self.comm, &partition.assignments())?;
            (own, Some(Distributor::new(&partition)))
        } else {
            (collective::recv_assignment(&mut self.comm)?, None)
        };
        info!("Process {rank}: {}", assignment.neighbors);

        let mut buffer = HaloBuffer::new(assignment.shape).map_err(RunError::Allocation)?;
        let block = match (&distributor, initial) {
            (Some(d), Some(field)) => collective::scatter_root(&self.comm, d, field)?,
            (Some(_), None) => return Err(RunError::MissingInitialField),
            (None, _) => collective::scatter_recv(&mut self.comm, assignment.shape.cell_count())?,
        };
        buffer.current_mut().load_interior(&block)?;
        buffer.sync_next()?;

        let mut engine = HaloExchangeEngine::new(rank, &assignment);
        engine.exchange(&mut self.comm, buffer.current_mut(), StepId::PRIME)?;
        collective::barrier(&mut self.comm)?;
        debug!("setup complete, timer started");

        self.active = Some(Active {
            assignment,
            buffer,
            engine,
            distributor,
            step: StepId::PRIME,
            started: Instant::now(),
        });
        self.phase = Phase::Step { completed: 0 };
        Ok(())
    }

    /// `Step`: advance the local block by one time step.
    pub fn step(&mut self) -> Result<(), RunError> {
        let Phase::Step { completed } = self.phase else {
            return Err(RunError::InvalidPhase {
                expected: "step",
                got: self.phase,
            });
        };
        let Self {
            comm,
            stencil,
            pool,
            active,
            phase,
            metrics,
            ..
        } = self;
        let Some(a) = active.as_mut() else {
            return Err(RunError::InvalidPhase {
                expected: "step",
                got: Phase::Setup,
            });
        };
        let step = a.step.next();
        let neighbors = a.assignment.neighbors;

        a.engine.start_all(comm, a.buffer.current(), step)?;

        let t = Instant::now();
        {
            let (cur, next) = a.buffer.split();
            pool.install(|| stencil.interior(cur, next));
        }
        metrics.interior_us += micros(t);

        let t = Instant::now();
        a.engine.wait_inbound(comm, a.buffer.current_mut())?;
        metrics.exchange_wait_us += micros(t);

        let t = Instant::now();
        {
            let (cur, next) = a.buffer.split();
            pool.install(|| stencil.exterior(cur, next, &neighbors));
        }
        metrics.exterior_us += micros(t);

        let t = Instant::now();
        a.engine.wait_outbound()?;
        metrics.exchange_wait_us += micros(t);

        a.buffer.flip();
        a.step = step;
        metrics.steps += 1;
        *phase = Phase::Step {
            completed: completed + 1,
        };
        Ok(())
    }

    /// `Done`: stop the timer, gather, and release the descriptors.
    ///
    /// On the coordinator, `target` is the field gathered into; cells no
    /// block covers keep whatever value it already holds.
    pub fn finish(mut self, target: Option<GlobalField>) -> Result<WorkerOutput, RunError> {
        let Some(a) = self.active.take() else {
            return Err(RunError::InvalidPhase {
                expected: "step",
                got: self.phase,
            });
        };
        let rank = self.comm.rank();
        self.metrics.elapsed_us = micros(a.started);
        info!(
            "Process:{rank}, Elapsed time: {:e} secs",
            self.metrics.elapsed_secs()
        );

        let own = a.buffer.current().interior_to_vec();
        let field = match (&a.distributor, target) {
            (Some(d), Some(mut field)) => {
                collective::gather_root(&mut self.comm, d, &own, &mut field)?;
                Some(field)
            }
            (Some(_), None) => return Err(RunError::MissingInitialField),
            (None, _) => {
                collective::gather_send(&self.comm, own)?;
                None
            }
        };

        self.metrics.exchange = a.engine.release()?;
        self.phase = Phase::Done;
        debug!(steps = self.metrics.steps, "worker done");
        self.comm.close();
        Ok(WorkerOutput {
            metrics: self.metrics,
            field,
        })
    }
}

fn micros(since: Instant) -> u64 {
    since.elapsed().as_micros() as u64
}
