//! In-process cluster launcher.
//!
//! Runs every worker of a [`SimConfig`] on its own named OS thread,
//! connected only through a [`calor_comm::world`]. The threads share
//! nothing but the read-only initial field, which only the coordinator
//! reads.

use std::thread;

use tracing::{error, info_span};

use calor_comm::{world, ExchangeError};
use calor_core::Rank;
use calor_decomp::Partition;
use calor_grid::{GlobalField, GridError};

use crate::config::{ConfigError, SimConfig};
use crate::metrics::WorkerMetrics;
use crate::worker::{Phase, SimulationLoop, WorkerOutput};

// ── RunError ───────────────────────────────────────────────────────

/// Errors that end a run. None are recoverable: the first failure on any
/// worker aborts the whole world.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The configuration was rejected before any worker started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A worker could not allocate its buffers.
    #[error("buffer allocation failed: {0}")]
    Allocation(GridError),
    /// A block did not fit a worker's buffer.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// A transfer or collective failed.
    #[error("exchange failed: {0}")]
    Exchange(#[from] ExchangeError),
    /// A worker's compute pool could not be built.
    #[error("rank {rank}: thread pool: {source}")]
    ThreadPool {
        /// The worker.
        rank: Rank,
        /// Underlying rayon error.
        source: rayon::ThreadPoolBuildError,
    },
    /// A worker thread panicked.
    #[error("worker {rank} panicked")]
    WorkerPanicked {
        /// The worker.
        rank: Rank,
    },
    /// A worker thread could not be spawned.
    #[error("failed to spawn worker {rank}: {reason}")]
    ThreadSpawnFailed {
        /// The worker.
        rank: Rank,
        /// OS error text.
        reason: String,
    },
    /// The coordinator finished without a gathered field.
    #[error("coordinator returned no gathered field")]
    MissingResult,
    /// The coordinator was started without the initial field.
    #[error("coordinator has no initial field")]
    MissingInitialField,
    /// A lifecycle method was called out of order.
    #[error("expected {expected} phase, worker is in {got:?}")]
    InvalidPhase {
        /// Phase the call requires.
        expected: &'static str,
        /// Phase the worker was in.
        got: Phase,
    },
}

impl RunError {
    /// Whether this error is only a consequence of another worker's
    /// failure.
    fn is_secondary(&self) -> bool {
        matches!(self, Self::Exchange(ExchangeError::Aborted { .. }))
    }
}

// ── RunReport ──────────────────────────────────────────────────────

/// Result of a successful run.
#[derive(Debug)]
pub struct RunReport {
    /// The gathered final field.
    pub field: GlobalField,
    /// Per-worker timing, indexed by rank.
    pub workers: Vec<WorkerMetrics>,
}

impl RunReport {
    /// Slowest worker's elapsed time, in seconds.
    pub fn max_elapsed_secs(&self) -> f64 {
        self.workers
            .iter()
            .map(WorkerMetrics::elapsed_secs)
            .fold(0.0, f64::max)
    }
}

// ── Cluster ────────────────────────────────────────────────────────

/// A validated configuration ready to run.
#[derive(Clone, Debug)]
pub struct Cluster {
    config: SimConfig,
    partition: Partition,
}

impl Cluster {
    /// Validate `config`. Nothing is spawned yet.
    pub fn new(config: SimConfig) -> Result<Self, RunError> {
        let partition = config.validate()?;
        Ok(Self { config, partition })
    }

    /// The configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The partition the run will use.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Run every worker to completion and return the gathered field.
    ///
    /// Cells of `initial` outside the partition's coverage are carried
    /// into the result unchanged.
    pub fn run(&self, initial: &GlobalField) -> Result<RunReport, RunError> {
        if initial.dims() != self.config.dims {
            return Err(ConfigError::FieldShape {
                expected: self.config.dims,
                got: initial.dims(),
            }
            .into());
        }
        let comms = world(self.partition.workers(), self.config.liveness_timeout);
        let abort = comms
            .first()
            .map(|c| c.abort_handle())
            .ok_or(RunError::MissingResult)?;

        let results: Vec<(Rank, Result<WorkerOutput, RunError>)> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(comms.len());
            for comm in comms {
                let rank = comm.rank();
                let config = self.config.clone();
                let seed = rank.is_coordinator().then_some(initial);
                let spawned = thread::Builder::new()
                    .name(format!("calor-worker-{rank}"))
                    .spawn_scoped(scope, move || {
                        let _span = info_span!("worker", %rank).entered();
                        let result = SimulationLoop::new(comm, config)?.run(seed);
                        if let Err(e) = &result {
                            if !e.is_secondary() {
                                error!(error = %e, "worker failed");
                            }
                        }
                        result
                    });
                if let Err(e) = &spawned {
                    error!(%rank, error = %e, "could not spawn worker");
                    abort.abort();
                }
                handles.push((rank, spawned));
            }
            handles
                .into_iter()
                .map(|(rank, h)| {
                    let result = match h {
                        Ok(h) => h.join().unwrap_or_else(|_| {
                            abort.abort();
                            Err(RunError::WorkerPanicked { rank })
                        }),
                        Err(e) => Err(RunError::ThreadSpawnFailed {
                            rank,
                            reason: e.to_string(),
                        }),
                    };
                    (rank, result)
                })
                .collect()
        });

        collect(results)
    }
}

/// Fold per-worker results into a report, preferring a root-cause error
/// over the `Aborted` errors it caused elsewhere.
fn collect(results: Vec<(Rank, Result<WorkerOutput, RunError>)>) -> Result<RunReport, RunError> {
    let mut field = None;
    let mut workers = Vec::with_capacity(results.len());
    let mut first_err: Option<RunError> = None;
    for (_, result) in results {
        match result {
            Ok(out) => {
                if out.field.is_some() {
                    field = out.field;
                }
                workers.push(out.metrics);
            }
            Err(e) => {
                let replace = match &first_err {
                    None => true,
                    Some(prev) => prev.is_secondary() && !e.is_secondary(),
                };
                if replace {
                    first_err = Some(e);
                }
            }
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }
    workers.sort_by_key(|m| m.rank);
    Ok(RunReport {
        field: field.ok_or(RunError::MissingResult)?,
        workers,
    })
}
