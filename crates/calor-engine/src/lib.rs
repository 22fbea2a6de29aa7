//! Simulation engine for Calor.
//!
//! - [`SimConfig`]: validated run parameters
//! - [`SimulationLoop`]: one worker's `Setup → Step × STEPS → Done`
//!   state machine
//! - [`Cluster`]: launches one thread per worker over an in-process
//!   message world and collects the gathered field
//! - [`WorkerMetrics`]: per-worker timing split by phase

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod metrics;
pub mod worker;

pub use cluster::{Cluster, RunError, RunReport};
pub use config::{ConfigError, SimConfig};
pub use metrics::WorkerMetrics;
pub use worker::{Phase, SimulationLoop, WorkerOutput};
