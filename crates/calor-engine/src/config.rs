//! Run configuration, validation, and error types.

use std::time::Duration;

use calor_comm::DEFAULT_LIVENESS_TIMEOUT;
use calor_core::{Diffusivity, GridDims};
use calor_decomp::{DecompError, Partition};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`].
///
/// All of these are found before any simulation state is built.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The per-worker thread pool must have at least one thread.
    #[error("thread count must be positive, got {threads}")]
    InvalidThreadCount {
        /// The configured count.
        threads: usize,
    },
    /// A diffusion coefficient is NaN or infinite.
    #[error("diffusivity must be finite, got cx={cx}, cy={cy}")]
    InvalidDiffusivity {
        /// Configured X coefficient.
        cx: f32,
        /// Configured Y coefficient.
        cy: f32,
    },
    /// The worker count cannot partition the grid.
    #[error(transparent)]
    Decomp(#[from] DecompError),
    /// The initial field does not match the configured grid.
    #[error("initial field is {got}, configuration expects {expected}")]
    FieldShape {
        /// Configured dimensions.
        expected: GridDims,
        /// Dimensions of the supplied field.
        got: GridDims,
    },
}

impl ConfigError {
    /// Whether partitioning the grid over the worker count failed,
    /// including for grids too large to address.
    pub fn is_worker_count(&self) -> bool {
        matches!(self, Self::Decomp(_))
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration for one run.
///
/// Built once and passed by value to every worker; nothing in the engine
/// reads global state.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Global grid dimensions. Default: 256 × 320.
    pub dims: GridDims,
    /// Number of time steps. Default: 100.
    pub steps: u64,
    /// Diffusion coefficients. Default: 0.1, 0.1.
    pub diffusivity: Diffusivity,
    /// Number of workers. Default: 4.
    pub workers: usize,
    /// Threads in each worker's compute pool. Default: 1.
    pub threads: usize,
    /// How long a blocked receive may wait before the run fails.
    /// `None` waits forever. Default: 30 s.
    pub liveness_timeout: Option<Duration>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dims: GridDims::new(256, 320),
            steps: 100,
            diffusivity: Diffusivity::default(),
            workers: 4,
            threads: 1,
            liveness_timeout: Some(DEFAULT_LIVENESS_TIMEOUT),
        }
    }
}

impl SimConfig {
    /// Validate all invariants and return the partition they imply.
    pub fn validate(&self) -> Result<Partition, ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidThreadCount {
                threads: self.threads,
            });
        }
        if !self.diffusivity.is_finite() {
            return Err(ConfigError::InvalidDiffusivity {
                cx: self.diffusivity.cx,
                cy: self.diffusivity.cy,
            });
        }
        Ok(Partition::new(self.dims, self.workers)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calor_core::BlockGrid;

    #[test]
    fn default_config_is_valid() {
        let p = SimConfig::default().validate().unwrap();
        assert_eq!(p.grid(), BlockGrid::new(2, 2));
    }

    #[test]
    fn zero_threads_rejected() {
        let cfg = SimConfig {
            threads: 0,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidThreadCount { threads: 0 })
        );
    }

    #[test]
    fn nan_diffusivity_rejected() {
        let cfg = SimConfig {
            diffusivity: Diffusivity::new(f32::NAN, 0.1),
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDiffusivity { .. })
        ));
    }

    #[test]
    fn prime_worker_count_is_a_worker_count_error() {
        let cfg = SimConfig {
            workers: 5,
            ..SimConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.is_worker_count());
        assert_eq!(
            err,
            ConfigError::Decomp(DecompError::PrimeWorkerCount { workers: 5 })
        );
    }

    #[test]
    fn unaddressable_grid_is_a_worker_count_error() {
        let dims = GridDims::new(1 << 33, 1 << 33);
        let cfg = SimConfig {
            dims,
            workers: 4,
            ..SimConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.is_worker_count());
        assert_eq!(err, ConfigError::Decomp(DecompError::GridTooLarge { dims }));
    }
}
