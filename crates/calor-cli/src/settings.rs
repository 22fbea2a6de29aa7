//! Layered run settings.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults ([`Settings::default`])
//! 2. `calor.toml` in the project directory, if present
//! 3. `CALOR_*` environment variables (`CALOR_WORKERS=8`,
//!    `CALOR_OUTPUT_DIR=out`, ...)
//!
//! The positional thread count on the command line is applied last, by
//! [`Settings::with_threads`].

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use calor_core::{Diffusivity, GridDims};
use calor_engine::SimConfig;
use serde::{Deserialize, Serialize};

/// Settings file looked up in the project directory.
pub const SETTINGS_FILE: &str = "calor.toml";

/// Flat, serializable form of a run's parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grid extent along X.
    pub nx: usize,
    /// Grid extent along Y.
    pub ny: usize,
    /// Time steps.
    pub steps: u64,
    /// X diffusion coefficient.
    pub cx: f32,
    /// Y diffusion coefficient.
    pub cy: f32,
    /// Worker count.
    pub workers: usize,
    /// Compute threads per worker.
    pub threads: usize,
    /// Seconds a blocked receive may wait; `0` waits forever.
    pub liveness_timeout_secs: u64,
    /// Directory receiving `initial.dat` and `final.dat`.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let sim = SimConfig::default();
        Self {
            nx: sim.dims.nx,
            ny: sim.dims.ny,
            steps: sim.steps,
            cx: sim.diffusivity.cx,
            cy: sim.diffusivity.cy,
            workers: sim.workers,
            threads: sim.threads,
            liveness_timeout_secs: sim.liveness_timeout.map_or(0, |t| t.as_secs()),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Replace the thread count when the command line gave one.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        if let Some(threads) = threads {
            self.threads = threads;
        }
        self
    }

    /// Engine configuration for these settings. Not yet validated.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            dims: GridDims::new(self.nx, self.ny),
            steps: self.steps,
            diffusivity: Diffusivity::new(self.cx, self.cy),
            workers: self.workers,
            threads: self.threads,
            liveness_timeout: (self.liveness_timeout_secs > 0)
                .then(|| Duration::from_secs(self.liveness_timeout_secs)),
        }
    }
}

/// Builder that merges the setting sources.
pub struct SettingsLoader {
    project_dir: PathBuf,
    env_prefix: String,
}

impl SettingsLoader {
    /// Loader rooted at the current directory, reading `CALOR_*`.
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "CALOR".to_string(),
        }
    }

    /// Look for `calor.toml` in `dir` instead.
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Read environment variables with this prefix (default `CALOR`).
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Merge every source and deserialize the result.
    pub fn load(self) -> Result<Settings> {
        let mut builder = config::Config::builder();

        let defaults = Settings::default();
        builder = builder.add_source(
            config::Config::try_from(&defaults).context("failed to encode default settings")?,
        );

        let file = self.project_dir.join(SETTINGS_FILE);
        if file.exists() {
            builder = builder.add_source(
                config::File::from(file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Keys contain underscores, so no nesting separator.
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix).try_parsing(true),
        );

        let merged = builder.build().context("failed to build settings")?;
        merged
            .try_deserialize()
            .context("failed to deserialize settings")
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
