//! The end-to-end run behind the `calor` binary, and its exit statuses.

use std::ffi::OsString;
use std::fs;

use anyhow::{Context, Result};
use calor_engine::{Cluster, ConfigError, RunError, RunReport};
use tracing::{error, info};

use crate::args::{self, ArgsError, EXIT_BAD_ARGS};
use crate::dump::{self, FINAL_DUMP, INITIAL_DUMP};
use crate::init;
use crate::settings::{Settings, SettingsLoader};

/// Exit status when the worker count cannot partition the grid.
pub const EXIT_BAD_WORKERS: u8 = 22;
/// Exit status for any other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Parse `args`, load settings through `loader`, run, and return the
/// process exit status.
pub fn execute<I, T>(args: I, loader: SettingsLoader) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let threads = match args::parse_threads(args) {
        Ok(threads) => threads,
        Err(e) if e.is_informational() => {
            if let ArgsError::Parse(e) = e {
                let _ = e.print();
            }
            return 0;
        }
        Err(e) => {
            error!("{e}");
            return EXIT_BAD_ARGS;
        }
    };

    let settings = match loader.load() {
        Ok(settings) => settings.with_threads(threads),
        Err(e) => {
            error!("{e:#}");
            return EXIT_FAILURE;
        }
    };

    match run(&settings) {
        Ok(report) => {
            info!(
                workers = report.workers.len(),
                "run complete, slowest worker {:e} secs",
                report.max_elapsed_secs()
            );
            0
        }
        Err(e) => {
            error!("{e:#}");
            exit_code(&e)
        }
    }
}

/// Validate, write `initial.dat`, run the cluster, write `final.dat`.
pub fn run(settings: &Settings) -> Result<RunReport> {
    let config = settings.sim_config();
    info!("Thread count = {}", config.threads);
    let cluster = Cluster::new(config).context("configuration rejected")?;
    let config = cluster.config();

    info!("Starting heat2D with {} worker tasks", config.workers);
    info!(
        "Grid size: X= {}  Y= {}  Time steps= {}",
        config.dims.nx, config.dims.ny, config.steps
    );

    fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            settings.output_dir.display()
        )
    })?;

    info!("Initializing grid and writing {INITIAL_DUMP}");
    let initial = init::initial_field(config.dims).context("failed to allocate the grid")?;
    dump::dump_to_path(&settings.output_dir.join(INITIAL_DUMP), &initial)?;

    let report = cluster.run(&initial).context("simulation failed")?;

    info!("Writing {FINAL_DUMP}");
    dump::dump_to_path(&settings.output_dir.join(FINAL_DUMP), &report.field)?;
    Ok(report)
}

/// Exit status for a failed [`run`].
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RunError>() {
        Some(RunError::Config(c)) if c.is_worker_count() => EXIT_BAD_WORKERS,
        Some(RunError::Config(ConfigError::InvalidThreadCount { .. })) => EXIT_BAD_ARGS,
        _ => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calor_core::{Diffusivity, GridDims};
    use calor_stencil::reference;
    use std::path::Path;

    fn small(dir: &Path) -> Settings {
        Settings {
            nx: 12,
            ny: 8,
            steps: 5,
            workers: 4,
            output_dir: dir.to_path_buf(),
            ..Settings::default()
        }
    }

    fn isolated_loader(dir: &Path, prefix: &str) -> SettingsLoader {
        SettingsLoader::new()
            .with_project_dir(dir)
            .with_env_prefix(prefix)
    }

    #[test]
    fn run_writes_both_dumps() {
        let dir = tempfile::tempdir().unwrap();
        let settings = small(dir.path());
        let report = run(&settings).unwrap();
        assert_eq!(report.workers.len(), 4);

        let initial = fs::read_to_string(dir.path().join(INITIAL_DUMP)).unwrap();
        let lines: Vec<_> = initial.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().all(|l| l.split_whitespace().count() == 12));
        assert!(dir.path().join(FINAL_DUMP).exists());
    }

    #[test]
    fn final_dump_matches_serial_solver() {
        let dir = tempfile::tempdir().unwrap();
        let settings = small(dir.path());
        run(&settings).unwrap();

        let initial = init::initial_field(GridDims::new(12, 8)).unwrap();
        let expected = reference::advance(&initial, Diffusivity::default(), 5);
        let mut text = Vec::new();
        dump::write_field(&mut text, &expected).unwrap();

        let written = fs::read(dir.path().join(FINAL_DUMP)).unwrap();
        assert_eq!(written, text);
    }

    #[test]
    fn prime_worker_count_exits_22() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            workers: 7,
            ..small(dir.path())
        };
        let err = run(&settings).unwrap_err();
        assert_eq!(exit_code(&err), EXIT_BAD_WORKERS);
        assert!(!dir.path().join(INITIAL_DUMP).exists());
    }

    #[test]
    fn indivisible_cells_exit_22() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            nx: 5,
            ny: 5,
            workers: 4,
            ..small(dir.path())
        };
        let err = run(&settings).unwrap_err();
        assert_eq!(exit_code(&err), EXIT_BAD_WORKERS);
    }

    #[test]
    fn oversized_grid_exits_22() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            nx: 1 << 33,
            ny: 1 << 33,
            ..small(dir.path())
        };
        let err = run(&settings).unwrap_err();
        assert_eq!(exit_code(&err), EXIT_BAD_WORKERS);
        assert!(!dir.path().join(INITIAL_DUMP).exists());
    }

    #[test]
    fn unwritable_output_exits_1() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let settings = small(&blocker);
        let err = run(&settings).unwrap_err();
        assert_eq!(exit_code(&err), EXIT_FAILURE);
    }

    #[test]
    fn bad_thread_argument_exits_32() {
        let dir = tempfile::tempdir().unwrap();
        for argv in [&["calor", "0"][..], &["calor", "1", "2"], &["calor", "x"]] {
            let code = execute(argv.iter().copied(), isolated_loader(dir.path(), "CALOR_TEST_ARGV"));
            assert_eq!(code, EXIT_BAD_ARGS, "{argv:?}");
        }
    }

    #[test]
    fn execute_runs_with_project_settings() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::write(
            dir.path().join(crate::settings::SETTINGS_FILE),
            format!(
                "nx = 6\nny = 6\nsteps = 2\nworkers = 4\noutput_dir = {:?}\n",
                out.display().to_string()
            ),
        )
        .unwrap();
        let code = execute(["calor", "2"], isolated_loader(dir.path(), "CALOR_TEST_EXEC"));
        assert_eq!(code, 0);
        assert!(out.join(FINAL_DUMP).exists());
    }
}
